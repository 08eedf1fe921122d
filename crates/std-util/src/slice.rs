#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let actual = &$e;
        if !actual.is_empty() {
            panic!("expected empty; actual={:?}", actual);
        }
    }};
}

pub trait SliceUtil<T> {
    /// Returns the only element, panicking when there are zero or several.
    fn only(&self) -> &T;
}

impl<T: std::fmt::Debug> SliceUtil<T> for [T] {
    fn only(&self) -> &T {
        match self {
            [item] => item,
            _ => panic!("expected exactly one element; actual={:?}", self),
        }
    }
}

impl<T: std::fmt::Debug> SliceUtil<T> for Vec<T> {
    fn only(&self) -> &T {
        self.as_slice().only()
    }
}
