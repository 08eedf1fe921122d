use super::*;

use std::cmp::Ordering;

impl Value {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::I64(_) | Self::F64(_) => 2,
            Self::String(_) => 3,
            Self::Time(_) => 4,
            Self::Bytes(_) => 5,
            Self::Json(_) => 6,
            Self::List(_) => 7,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Total order: null sorts first, integers and floats compare numerically
/// with each other, other kinds compare within their own kind.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (I64(a), F64(b)) => (*a as f64).total_cmp(b),
            (F64(a), I64(b)) => a.total_cmp(&(*b as f64)),
            (F64(a), F64(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Time(a), Time(b)) => a.cmp(b),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            (Json(a), Json(b)) => a.to_string().cmp(&b.to_string()),
            (List(a), List(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank().hash(state);

        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            // Integral floats hash like the matching integer so that
            // `I64(1) == F64(1.0)` keeps the Hash/Eq contract.
            Value::I64(v) => (*v as f64).to_bits().hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Time(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Json(v) => v.to_string().hash(state),
            Value::List(v) => v.hash(state),
        }
    }
}
