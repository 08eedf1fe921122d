use super::Error;

/// Error when a collection is registered twice.
#[derive(Debug)]
pub(super) struct DuplicateCollectionError {
    name: Box<str>,
}

impl std::error::Error for DuplicateCollectionError {}

impl core::fmt::Display for DuplicateCollectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "collection `{}` is already registered", self.name)
    }
}

impl Error {
    /// Creates a duplicate collection error.
    pub fn duplicate_collection(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateCollection(
            DuplicateCollectionError {
                name: name.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a duplicate collection error.
    pub fn is_duplicate_collection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateCollection(_))
    }
}
