use super::Error;

/// Error when an operation needs the primary key of a record that was never
/// persisted.
#[derive(Debug)]
pub(super) struct UnpersistedModelError {
    collection: Box<str>,
}

impl std::error::Error for UnpersistedModelError {}

impl core::fmt::Display for UnpersistedModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "`{}` record has no primary key; persist it first",
            self.collection
        )
    }
}

impl Error {
    /// Creates an unpersisted model error.
    pub fn unpersisted_model(collection: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnpersistedModel(UnpersistedModelError {
            collection: collection.into().into(),
        }))
    }

    /// Returns `true` if this error is an unpersisted model error.
    pub fn is_unpersisted_model(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnpersistedModel(_))
    }
}
