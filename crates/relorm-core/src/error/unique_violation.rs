use super::Error;

/// Error when a write would duplicate a unique field (or group of fields).
#[derive(Debug)]
pub(super) struct UniqueViolationError {
    collection: Box<str>,
    columns: Box<str>,
}

impl std::error::Error for UniqueViolationError {}

impl core::fmt::Display for UniqueViolationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unique constraint violated on `{}` ({})",
            self.collection, self.columns
        )
    }
}

impl Error {
    /// Creates a unique violation error.
    pub fn unique_violation(collection: impl Into<String>, columns: &[&str]) -> Error {
        Error::from(super::ErrorKind::UniqueViolation(UniqueViolationError {
            collection: collection.into().into(),
            columns: columns.join(", ").into(),
        }))
    }

    /// Returns `true` if this error is a unique violation error.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UniqueViolation(_))
    }
}
