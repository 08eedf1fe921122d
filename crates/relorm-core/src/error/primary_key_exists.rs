use super::Error;

/// Error when a record is created with a primary key that is already taken.
#[derive(Debug)]
pub(super) struct PrimaryKeyExistsError {
    context: Box<str>,
}

impl std::error::Error for PrimaryKeyExistsError {}

impl core::fmt::Display for PrimaryKeyExistsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "primary key already exists: {}", self.context)
    }
}

impl Error {
    /// Creates a primary-key-exists error.
    pub fn primary_key_exists(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::PrimaryKeyExists(PrimaryKeyExistsError {
            context: context.into().into(),
        }))
    }

    /// Returns `true` if this error is a primary-key-exists error.
    pub fn is_primary_key_exists(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::PrimaryKeyExists(_))
    }
}
