use super::Error;

/// Error when a statement cannot be rendered for a dialect.
#[derive(Debug)]
pub(super) struct TranslationError {
    message: Box<str>,
}

impl std::error::Error for TranslationError {}

impl core::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "translation failed: {}", self.message)
    }
}

impl Error {
    /// Creates a translation error.
    pub fn translation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Translation(TranslationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a translation error.
    pub fn is_translation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Translation(_))
    }
}
