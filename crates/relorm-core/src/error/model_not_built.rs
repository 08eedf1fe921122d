use super::Error;

/// Error when a registered model is used before `build()` resolved it.
#[derive(Debug)]
pub(super) struct ModelNotBuiltError {
    name: Box<str>,
}

impl std::error::Error for ModelNotBuiltError {}

impl core::fmt::Display for ModelNotBuiltError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "model `{}` is registered but not built; call `build()` first",
            self.name
        )
    }
}

impl Error {
    /// Creates a model-not-built error.
    pub fn model_not_built(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ModelNotBuilt(ModelNotBuiltError {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a model-not-built error.
    pub fn is_model_not_built(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ModelNotBuilt(_))
    }
}
