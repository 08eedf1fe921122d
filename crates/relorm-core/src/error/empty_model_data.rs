use super::Error;

/// Error when an operation has no field data to write.
#[derive(Debug)]
pub(super) struct EmptyModelDataError {
    collection: Box<str>,
}

impl std::error::Error for EmptyModelDataError {}

impl core::fmt::Display for EmptyModelDataError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no field data to write for `{}`", self.collection)
    }
}

impl Error {
    /// Creates an empty model data error.
    pub fn empty_model_data(collection: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::EmptyModelData(EmptyModelDataError {
            collection: collection.into().into(),
        }))
    }

    /// Returns `true` if this error is an empty model data error.
    pub fn is_empty_model_data(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::EmptyModelData(_))
    }
}
