use super::Error;

/// Error raised by a storage collaborator (connection, driver, store).
#[derive(Debug)]
pub(super) struct BackendError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for BackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("backend error: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a storage collaborator's error.
    ///
    /// Executors wrapping a database client convert the client's errors with
    /// this constructor.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Backend(BackendError {
            inner: Box::new(err),
        }))
    }

    /// Creates a backend error from a plain message.
    pub fn backend_message(message: impl Into<String>) -> Error {
        let message: String = message.into();
        Error::from(super::ErrorKind::Backend(BackendError {
            inner: message.into(),
        }))
    }

    /// Returns `true` if this error came from a storage collaborator.
    pub fn is_backend(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Backend(_))
    }
}
