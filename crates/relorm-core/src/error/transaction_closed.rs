use super::Error;

/// Error when a transaction handle is used after commit or rollback.
#[derive(Debug)]
pub(super) struct TransactionClosedError;

impl std::error::Error for TransactionClosedError {}

impl core::fmt::Display for TransactionClosedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("transaction is already committed or rolled back")
    }
}

impl Error {
    /// Creates a transaction-closed error.
    pub fn transaction_closed() -> Error {
        Error::from(super::ErrorKind::TransactionClosed(TransactionClosedError))
    }

    /// Returns `true` if this error is a transaction-closed error.
    pub fn is_transaction_closed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TransactionClosed(_))
    }
}
