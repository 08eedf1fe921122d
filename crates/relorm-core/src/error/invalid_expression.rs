use super::Error;
use crate::stmt::Invalid;

/// Error when an expression node is missing a required element.
///
/// Raised by `validate()` on statement and constraint nodes before any text
/// is emitted.
#[derive(Debug)]
pub(super) struct InvalidExpressionError {
    kind: &'static str,
    reason: Invalid,
}

impl std::error::Error for InvalidExpressionError {}

impl core::fmt::Display for InvalidExpressionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid {} expression: {}", self.kind, self.reason)
    }
}

impl Error {
    /// Creates an invalid expression error for a node of the given kind.
    pub fn invalid_expression(kind: &'static str, reason: Invalid) -> Error {
        Error::from(super::ErrorKind::InvalidExpression(InvalidExpressionError {
            kind,
            reason,
        }))
    }

    /// Returns `true` if this error is an invalid expression error.
    pub fn is_invalid_expression(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidExpression(_))
    }

    /// The reason an expression failed validation.
    pub fn invalid_reason(&self) -> Option<&Invalid> {
        match self.kind() {
            super::ErrorKind::InvalidExpression(err) => Some(&err.reason),
            _ => None,
        }
    }
}
