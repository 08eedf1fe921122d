mod adhoc;
mod backend;
mod duplicate_collection;
mod empty_model_data;
mod hook;
mod invalid_expression;
mod invalid_schema;
mod model_not_built;
mod primary_key_exists;
mod record_not_found;
mod transaction_closed;
mod translation;
mod type_conversion;
mod unique_violation;
mod unknown_name;
mod unpersisted_model;
mod unsupported;
mod validation;

use adhoc::AdhocError;
use backend::BackendError;
use duplicate_collection::DuplicateCollectionError;
use empty_model_data::EmptyModelDataError;
use hook::HookError;
use invalid_expression::InvalidExpressionError;
use invalid_schema::InvalidSchema;
use model_not_built::ModelNotBuiltError;
use primary_key_exists::PrimaryKeyExistsError;
use record_not_found::RecordNotFoundError;
use std::sync::Arc;
use transaction_closed::TransactionClosedError;
use translation::TranslationError;
use type_conversion::TypeConversionError;
use unique_violation::UniqueViolationError;
use unknown_name::UnknownNameError;
use unpersisted_model::UnpersistedModelError;
use unsupported::UnsupportedError;
use validation::ValidationError;

pub use unsupported::UnsupportedKind;

/// Return early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Build an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in relorm.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            if inner.cause.is_none() {
                inner.cause = Some(self);
                return err;
            }
        }

        // The consequent is shared or already carries a cause; flatten it into
        // a message so the chain stays linear.
        let message = err.kind().to_string();
        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(message)),
                cause: Some(self),
            })),
        }
    }

    /// The innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = err.cause() {
            err = cause;
        }
        err
    }

    /// The error this one was wrapped around, if any.
    pub fn cause(&self) -> Option<&Error> {
        self.inner.as_ref().and_then(|inner| inner.cause.as_ref())
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.cause()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Backend(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Backend(BackendError),
    DuplicateCollection(DuplicateCollectionError),
    EmptyModelData(EmptyModelDataError),
    Hook(HookError),
    InvalidExpression(InvalidExpressionError),
    InvalidSchema(InvalidSchema),
    ModelNotBuilt(ModelNotBuiltError),
    PrimaryKeyExists(PrimaryKeyExistsError),
    RecordNotFound(RecordNotFoundError),
    TransactionClosed(TransactionClosedError),
    Translation(TranslationError),
    TypeConversion(TypeConversionError),
    UniqueViolation(UniqueViolationError),
    UnknownName(UnknownNameError),
    UnpersistedModel(UnpersistedModelError),
    Unsupported(UnsupportedError),
    Validation(ValidationError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Backend(err) => core::fmt::Display::fmt(err, f),
            DuplicateCollection(err) => core::fmt::Display::fmt(err, f),
            EmptyModelData(err) => core::fmt::Display::fmt(err, f),
            Hook(err) => core::fmt::Display::fmt(err, f),
            InvalidExpression(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            ModelNotBuilt(err) => core::fmt::Display::fmt(err, f),
            PrimaryKeyExists(err) => core::fmt::Display::fmt(err, f),
            RecordNotFound(err) => core::fmt::Display::fmt(err, f),
            TransactionClosed(err) => core::fmt::Display::fmt(err, f),
            Translation(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UniqueViolation(err) => core::fmt::Display::fmt(err, f),
            UnknownName(err) => core::fmt::Display::fmt(err, f),
            UnpersistedModel(err) => core::fmt::Display::fmt(err, f),
            Unsupported(err) => core::fmt::Display::fmt(err, f),
            Validation(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown relorm error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for &str {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self.to_string())))
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::HookStage, stmt};

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let mid = err!("middle context");
        let top = err!("top context");

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn context_with_shared_consequent() {
        let consequent = err!("outer");
        let _shared = consequent.clone();

        let chained = err!("inner").context(consequent);
        assert_eq!(chained.to_string(), "outer: inner");
    }

    #[test]
    fn root_walks_chain() {
        let err = Error::record_not_found("table=task key=1").context("delete failed");
        assert!(!err.is_record_not_found());
        assert!(err.root().is_record_not_found());
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn unknown_collection_display() {
        let err = Error::unknown_collection("Widget");
        assert!(err.is_unknown_collection());
        assert_eq!(err.to_string(), "unknown collection `Widget`");
    }

    #[test]
    fn hook_error_keeps_cause() {
        let err = Error::hook(HookStage::BeforeCreate, err!("name is reserved"));
        assert!(err.is_hook());
        assert_eq!(err.hook_stage(), Some(HookStage::BeforeCreate));
        assert_eq!(
            err.to_string(),
            "before_create hook failed: name is reserved"
        );
    }

    #[test]
    fn invalid_expression_reason() {
        let err = Error::invalid_expression("filter", stmt::Invalid::EmptyField);
        assert!(err.is_invalid_expression());
        assert_eq!(err.invalid_reason(), Some(&stmt::Invalid::EmptyField));
        assert_eq!(err.to_string(), "invalid filter expression: empty field");
    }

    #[test]
    fn unsupported_column_type_names_field() {
        let err = Error::unsupported_column_type("settings", stmt::Type::Json);
        assert!(err.is_unsupported());
        assert!(err.is_unsupported_column_type());
        assert_eq!(
            err.to_string(),
            "unsupported column type: field `settings` has type json"
        );
    }

    #[test]
    fn validation_length_too_short() {
        let err = Error::validation_length("name", 3, Some(5), Some(10));
        assert_eq!(
            err.to_string(),
            "validation failed: `name` length 3 is too short (minimum: 5)"
        );
    }

    #[test]
    fn validation_length_exact_mismatch() {
        let err = Error::validation_length("code", 3, Some(5), Some(5));
        assert_eq!(
            err.to_string(),
            "validation failed: `code` length 3 does not match required length 5"
        );
    }

    #[test]
    fn record_not_found_with_context_chain() {
        let err = Error::record_not_found("collection=task key=123")
            .context(err!("update query failed"))
            .context(err!("Task.update() operation"));

        assert_eq!(
            err.to_string(),
            "Task.update() operation: update query failed: record not found: collection=task key=123"
        );
    }
}
