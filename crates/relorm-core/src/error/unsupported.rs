use super::Error;
use crate::stmt::Type;

/// Error when a backend or dialect does not support a requested construct.
#[derive(Debug)]
pub(super) struct UnsupportedError {
    kind: UnsupportedKind,
}

/// What was unsupported.
#[derive(Debug, Clone, PartialEq)]
pub enum UnsupportedKind {
    /// A node kind or feature the backend cannot express.
    Construct(String),

    /// A field whose semantic type has no column type in the dialect.
    ColumnType { field: String, ty: Type },

    /// More than one sort field on a backend that sorts by a single key.
    MultiSort { collection: String },

    /// A field projection on a backend that always returns whole records.
    FieldProjection { collection: String },
}

impl std::error::Error for UnsupportedError {}

impl core::fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.kind {
            UnsupportedKind::Construct(what) => write!(f, "unsupported construct: {what}"),
            UnsupportedKind::ColumnType { field, ty } => {
                write!(f, "unsupported column type: field `{field}` has type {ty}")
            }
            UnsupportedKind::MultiSort { collection } => write!(
                f,
                "unsupported multi-field sort on `{collection}`; the backend sorts by one field"
            ),
            UnsupportedKind::FieldProjection { collection } => write!(
                f,
                "unsupported field projection on `{collection}`; the backend returns whole records"
            ),
        }
    }
}

impl Error {
    fn unsupported(kind: UnsupportedKind) -> Error {
        Error::from(super::ErrorKind::Unsupported(UnsupportedError { kind }))
    }

    /// Creates an unsupported construct error.
    pub fn unsupported_construct(what: impl Into<String>) -> Error {
        Error::unsupported(UnsupportedKind::Construct(what.into()))
    }

    /// Creates an unsupported column type error naming the field and its type.
    pub fn unsupported_column_type(field: impl Into<String>, ty: Type) -> Error {
        Error::unsupported(UnsupportedKind::ColumnType {
            field: field.into(),
            ty,
        })
    }

    /// Creates an unsupported multi-sort error.
    pub fn unsupported_multi_sort(collection: impl Into<String>) -> Error {
        Error::unsupported(UnsupportedKind::MultiSort {
            collection: collection.into(),
        })
    }

    /// Creates an unsupported field projection error.
    pub fn unsupported_field_projection(collection: impl Into<String>) -> Error {
        Error::unsupported(UnsupportedKind::FieldProjection {
            collection: collection.into(),
        })
    }

    /// Returns the unsupported kind, if this is an unsupported error.
    pub fn unsupported_kind(&self) -> Option<&UnsupportedKind> {
        match self.kind() {
            super::ErrorKind::Unsupported(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Returns `true` for any unsupported error.
    pub fn is_unsupported(&self) -> bool {
        self.unsupported_kind().is_some()
    }

    /// Returns `true` if this error is an unsupported construct error.
    pub fn is_unsupported_construct(&self) -> bool {
        matches!(self.unsupported_kind(), Some(UnsupportedKind::Construct(_)))
    }

    /// Returns `true` if this error is an unsupported column type error.
    pub fn is_unsupported_column_type(&self) -> bool {
        matches!(
            self.unsupported_kind(),
            Some(UnsupportedKind::ColumnType { .. })
        )
    }

    /// Returns `true` if this error is an unsupported multi-sort error.
    pub fn is_unsupported_multi_sort(&self) -> bool {
        matches!(
            self.unsupported_kind(),
            Some(UnsupportedKind::MultiSort { .. })
        )
    }

    /// Returns `true` if this error is an unsupported field projection error.
    pub fn is_unsupported_field_projection(&self) -> bool {
        matches!(
            self.unsupported_kind(),
            Some(UnsupportedKind::FieldProjection { .. })
        )
    }
}
