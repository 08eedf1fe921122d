use super::Error;

/// Error when a collection, field or relation name does not resolve.
#[derive(Debug)]
pub(super) struct UnknownNameError {
    kind: NameKind,
    name: Box<str>,
    scope: Option<Box<str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Collection,
    Field,
    Relation,
}

impl std::error::Error for UnknownNameError {}

impl core::fmt::Display for UnknownNameError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let kind = match self.kind {
            NameKind::Collection => "collection",
            NameKind::Field => "field",
            NameKind::Relation => "relation",
        };

        write!(f, "unknown {kind} `{}`", self.name)?;
        if let Some(scope) = &self.scope {
            write!(f, " on `{scope}`")?;
        }
        Ok(())
    }
}

impl Error {
    fn unknown_name(kind: NameKind, name: &str, scope: Option<&str>) -> Error {
        Error::from(super::ErrorKind::UnknownName(UnknownNameError {
            kind,
            name: name.into(),
            scope: scope.map(Into::into),
        }))
    }

    /// Creates an unknown collection error.
    pub fn unknown_collection(name: impl AsRef<str>) -> Error {
        Error::unknown_name(NameKind::Collection, name.as_ref(), None)
    }

    /// Creates an unknown field error for a field of `collection`.
    pub fn unknown_field(collection: impl AsRef<str>, name: impl AsRef<str>) -> Error {
        Error::unknown_name(NameKind::Field, name.as_ref(), Some(collection.as_ref()))
    }

    /// Creates an unknown relation error for a relation of `collection`.
    pub fn unknown_relation(collection: impl AsRef<str>, name: impl AsRef<str>) -> Error {
        Error::unknown_name(
            NameKind::Relation,
            name.as_ref(),
            Some(collection.as_ref()),
        )
    }

    /// Returns `true` if this error is an unknown collection error.
    pub fn is_unknown_collection(&self) -> bool {
        self.is_unknown_name(NameKind::Collection)
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        self.is_unknown_name(NameKind::Field)
    }

    /// Returns `true` if this error is an unknown relation error.
    pub fn is_unknown_relation(&self) -> bool {
        self.is_unknown_name(NameKind::Relation)
    }

    fn is_unknown_name(&self, kind: NameKind) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownName(err) if err.kind == kind)
    }
}
