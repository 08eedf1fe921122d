use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
}

/// A join against another collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub collection: String,

    /// Alias the joined collection is referenced by in columns.
    pub alias: Option<String>,

    pub on: Option<Expr>,

    /// Columns of the joined collection added to the select list.
    pub fields: Vec<ExprColumn>,

    /// Relation path the join was expanded from (`"Todos.Tags"`).
    pub path: Option<String>,
}

impl Join {
    pub fn new(kind: JoinKind, collection: impl Into<String>, on: Expr) -> Self {
        Join {
            kind,
            collection: collection.into(),
            alias: None,
            on: Some(on),
            fields: vec![],
            path: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Name columns of the joined collection are qualified with.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.collection)
    }

    pub fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::invalid_expression("join", Invalid::EmptyCollection));
        }

        match &self.on {
            Some(on) => on.validate(),
            None => Err(Error::invalid_expression("join", Invalid::NoJoinCondition)),
        }
    }
}
