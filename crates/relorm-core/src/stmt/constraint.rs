use super::*;
use crate::{Error, Result};

/// Column-level constraint in a field definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
    Unique,
    Default(Expr),
}

impl Constraint {
    pub fn default_value(value: impl Into<Value>) -> Self {
        Self::Default(Expr::Value(value.into()))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Default(expr) if !expr.is_literal() => Err(Error::invalid_expression(
                "constraint",
                Invalid::NonLiteralDefault,
            )),
            _ => Ok(()),
        }
    }
}
