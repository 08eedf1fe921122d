use super::*;
use crate::{Error, Result};

/// Reference to a column, optionally qualified by a table name or join alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

impl ExprColumn {
    pub fn new(name: impl Into<String>) -> Self {
        ExprColumn {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_expression("column", Invalid::EmptyField));
        }
        Ok(())
    }
}

impl From<&str> for ExprColumn {
    fn from(value: &str) -> Self {
        ExprColumn::new(value)
    }
}

impl From<String> for ExprColumn {
    fn from(value: String) -> Self {
        ExprColumn::new(value)
    }
}
