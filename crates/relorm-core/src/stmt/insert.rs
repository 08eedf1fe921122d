use super::*;
use crate::{Error, Result};

/// Create-record statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insert {
    pub collection: String,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,

    /// Columns returned by the statement, for dialects with RETURNING.
    pub returning: Vec<String>,

    /// Key column the backend is expected to generate a value for.
    pub generated_key: Option<String>,
}

impl Insert {
    pub fn new(collection: impl Into<String>) -> Self {
        Insert {
            collection: collection.into(),
            ..Insert::default()
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn generated_key(mut self, column: impl Into<String>) -> Self {
        self.generated_key = Some(column.into());
        self
    }

    /// Column/value pairs in statement order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::invalid_expression("insert", Invalid::EmptyCollection));
        }

        if self.columns.len() != self.values.len() {
            return Err(Error::invalid_expression(
                "insert",
                Invalid::ValueCountMismatch {
                    columns: self.columns.len(),
                    values: self.values.len(),
                },
            ));
        }

        if self.columns.iter().any(String::is_empty) {
            return Err(Error::invalid_expression("insert", Invalid::EmptyField));
        }

        self.values.iter().try_for_each(Expr::validate)
    }
}
