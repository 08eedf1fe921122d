use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

/// Update-by-filter statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    pub collection: String,
    pub assignments: Vec<Assignment>,
    pub filter: Option<Expr>,
}

impl Update {
    pub fn new(collection: impl Into<String>) -> Self {
        Update {
            collection: collection.into(),
            ..Update::default()
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Expr>) -> Self {
        self.assignments.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn filter(mut self, expr: impl Into<Expr>) -> Self {
        let expr = expr.into();
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
        self
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::invalid_expression("update", Invalid::EmptyCollection));
        }

        if self.assignments.is_empty() {
            return Err(Error::invalid_expression("update", Invalid::EmptyAssignments));
        }

        for assignment in &self.assignments {
            if assignment.column.is_empty() {
                return Err(Error::invalid_expression("update", Invalid::EmptyField));
            }
            assignment.value.validate()?;
        }

        match &self.filter {
            Some(filter) => filter.validate(),
            None => Ok(()),
        }
    }
}
