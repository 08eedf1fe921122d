use super::*;
use crate::{Error, Result};

/// Delete-by-filter statement. Without a filter every record is removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delete {
    pub collection: String,
    pub filter: Option<Expr>,
}

impl Delete {
    pub fn new(collection: impl Into<String>) -> Self {
        Delete {
            collection: collection.into(),
            filter: None,
        }
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
            return Err(Error::invalid_expression("delete", Invalid::EmptyCollection));
        }

        match &self.filter {
            Some(filter) => filter.validate(),
            None => Ok(()),
        }
    }
}
