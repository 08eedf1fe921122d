use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ExprColumn,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<ExprColumn>) -> Self {
        OrderBy {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<ExprColumn>) -> Self {
        OrderBy {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Parses `"Name"` (ascending) or `"-Name"` (descending).
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(name) => OrderBy::desc(name.trim()),
            None => OrderBy::asc(spec.trim_start_matches('+').trim()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.column.name.is_empty() {
            return Err(Error::invalid_expression("sort", Invalid::EmptyField));
        }
        Ok(())
    }
}
