use super::*;
use crate::{Error, Result};

/// `column <op> clause`.
///
/// The clause is a literal value, a list (for `IN`), another column or a
/// nested select.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFilter {
    pub column: ExprColumn,
    pub op: BinaryOp,
    pub clause: Option<Box<Expr>>,
}

impl Expr {
    pub fn filter(column: impl Into<ExprColumn>, op: BinaryOp, clause: impl Into<Expr>) -> Self {
        Self::Filter(ExprFilter {
            column: column.into(),
            op,
            clause: Some(Box::new(clause.into())),
        })
    }

    pub fn eq(column: impl Into<ExprColumn>, clause: impl Into<Expr>) -> Self {
        Self::filter(column, BinaryOp::Eq, clause)
    }

    pub fn in_list(column: impl Into<ExprColumn>, values: Vec<Value>) -> Self {
        Self::filter(column, BinaryOp::In, Value::List(values))
    }

    pub fn in_subquery(column: impl Into<ExprColumn>, select: Select) -> Self {
        Self::filter(column, BinaryOp::In, select)
    }
}

impl ExprFilter {
    pub fn clause(&self) -> Option<&Expr> {
        self.clause.as_deref()
    }

    pub fn validate(&self) -> Result<()> {
        if self.column.name.is_empty() {
            return Err(Error::invalid_expression("filter", Invalid::EmptyField));
        }

        let Some(clause) = &self.clause else {
            return Err(Error::invalid_expression("filter", Invalid::MissingClause));
        };

        clause.validate()
    }
}

impl From<ExprFilter> for Expr {
    fn from(value: ExprFilter) -> Self {
        Self::Filter(value)
    }
}
