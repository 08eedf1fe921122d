use super::*;
use crate::{Error, Result};

/// An expression node.
///
/// Every clause-accepting node takes an `Expr`, so a literal value and a
/// nested statement are interchangeable wherever a clause is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value, rendered as a placeholder plus a positional argument
    Value(Value),

    /// Quoted identifier
    Ident(String),

    /// Optionally qualified column reference
    Column(ExprColumn),

    /// Raw text, emitted verbatim
    Text(String),

    /// Function call
    Func(ExprFunc),

    /// AND expression
    And(ExprAnd),

    /// OR expression
    Or(ExprOr),

    /// Negation
    Not(Box<Expr>),

    /// Column compared against a clause
    Filter(ExprFilter),

    /// Nested statement
    Stmt(Box<Statement>),
}

impl Expr {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ExprColumn::new(name))
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ExprColumn::qualified(table, name))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn not(expr: impl Into<Expr>) -> Self {
        Self::Not(Box::new(expr.into()))
    }

    pub fn stmt(stmt: impl Into<Statement>) -> Self {
        Self::Stmt(Box::new(stmt.into()))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            _ => None,
        }
    }

    /// Literal-only expressions may appear as inline DDL defaults.
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Value(_) | Self::Text(_))
    }

    /// Checks the expression tree, returning the first invalid node.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Value(_) | Self::Text(_) => Ok(()),
            Self::Ident(name) if name.is_empty() => {
                Err(Error::invalid_expression("identifier", Invalid::EmptyName))
            }
            Self::Ident(_) => Ok(()),
            Self::Column(column) => column.validate(),
            Self::Func(func) => func.validate(),
            Self::And(and) => and.operands.iter().try_for_each(Expr::validate),
            Self::Or(or) => or.operands.iter().try_for_each(Expr::validate),
            Self::Not(expr) => expr.validate(),
            Self::Filter(filter) => filter.validate(),
            Self::Stmt(stmt) => stmt.validate(),
        }
    }

    /// Visits every column reference outside nested statements.
    pub fn columns_mut(&mut self, f: &mut impl FnMut(&mut ExprColumn) -> Result<()>) -> Result<()> {
        match self {
            Self::Column(column) => f(column),
            Self::Func(func) => func.args.iter_mut().try_for_each(|arg| arg.columns_mut(f)),
            Self::And(ExprAnd { operands }) | Self::Or(ExprOr { operands }) => {
                operands.iter_mut().try_for_each(|expr| expr.columns_mut(f))
            }
            Self::Not(expr) => expr.columns_mut(f),
            Self::Filter(filter) => {
                f(&mut filter.column)?;
                match &mut filter.clause {
                    Some(clause) => clause.columns_mut(f),
                    None => Ok(()),
                }
            }
            Self::Value(_) | Self::Ident(_) | Self::Text(_) | Self::Stmt(_) => Ok(()),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}

impl From<Select> for Expr {
    fn from(value: Select) -> Self {
        Self::Stmt(Box::new(value.into()))
    }
}

impl From<Statement> for Expr {
    fn from(value: Statement) -> Self {
        Self::Stmt(Box::new(value))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}
