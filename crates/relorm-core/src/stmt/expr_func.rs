use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Func(ExprFunc {
            name: name.into(),
            args,
        })
    }

    /// `count(*)`
    pub fn count_star() -> Self {
        Self::func("count", vec![Expr::text("*")])
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Self::Func(func) if func.name.eq_ignore_ascii_case("count"))
    }
}

impl ExprFunc {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_expression("function", Invalid::EmptyName));
        }
        self.args.iter().try_for_each(Expr::validate)
    }
}
