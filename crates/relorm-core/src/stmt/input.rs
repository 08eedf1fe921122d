use super::*;
use crate::Result;

/// Supplies column values and subquery results to [`Expr::eval`].
pub trait Input {
    /// Value of `column` in the row being evaluated.
    fn column(&mut self, column: &ExprColumn) -> Result<Value>;

    /// Values of the first selected column of every row matched by `select`.
    fn subquery(&mut self, select: &Select) -> Result<Vec<Value>>;
}
