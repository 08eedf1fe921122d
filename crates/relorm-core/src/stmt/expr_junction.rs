use super::*;

/// Conjunction. An empty conjunction holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

/// Disjunction. An empty disjunction fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    /// `lhs AND rhs`, flattening nested conjunctions. A literal `true` on
    /// either side is dropped.
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let (lhs, rhs) = (lhs.into(), rhs.into());

        if lhs.is_true() {
            return rhs;
        }
        if rhs.is_true() {
            return lhs;
        }

        let mut operands = vec![];
        for expr in [lhs, rhs] {
            match expr {
                Self::And(and) => operands.extend(and.operands),
                expr => operands.push(expr),
            }
        }
        Self::And(ExprAnd { operands })
    }

    /// `lhs OR rhs`, flattening nested disjunctions. A literal `false` on
    /// either side is dropped.
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let (lhs, rhs) = (lhs.into(), rhs.into());

        if lhs.is_false() {
            return rhs;
        }
        if rhs.is_false() {
            return lhs;
        }

        let mut operands = vec![];
        for expr in [lhs, rhs] {
            match expr {
                Self::Or(or) => operands.extend(or.operands),
                expr => operands.push(expr),
            }
        }
        Self::Or(ExprOr { operands })
    }

    fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Self {
        Self::And(value)
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}
