use super::Invalid;

use std::{fmt, str::FromStr};

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Like,
    NotLike,
    In,
    NotIn,
}

impl BinaryOp {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::Eq)
    }

    pub fn is_ne(self) -> bool {
        matches!(self, Self::Ne)
    }

    /// `IN` and `NOT IN` take a list or a subquery on the right-hand side.
    pub fn is_set_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    pub fn negate(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Ge => Self::Lt,
            Self::Gt => Self::Le,
            Self::Le => Self::Gt,
            Self::Lt => Self::Ge,
            Self::Like => Self::NotLike,
            Self::NotLike => Self::Like,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
        }
    }
}

impl FromStr for BinaryOp {
    type Err = Invalid;

    fn from_str(s: &str) -> Result<Self, Invalid> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Self::Eq,
            "!=" | "<>" => Self::Ne,
            ">=" => Self::Ge,
            ">" => Self::Gt,
            "<=" => Self::Le,
            "<" => Self::Lt,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            "in" => Self::In,
            "not in" => Self::NotIn,
            _ => return Err(Invalid::UnknownOperator(s.to_string())),
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        match self {
            Eq => "=".fmt(f),
            Ne => "<>".fmt(f),
            Ge => ">=".fmt(f),
            Gt => ">".fmt(f),
            Le => "<=".fmt(f),
            Lt => "<".fmt(f),
            Like => "LIKE".fmt(f),
            NotLike => "NOT LIKE".fmt(f),
            In => "IN".fmt(f),
            NotIn => "NOT IN".fmt(f),
        }
    }
}

impl fmt::Debug for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_operators() {
        assert_eq!("=".parse::<BinaryOp>(), Ok(BinaryOp::Eq));
        assert_eq!("<>".parse::<BinaryOp>(), Ok(BinaryOp::Ne));
        assert_eq!("!=".parse::<BinaryOp>(), Ok(BinaryOp::Ne));
        assert_eq!("NOT LIKE".parse::<BinaryOp>(), Ok(BinaryOp::NotLike));
        assert_eq!(" in ".parse::<BinaryOp>(), Ok(BinaryOp::In));
    }

    #[test]
    fn unknown_operator() {
        assert_eq!(
            "~=".parse::<BinaryOp>(),
            Err(Invalid::UnknownOperator("~=".to_string()))
        );
    }
}
