use std::fmt;

/// The first missing or invalid element found by `validate()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
    EmptyCollection,
    EmptyField,
    EmptyName,
    EmptyFieldList,
    EmptyAssignments,
    UnknownOperator(String),
    MissingClause,
    NoJoinCondition,
    NonLiteralDefault,
    ValueCountMismatch { columns: usize, values: usize },
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollection => f.write_str("empty collection"),
            Self::EmptyField => f.write_str("empty field"),
            Self::EmptyName => f.write_str("empty name"),
            Self::EmptyFieldList => f.write_str("empty field list"),
            Self::EmptyAssignments => f.write_str("empty assignments"),
            Self::UnknownOperator(op) => write!(f, "unknown operator `{op}`"),
            Self::MissingClause => f.write_str("missing clause"),
            Self::NoJoinCondition => f.write_str("no join condition"),
            Self::NonLiteralDefault => f.write_str("default value is not a literal"),
            Self::ValueCountMismatch { columns, values } => {
                write!(f, "{columns} columns but {values} values")
            }
        }
    }
}
