use std::fmt;

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I64,
    F64,
    String,
    Time,
    Bytes,

    /// Structured value (object / array)
    Json,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::I64 | Self::F64)
    }

    pub fn is_string(self) -> bool {
        matches!(self, Self::String)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Time => "time",
            Self::Bytes => "bytes",
            Self::Json => "json",
        })
    }
}
