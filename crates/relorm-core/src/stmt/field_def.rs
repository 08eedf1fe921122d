use super::*;
use crate::{Error, Result};

/// Field (column) definition used by create-collection and create-field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,

    /// Upper bound on string length, when declared.
    pub max_len: Option<usize>,

    /// The field stores a structured value as one opaque blob.
    pub opaque: bool,

    pub constraints: Vec<Constraint>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            max_len: None,
            opaque: false,
            constraints: vec![],
        }
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&Constraint::PrimaryKey)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.constraints.contains(&Constraint::AutoIncrement)
    }

    pub fn is_unique(&self) -> bool {
        self.constraints.contains(&Constraint::Unique)
    }

    /// Primary keys and unique fields are backed by an index.
    pub fn is_indexed(&self) -> bool {
        self.is_primary_key() || self.is_unique()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_expression("field definition", Invalid::EmptyField));
        }
        self.constraints.iter().try_for_each(Constraint::validate)
    }
}
