use super::*;
use crate::{Error, Result};

use indexmap::IndexMap;

/// Field and relation metadata for one collection.
///
/// Created by `Registry::register` and completed by `Registry::build`, after
/// which it is shared immutably by every operation on the collection.
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    pub name: String,

    /// Backend collection name
    pub table: String,

    pub fields: IndexMap<String, FieldDescriptor>,

    /// Logical name of the primary key field
    pub primary_key: String,

    pub relations: IndexMap<String, RelationDescriptor>,

    pub hooks: Hooks,

    pub(super) built: bool,
}

impl ModelDescriptor {
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Resolves a field by logical name or backend column name.
    pub fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .get(name)
            .or_else(|| self.fields.values().find(|field| field.column == name))
            .ok_or_else(|| Error::unknown_field(&self.name, name))
    }

    pub fn relation(&self, name: &str) -> Result<&RelationDescriptor> {
        self.relations
            .get(name)
            .ok_or_else(|| Error::unknown_relation(&self.name, name))
    }

    pub fn primary_key_field(&self) -> &FieldDescriptor {
        &self.fields[&self.primary_key]
    }

    pub fn primary_key_column(&self) -> &str {
        &self.primary_key_field().column
    }

    /// Fields sharing a unique-with group, keyed by group name.
    pub fn unique_groups(&self) -> IndexMap<&str, Vec<&FieldDescriptor>> {
        let mut groups: IndexMap<&str, Vec<&FieldDescriptor>> = IndexMap::new();
        for field in self.fields.values() {
            if let Some(group) = &field.constraints.unique_group {
                groups.entry(group.as_str()).or_default().push(field);
            }
        }
        groups
    }

    /// Every backend column, in field order.
    pub fn storage_columns(&self) -> Vec<String> {
        self.fields
            .values()
            .flat_map(|field| field.storage_columns())
            .map(|(column, _)| column)
            .collect()
    }
}
