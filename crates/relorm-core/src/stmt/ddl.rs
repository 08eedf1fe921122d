use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCollection {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropCollection {
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameCollection {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateField {
    pub collection: String,
    pub field: FieldDef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropField {
    pub collection: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameField {
    pub collection: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub name: String,
    pub collection: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropIndex {
    pub name: String,
    pub collection: String,
}

fn require(kind: &'static str, value: &str, reason: Invalid) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_expression(kind, reason));
    }
    Ok(())
}

impl CreateCollection {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        CreateCollection {
            name: name.into(),
            fields,
            if_not_exists: true,
        }
    }

    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.is_primary_key())
    }

    pub(super) fn validate(&self) -> Result<()> {
        require("create collection", &self.name, Invalid::EmptyCollection)?;
        self.fields.iter().try_for_each(FieldDef::validate)
    }
}

impl DropCollection {
    pub(super) fn validate(&self) -> Result<()> {
        require("drop collection", &self.name, Invalid::EmptyCollection)
    }
}

impl RenameCollection {
    pub(super) fn validate(&self) -> Result<()> {
        require("rename collection", &self.from, Invalid::EmptyCollection)?;
        require("rename collection", &self.to, Invalid::EmptyName)
    }
}

impl CreateField {
    pub(super) fn validate(&self) -> Result<()> {
        require("create field", &self.collection, Invalid::EmptyCollection)?;
        self.field.validate()
    }
}

impl DropField {
    pub(super) fn validate(&self) -> Result<()> {
        require("drop field", &self.collection, Invalid::EmptyCollection)?;
        require("drop field", &self.name, Invalid::EmptyField)
    }
}

impl RenameField {
    pub(super) fn validate(&self) -> Result<()> {
        require("rename field", &self.collection, Invalid::EmptyCollection)?;
        require("rename field", &self.from, Invalid::EmptyField)?;
        require("rename field", &self.to, Invalid::EmptyName)
    }
}

impl CreateIndex {
    pub(super) fn validate(&self) -> Result<()> {
        require("create index", &self.name, Invalid::EmptyName)?;
        require("create index", &self.collection, Invalid::EmptyCollection)?;
        if self.columns.is_empty() {
            return Err(Error::invalid_expression(
                "create index",
                Invalid::EmptyFieldList,
            ));
        }
        Ok(())
    }
}

impl DropIndex {
    pub(super) fn validate(&self) -> Result<()> {
        require("drop index", &self.name, Invalid::EmptyName)
    }
}
