use super::*;
use crate::{
    stmt::{Type, Value},
    Record, Result,
};

use std::sync::Arc;

/// Registration source for a model.
///
/// ```
/// use relorm_core::schema::{Field, ModelDef};
///
/// let task = ModelDef::new("Task")
///     .field(Field::i64("Id").primary_key().auto_increment())
///     .field(Field::string("Name").required())
///     .field(Field::i64("ProjectId"))
///     .field(Field::one("Project", "Project").auto_create());
/// assert_eq!(task.name(), "Task");
/// ```
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub(super) name: String,
    pub(super) table: Option<String>,
    pub(super) fields: Vec<Field>,
    pub(super) hooks: Hooks,
}

/// One field of a [`ModelDef`]: a stored attribute or a relation to another
/// collection.
#[derive(Debug, Clone)]
pub struct Field {
    pub(super) name: String,
    pub(super) column: Option<String>,
    pub(super) kind: FieldKind,
    pub(super) constraints: Constraints,
    pub(super) relation: RelationOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum FieldKind {
    Attribute(Type),

    /// Field typed as a single record of another collection
    One(String),

    /// Field typed as a collection of records of another collection
    Many(String),
}

#[derive(Debug, Clone, Default)]
pub(super) struct RelationOptions {
    pub(super) many_to_many: bool,
    pub(super) join_table: Option<String>,
    pub(super) foreign_key: Option<String>,
    pub(super) auto_create: bool,
    pub(super) auto_update: bool,
    pub(super) auto_delete: bool,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> ModelDef {
        ModelDef {
            name: name.into(),
            table: None,
            fields: vec![],
            hooks: Hooks::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overrides the backend collection name.
    pub fn table(mut self, table: impl Into<String>) -> ModelDef {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, field: Field) -> ModelDef {
        self.fields.push(field);
        self
    }

    pub fn hook(
        mut self,
        stage: HookStage,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hooks.set(stage, Arc::new(hook));
        self
    }

    pub fn before_create(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::BeforeCreate, hook)
    }

    pub fn validate(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::Validate, hook)
    }

    pub fn after_create(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::AfterCreate, hook)
    }

    pub fn before_update(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::BeforeUpdate, hook)
    }

    pub fn after_update(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::AfterUpdate, hook)
    }

    pub fn before_delete(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::BeforeDelete, hook)
    }

    pub fn after_delete(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::AfterDelete, hook)
    }

    pub fn after_query(
        self,
        hook: impl Fn(&mut Record) -> Result<()> + Send + Sync + 'static,
    ) -> ModelDef {
        self.hook(HookStage::AfterQuery, hook)
    }

    pub(super) fn attribute(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .filter(|field| matches!(field.kind, FieldKind::Attribute(_)))
            .find(|field| field.name == name || field.column.as_deref() == Some(name))
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Field {
        Field::with_kind(name.into(), FieldKind::Attribute(ty))
    }

    pub fn bool(name: impl Into<String>) -> Field {
        Field::new(name, Type::Bool)
    }

    pub fn i64(name: impl Into<String>) -> Field {
        Field::new(name, Type::I64)
    }

    pub fn f64(name: impl Into<String>) -> Field {
        Field::new(name, Type::F64)
    }

    pub fn string(name: impl Into<String>) -> Field {
        Field::new(name, Type::String)
    }

    pub fn time(name: impl Into<String>) -> Field {
        Field::new(name, Type::Time)
    }

    pub fn bytes(name: impl Into<String>) -> Field {
        Field::new(name, Type::Bytes)
    }

    pub fn json(name: impl Into<String>) -> Field {
        Field::new(name, Type::Json)
    }

    /// Field holding a single record of `target`.
    pub fn one(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field::with_kind(name.into(), FieldKind::One(target.into()))
    }

    /// Field holding a collection of `target` records.
    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field::with_kind(name.into(), FieldKind::Many(target.into()))
    }

    fn with_kind(name: String, kind: FieldKind) -> Field {
        Field {
            name,
            column: None,
            kind,
            constraints: Constraints::default(),
            relation: RelationOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overrides the backend column name.
    pub fn column(mut self, column: impl Into<String>) -> Field {
        self.column = Some(column.into());
        self
    }

    pub fn primary_key(mut self) -> Field {
        self.constraints.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Field {
        self.constraints.auto_increment = true;
        self
    }

    pub fn required(mut self) -> Field {
        self.constraints.required = true;
        self
    }

    pub fn unique(mut self) -> Field {
        self.constraints.unique = true;
        self
    }

    pub fn unique_with(mut self, group: impl Into<String>) -> Field {
        self.constraints.unique_group = Some(group.into());
        self
    }

    pub fn min_len(mut self, len: usize) -> Field {
        self.constraints.min_len = Some(len);
        self
    }

    pub fn max_len(mut self, len: usize) -> Field {
        self.constraints.max_len = Some(len);
        self
    }

    pub fn min(mut self, min: f64) -> Field {
        self.constraints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Field {
        self.constraints.max = Some(max);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Field {
        self.constraints.default = Some(value.into());
        self
    }

    pub fn ignore_if_zero(mut self) -> Field {
        self.constraints.ignore_if_zero = true;
        self
    }

    pub fn marshal(mut self) -> Field {
        self.constraints.marshal = true;
        self
    }

    /// Stores a structured value as one column per sub-field.
    pub fn embed<N: Into<String>>(mut self, sub_fields: impl IntoIterator<Item = (N, Type)>) -> Field {
        self.constraints.embed = sub_fields
            .into_iter()
            .map(|(name, ty)| EmbedField {
                name: name.into(),
                ty,
            })
            .collect();
        self
    }

    pub fn many_to_many(mut self) -> Field {
        self.relation.many_to_many = true;
        self
    }

    /// Names the join collection of a many-to-many relation.
    pub fn join_table(mut self, name: impl Into<String>) -> Field {
        self.relation.many_to_many = true;
        self.relation.join_table = Some(name.into());
        self
    }

    pub fn foreign_key(mut self, field: impl Into<String>) -> Field {
        self.relation.foreign_key = Some(field.into());
        self
    }

    pub fn auto_create(mut self) -> Field {
        self.relation.auto_create = true;
        self
    }

    pub fn auto_update(mut self) -> Field {
        self.relation.auto_update = true;
        self
    }

    pub fn auto_delete(mut self) -> Field {
        self.relation.auto_delete = true;
        self
    }
}
