use super::*;
use crate::{err, Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Holds the model descriptor of every registered collection.
#[derive(Debug, Default)]
pub struct Registry {
    /// Prepended to every default collection name
    table_prefix: String,

    entries: IndexMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    def: ModelDef,
    descriptor: Arc<ModelDescriptor>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn with_table_prefix(prefix: impl Into<String>) -> Registry {
        Registry {
            table_prefix: prefix.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Records the fields of `def`. Relations are resolved by [`build`].
    ///
    /// [`build`]: Registry::build
    pub fn register(&mut self, def: ModelDef) -> Result<()> {
        if self.entries.contains_key(&def.name) {
            return Err(Error::duplicate_collection(&def.name));
        }

        let descriptor = self.describe(&def)?;
        self.entries.insert(
            def.name.clone(),
            Entry {
                def,
                descriptor: Arc::new(descriptor),
            },
        );
        Ok(())
    }

    fn describe(&self, def: &ModelDef) -> Result<ModelDescriptor> {
        let mut fields = IndexMap::new();
        let mut relation_names = vec![];

        for field in &def.fields {
            if fields.contains_key(&field.name) || relation_names.contains(&&field.name) {
                return Err(Error::invalid_schema(format!(
                    "duplicate field `{}` on `{}`",
                    field.name, def.name
                )));
            }

            let FieldKind::Attribute(ty) = field.kind else {
                relation_names.push(&field.name);
                continue;
            };

            if field.constraints.primary_key && field.relation.foreign_key.is_some() {
                return Err(Error::invalid_schema(format!(
                    "primary key `{}.{}` cannot name a foreign key",
                    def.name, field.name
                )));
            }

            if !field.constraints.embed.is_empty() && ty != crate::stmt::Type::Json {
                return Err(Error::invalid_schema(format!(
                    "embedded field `{}.{}` must have type json",
                    def.name, field.name
                )));
            }

            fields.insert(
                field.name.clone(),
                FieldDescriptor {
                    name: field.name.clone(),
                    column: field
                        .column
                        .clone()
                        .unwrap_or_else(|| name::column_name(&field.name)),
                    ty,
                    constraints: field.constraints.clone(),
                },
            );
        }

        let mut primary_keys = fields.values().filter(|field| field.is_primary_key());
        let primary_key = match (primary_keys.next(), primary_keys.next()) {
            (Some(field), None) => field.name.clone(),
            (None, _) => {
                return Err(Error::invalid_schema(format!(
                    "`{}` has no primary key",
                    def.name
                )))
            }
            (Some(_), Some(_)) => {
                return Err(Error::invalid_schema(format!(
                    "`{}` declares more than one primary key",
                    def.name
                )))
            }
        };

        Ok(ModelDescriptor {
            name: def.name.clone(),
            table: def
                .table
                .clone()
                .unwrap_or_else(|| name::table_name(&self.table_prefix, &def.name)),
            fields,
            primary_key,
            relations: IndexMap::new(),
            hooks: def.hooks.clone(),
            built: false,
        })
    }

    /// Resolves the relations of every registered model.
    ///
    /// Idempotent. Nothing changes when resolution fails.
    pub fn build(&mut self) -> Result<()> {
        let mut built = IndexMap::new();

        for entry in self.entries.values() {
            let mut descriptor = ModelDescriptor::clone(&entry.descriptor);
            descriptor.relations.clear();

            for field in &entry.def.fields {
                if matches!(field.kind, FieldKind::Attribute(_)) {
                    continue;
                }

                let relation = self.resolve(entry, field).map_err(|e| {
                    e.context(err!("relation `{}.{}`", entry.def.name, field.name))
                })?;
                descriptor.relations.insert(field.name.clone(), relation);
            }

            descriptor.built = true;
            built.insert(descriptor.name.clone(), descriptor);
        }

        verify::auto_create_is_acyclic(&built)?;

        for (name, descriptor) in built {
            if let Some(entry) = self.entries.get_mut(&name) {
                entry.descriptor = Arc::new(descriptor);
            }
        }

        Ok(())
    }

    fn resolve(&self, owner: &Entry, field: &Field) -> Result<RelationDescriptor> {
        let target_name = match &field.kind {
            FieldKind::One(target) | FieldKind::Many(target) => target,
            FieldKind::Attribute(_) => unreachable!(),
        };

        let target = self
            .entries
            .get(target_name)
            .ok_or_else(|| Error::unknown_collection(target_name))?;

        let options = &field.relation;
        let mut relation = RelationDescriptor {
            name: field.name.clone(),
            kind: RelationKind::HasOne,
            owner: owner.def.name.clone(),
            target: target.def.name.clone(),
            owner_field: None,
            target_field: None,
            join: None,
            auto_create: options.auto_create,
            auto_update: options.auto_update,
            auto_delete: options.auto_delete,
        };

        let candidates = |default_from: &str| -> Vec<String> {
            match &options.foreign_key {
                Some(fk) => vec![fk.clone()],
                None => name::foreign_key_candidates(default_from).to_vec(),
            }
        };

        let find = |def: &ModelDef, candidates: &[String]| {
            candidates
                .iter()
                .find_map(|candidate| def.attribute(candidate))
                .map(|field| field.name.clone())
        };

        match &field.kind {
            FieldKind::One(_) => {
                let on_owner = candidates(&field.name);
                let on_target = candidates(&owner.def.name);

                if let Some(fk) = find(&owner.def, &on_owner) {
                    relation.kind = RelationKind::HasOne;
                    relation.owner_field = Some(fk);
                } else if let Some(fk) = find(&target.def, &on_target) {
                    relation.kind = RelationKind::BelongsTo;
                    relation.target_field = Some(fk);
                } else {
                    return Err(Error::invalid_schema(format!(
                        "no foreign key; expected `{}` on `{}` or `{}` on `{}`",
                        on_owner[0], owner.def.name, on_target[0], target.def.name
                    )));
                }
            }
            FieldKind::Many(_) if options.many_to_many => {
                let owner_desc = &owner.descriptor;
                let target_desc = &target.descriptor;

                let join = JoinTable {
                    name: options
                        .join_table
                        .clone()
                        .unwrap_or_else(|| name::join_table(&owner_desc.table, &field.name)),
                    owner_column: name::join_column(
                        &owner_desc.table,
                        owner_desc.primary_key_column(),
                    ),
                    owner_key_ty: owner_desc.primary_key_field().ty,
                    // A model related to itself names the far side after the relation
                    target_column: if owner_desc.name == target_desc.name {
                        name::join_column(
                            &name::column_name(&field.name),
                            target_desc.primary_key_column(),
                        )
                    } else {
                        name::join_column(&target_desc.table, target_desc.primary_key_column())
                    },
                    target_key_ty: target_desc.primary_key_field().ty,
                };

                if join.owner_column == join.target_column {
                    return Err(Error::invalid_schema(format!(
                        "join collection `{}` would use `{}` for both sides",
                        join.name, join.owner_column
                    )));
                }

                relation.kind = RelationKind::ManyToMany;
                relation.join = Some(join);
            }
            FieldKind::Many(_) => {
                let on_target = candidates(&owner.def.name);

                let Some(fk) = find(&target.def, &on_target) else {
                    return Err(Error::invalid_schema(format!(
                        "no foreign key; expected `{}` on `{}`",
                        on_target[0], target.def.name
                    )));
                };

                relation.kind = RelationKind::HasMany;
                relation.target_field = Some(fk);
            }
            FieldKind::Attribute(_) => unreachable!(),
        }

        Ok(relation)
    }

    /// Returns the descriptor registered for `name`, built or not.
    pub fn lookup(&self, name: &str) -> Result<&Arc<ModelDescriptor>> {
        self.entries
            .get(name)
            .map(|entry| &entry.descriptor)
            .ok_or_else(|| Error::unknown_collection(name))
    }

    /// Returns the descriptor for `name`, failing if `build()` has not run
    /// since it was registered.
    pub fn model(&self, name: &str) -> Result<Arc<ModelDescriptor>> {
        let descriptor = self.lookup(name)?;
        if !descriptor.is_built() {
            return Err(Error::model_not_built(name));
        }
        Ok(descriptor.clone())
    }

    /// Built models, in registration order.
    pub fn models(&self) -> impl Iterator<Item = &Arc<ModelDescriptor>> {
        self.entries
            .values()
            .map(|entry| &entry.descriptor)
            .filter(|descriptor| descriptor.is_built())
    }

    pub fn is_built(&self) -> bool {
        self.entries.values().all(|entry| entry.descriptor.is_built())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
