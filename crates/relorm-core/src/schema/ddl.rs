use super::*;
use crate::{
    stmt::{Constraint, CreateCollection, CreateIndex, FieldDef, Statement, Type},
    Result,
};

impl ModelDescriptor {
    /// Create-collection statement for the model's own collection.
    pub fn create_collection(&self) -> Result<CreateCollection> {
        let mut fields = vec![];
        for field in self.fields.values() {
            fields.extend(field_defs(field)?);
        }
        Ok(CreateCollection::new(&self.table, fields))
    }

    /// One unique index per unique-with group.
    pub fn create_indices(&self) -> Vec<CreateIndex> {
        self.unique_groups()
            .into_iter()
            .map(|(group, fields)| CreateIndex {
                name: name::index_name(&self.table, group),
                collection: self.table.clone(),
                columns: fields.iter().map(|field| field.column.clone()).collect(),
                unique: true,
            })
            .collect()
    }
}

impl JoinTable {
    pub fn create_collection(&self) -> CreateCollection {
        let not_null = |name: &str, ty| FieldDef::new(name, ty).constraint(Constraint::NotNull);

        CreateCollection::new(
            &self.name,
            vec![
                FieldDef::new(JoinTable::ID, Type::I64)
                    .constraint(Constraint::PrimaryKey)
                    .constraint(Constraint::AutoIncrement)
                    .constraint(Constraint::NotNull),
                not_null(&self.owner_column, self.owner_key_ty),
                not_null(&self.target_column, self.target_key_ty),
            ],
        )
    }
}

impl Registry {
    /// Statements creating every built collection, its indices and the join
    /// collections of many-to-many relations (each emitted once).
    pub fn schema_statements(&self) -> Result<Vec<Statement>> {
        let mut stmts = vec![];
        let mut join_tables = vec![];

        for model in self.models() {
            stmts.push(model.create_collection()?.into());
            stmts.extend(model.create_indices().into_iter().map(Statement::from));

            for join in model.relations.values().filter_map(|r| r.join.as_ref()) {
                if !join_tables.contains(&join.name) {
                    join_tables.push(join.name.clone());
                    stmts.push(join.create_collection().into());
                }
            }
        }

        Ok(stmts)
    }
}

fn field_defs(field: &FieldDescriptor) -> Result<Vec<FieldDef>> {
    if field.is_embedded() {
        return Ok(field
            .storage_columns()
            .into_iter()
            .map(|(column, ty)| FieldDef::new(column, ty))
            .collect());
    }

    let c = &field.constraints;
    let mut def = FieldDef::new(&field.column, field.ty);
    def.max_len = c.max_len;
    def.opaque = c.marshal;

    if c.primary_key {
        def.constraints.push(Constraint::PrimaryKey);
    }
    if c.auto_increment {
        def.constraints.push(Constraint::AutoIncrement);
    }
    if c.primary_key || c.required {
        def.constraints.push(Constraint::NotNull);
    }
    if c.unique && !c.primary_key {
        def.constraints.push(Constraint::Unique);
    }
    if let Some(default) = &c.default {
        if let Some((_, value)) = field.to_storage(default)?.into_iter().next() {
            def.constraints.push(Constraint::default_value(value));
        }
    }

    Ok(vec![def])
}
