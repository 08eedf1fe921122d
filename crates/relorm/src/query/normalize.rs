use super::{join, Filter, JoinNode, Query};
use crate::Result;

use relorm_core::{
    driver::Capability,
    schema::{FieldDescriptor, ModelDescriptor},
    stmt::{BinaryOp, Expr, ExprColumn, OrderBy, Select, Value},
    Error,
};

use std::sync::Arc;

/// A query resolved against the registry and the backend's capabilities.
#[derive(Debug)]
pub(crate) struct Plan {
    pub(crate) model: Arc<ModelDescriptor>,
    pub(crate) select: Select,
    pub(crate) joins: Vec<JoinNode>,
}

impl Query {
    pub(crate) fn plan(&self) -> Result<Plan> {
        let model = self.db.model(&self.collection)?;

        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let capability = self.db.capability();
        let joins = join::expand(&self.db, &model, &self.joins)?;

        let resolver = Resolver {
            model: &model,
            joins: &joins,
            capability,
            qualify: joins.iter().any(|node| node.sql),
        };

        let mut select = Select::new(&model.table);

        for filter in &self.filters {
            let expr = match filter {
                Filter::Field { path, op, value } => {
                    let (field, column) = resolver.column(path)?;
                    Expr::filter(column, *op, storage_value(field, *op, value)?)
                }
                Filter::Expr(expr) => {
                    let mut expr = expr.clone();
                    expr.columns_mut(&mut |column| resolver.resolve(column))?;
                    expr
                }
            };
            select.and_filter(expr);
        }

        if !self.fields.is_empty() {
            if !capability.projection {
                return Err(Error::unsupported_field_projection(&model.name));
            }

            let mut fields = vec![model.primary_key_field()];
            for name in &self.fields {
                let field = model.field(name)?;
                if !fields.iter().any(|f| f.name == field.name) {
                    fields.push(field);
                }
            }

            for field in fields {
                for (column, _) in field.storage_columns() {
                    select.fields.push(resolver.root_column(column).into());
                }
            }
        } else if resolver.qualify {
            // Joined collections share column names with the root
            for column in model.storage_columns() {
                select.fields.push(resolver.root_column(column).into());
            }
        }

        let sort = if self.sort.is_empty() {
            vec![OrderBy::asc(model.primary_key.as_str())]
        } else {
            self.sort.iter().map(|spec| OrderBy::parse(spec)).collect()
        };

        if sort.len() > 1 && !capability.multi_sort {
            return Err(Error::unsupported_multi_sort(&model.name));
        }

        for order_by in sort {
            let (_, column) = resolver.column(&order_by.column.name)?;
            select.order_by.push(OrderBy {
                column,
                direction: order_by.direction,
            });
        }

        for node in joins.iter().filter(|node| node.sql) {
            select.joins.push(node.to_sql_join(&model)?);
        }

        select.limit = self.limit;
        select.offset = self.offset;

        Ok(Plan {
            model,
            select,
            joins,
        })
    }
}

/// Maps field names in a query onto backend columns.
struct Resolver<'a> {
    model: &'a ModelDescriptor,
    joins: &'a [JoinNode],
    capability: &'a Capability,

    /// Qualify root columns with the collection name
    qualify: bool,
}

impl<'a> Resolver<'a> {
    fn column(&self, path: &str) -> Result<(&'a FieldDescriptor, ExprColumn)> {
        let Some((relation_path, name)) = path.rsplit_once('.') else {
            let field = self.model.field(path)?;
            return Ok((field, self.root_column(single_column(field)?)));
        };

        if !self.capability.joins {
            return Err(Error::unsupported_construct(format!(
                "filter on joined field `{path}`"
            )));
        }

        let Some(node) = self.joins.iter().find(|node| node.path == relation_path) else {
            return Err(Error::unsupported_construct(format!(
                "`{path}` requires joining `{relation_path}`"
            )));
        };

        if !node.sql {
            return Err(Error::unsupported_construct(format!(
                "filter through multi-valued relation `{relation_path}`"
            )));
        }

        let field = node.target.field(name)?;
        let column = ExprColumn::qualified(&node.path, single_column(field)?);
        Ok((field, column))
    }

    fn resolve(&self, column: &mut ExprColumn) -> Result<()> {
        let path = match &column.table {
            Some(table) => format!("{table}.{}", column.name),
            None => column.name.clone(),
        };

        *column = self.column(&path)?.1;
        Ok(())
    }

    fn root_column(&self, column: impl Into<String>) -> ExprColumn {
        if self.qualify {
            ExprColumn::qualified(&self.model.table, column)
        } else {
            ExprColumn::new(column)
        }
    }
}

fn single_column(field: &FieldDescriptor) -> Result<String> {
    if field.is_embedded() {
        return Err(Error::unsupported_construct(format!(
            "filter on embedded field `{}`",
            field.name
        )));
    }
    Ok(field.column.clone())
}

/// Converts a filter operand to the representation the field is stored in.
fn storage_value(field: &FieldDescriptor, op: BinaryOp, value: &Value) -> Result<Value> {
    if op.is_set_membership() {
        let items = value
            .clone()
            .into_list()
            .iter()
            .map(|item| storage_value(field, BinaryOp::Eq, item))
            .collect::<Result<_>>()?;
        return Ok(Value::List(items));
    }

    if value.is_null() {
        return Ok(Value::Null);
    }

    let mut stored = field.to_storage(value)?;
    match stored.pop() {
        Some((_, value)) if stored.is_empty() => Ok(value),
        _ => Err(Error::unsupported_construct(format!(
            "filter on embedded field `{}`",
            field.name
        ))),
    }
}
