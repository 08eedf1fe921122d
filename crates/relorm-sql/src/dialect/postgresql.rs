use crate::{Dialect, Node, Placeholder, Translator};

use relorm_core::{
    driver::Capability,
    stmt::{BinaryOp, Expr, FieldDef, Statement, Type, Value},
    Error, Result,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Postgresql;

impl Dialect for Postgresql {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Numbered("$")
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQL_RETURNING
    }

    fn column_type(&self, field: &FieldDef) -> Result<String> {
        let ty = match field.ty {
            Type::Bool => "BOOLEAN".to_string(),
            Type::I64 if field.is_auto_increment() => "BIGSERIAL".to_string(),
            Type::I64 => "BIGINT".to_string(),
            Type::F64 => "DOUBLE PRECISION".to_string(),
            Type::String => match field.max_len {
                Some(len) => format!("VARCHAR({len})"),
                None => "TEXT".to_string(),
            },
            Type::Time => "TIMESTAMPTZ".to_string(),
            Type::Bytes => "BYTEA".to_string(),
            Type::Json if field.opaque => "JSONB".to_string(),
            Type::Json => return Err(Error::unsupported_column_type(&field.name, field.ty)),
        };
        Ok(ty)
    }

    /// Generated keys come back through `RETURNING`.
    fn prepare(&self, stmt: &mut Statement) -> Result<()> {
        if let Statement::Insert(insert) = stmt {
            if let Some(key) = &insert.generated_key {
                if !insert.returning.contains(key) {
                    insert.returning.push(key.clone());
                }
            }
        }
        Ok(())
    }

    /// Set membership against a literal list binds the whole list as one
    /// array argument.
    fn translate(&self, t: &mut Translator<'_>, node: Node<'_>) -> Result<bool> {
        let Node::Expr(Expr::Filter(filter)) = node else {
            return Ok(false);
        };

        let Some(Expr::Value(Value::List(items))) = filter.clause() else {
            return Ok(false);
        };

        if items.is_empty() {
            return Ok(false);
        }

        let op = match filter.op {
            BinaryOp::In => " = ANY(",
            BinaryOp::NotIn => " <> ALL(",
            _ => return Ok(false),
        };

        t.column(&filter.column);
        t.push(op);
        t.param(Value::List(items.clone()));
        t.push(")");

        Ok(true)
    }
}
