use crate::{Dialect, Node, Translator};

use relorm_core::{
    driver::Capability,
    stmt::{FieldDef, Statement, Type},
    Error, Result,
};

/// The longest indexable `VARCHAR` under the utf8mb4 key prefix limit.
const INDEXED_VARCHAR_LEN: usize = 191;

#[derive(Debug, Default, Clone, Copy)]
pub struct Mysql;

impl Dialect for Mysql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self) -> char {
        '`'
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQL
    }

    fn column_type(&self, field: &FieldDef) -> Result<String> {
        let ty = match field.ty {
            Type::Bool => "BOOLEAN".to_string(),
            Type::I64 => "BIGINT".to_string(),
            Type::F64 => "DOUBLE".to_string(),
            Type::String => match field.max_len {
                Some(len) => format!("VARCHAR({len})"),
                None if field.is_indexed() => format!("VARCHAR({INDEXED_VARCHAR_LEN})"),
                None => "TEXT".to_string(),
            },
            Type::Time => "DATETIME(6)".to_string(),
            Type::Bytes => "BLOB".to_string(),
            Type::Json if field.opaque => "JSON".to_string(),
            Type::Json => return Err(Error::unsupported_column_type(&field.name, field.ty)),
        };
        Ok(ty)
    }

    fn auto_increment(&self) -> Option<&'static str> {
        Some("AUTO_INCREMENT")
    }

    fn translate(&self, t: &mut Translator<'_>, node: Node<'_>) -> Result<bool> {
        let Node::Statement(stmt) = node else {
            return Ok(false);
        };

        match stmt {
            Statement::CreateIndex(stmt) => {
                t.push("CREATE ");
                if stmt.unique {
                    t.push("UNIQUE ");
                }
                t.push("INDEX ");
                t.ident(&stmt.name);
                t.push(" ON ");
                t.ident(&stmt.collection);
                t.push(" (");
                t.comma(&stmt.columns, |t, column| {
                    t.ident(column);
                    Ok(())
                })?;
                t.push(")");
            }
            Statement::DropIndex(stmt) => {
                t.push("DROP INDEX ");
                t.ident(&stmt.name);
                t.push(" ON ");
                t.ident(&stmt.collection);
            }
            Statement::Insert(stmt) if stmt.columns.is_empty() => {
                t.push("INSERT INTO ");
                t.ident(&stmt.collection);
                t.push(" () VALUES ()");
            }
            _ => return Ok(false),
        }

        Ok(true)
    }

    fn limit_offset(&self, t: &mut Translator<'_>, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (Some(limit), Some(offset)) => t.push(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => t.push(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => t.push(&format!(" LIMIT {} OFFSET {offset}", u64::MAX)),
            (None, None) => {}
        }
    }
}
