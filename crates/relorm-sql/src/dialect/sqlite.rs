use crate::{Dialect, Translator};

use relorm_core::{
    driver::Capability,
    stmt::{FieldDef, Type},
    Error, Result,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQL
    }

    fn column_type(&self, field: &FieldDef) -> Result<String> {
        let ty = match field.ty {
            Type::Bool | Type::I64 => "INTEGER",
            Type::F64 => "REAL",
            Type::String | Type::Time => "TEXT",
            Type::Bytes => "BLOB",
            Type::Json if field.opaque => "TEXT",
            Type::Json => return Err(Error::unsupported_column_type(&field.name, field.ty)),
        };
        Ok(ty.to_string())
    }

    fn auto_increment(&self) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn limit_offset(&self, t: &mut Translator<'_>, limit: Option<u64>, offset: Option<u64>) {
        match (limit, offset) {
            (Some(limit), Some(offset)) => t.push(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => t.push(&format!(" LIMIT {limit}")),
            // OFFSET is only accepted after a LIMIT
            (None, Some(offset)) => t.push(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }
    }
}
