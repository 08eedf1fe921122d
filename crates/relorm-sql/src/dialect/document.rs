use crate::{Dialect, Node, Translator};

use relorm_core::{
    driver::Capability,
    stmt::{FieldDef, Statement, Type},
    Result,
};

/// Document/graph stores with a SQL-like surface.
///
/// Collections are classes and fields are properties. Joins are not
/// rendered; related records are loaded through a fetch plan instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct Document;

impl Dialect for Document {
    fn name(&self) -> &'static str {
        "document"
    }

    fn quote(&self) -> char {
        '`'
    }

    fn capability(&self) -> &'static Capability {
        &Capability::DOCUMENT
    }

    fn column_type(&self, field: &FieldDef) -> Result<String> {
        let ty = match field.ty {
            Type::Bool => "BOOLEAN",
            Type::I64 => "LONG",
            Type::F64 => "DOUBLE",
            Type::String => "STRING",
            Type::Time => "DATETIME",
            Type::Bytes => "BINARY",
            Type::Json => "EMBEDDED",
        };
        Ok(ty.to_string())
    }

    fn prepare(&self, stmt: &mut Statement) -> Result<()> {
        if let Statement::Select(select) = stmt {
            for join in select.joins.drain(..) {
                let path = match join.path {
                    Some(path) => path,
                    None => join.alias.unwrap_or(join.collection),
                };
                if !select.fetch_plan.contains(&path) {
                    select.fetch_plan.push(path);
                }
            }
        }
        Ok(())
    }

    fn translate(&self, t: &mut Translator<'_>, node: Node<'_>) -> Result<bool> {
        match node {
            Node::Statement(stmt) => self.statement(t, stmt),
            // The store enforces no column constraints
            Node::Constraint(_) => Ok(true),
            _ => Ok(false),
        }
    }

    fn limit_offset(&self, t: &mut Translator<'_>, limit: Option<u64>, offset: Option<u64>) {
        if let Some(offset) = offset {
            t.push(&format!(" SKIP {offset}"));
        }
        if let Some(limit) = limit {
            t.push(&format!(" LIMIT {limit}"));
        }
    }
}

impl Document {
    fn statement(&self, t: &mut Translator<'_>, stmt: &Statement) -> Result<bool> {
        match stmt {
            Statement::CreateCollection(stmt) => {
                t.push("CREATE CLASS ");
                t.ident(&stmt.name);
                if stmt.if_not_exists {
                    t.push(" IF NOT EXISTS");
                }
            }
            Statement::DropCollection(stmt) => {
                t.push("DROP CLASS ");
                t.ident(&stmt.name);
                if stmt.if_exists {
                    t.push(" IF EXISTS");
                }
            }
            Statement::RenameCollection(stmt) => {
                t.push("ALTER CLASS ");
                t.ident(&stmt.from);
                t.push(" NAME ");
                t.ident(&stmt.to);
            }
            Statement::CreateField(stmt) => {
                t.push("CREATE PROPERTY ");
                t.ident(&stmt.collection);
                t.push(".");
                t.node(Node::FieldDef(&stmt.field))?;
            }
            Statement::DropField(stmt) => {
                t.push("DROP PROPERTY ");
                t.ident(&stmt.collection);
                t.push(".");
                t.ident(&stmt.name);
            }
            Statement::RenameField(stmt) => {
                t.push("ALTER PROPERTY ");
                t.ident(&stmt.collection);
                t.push(".");
                t.ident(&stmt.from);
                t.push(" NAME ");
                t.ident(&stmt.to);
            }
            Statement::CreateIndex(stmt) => {
                t.push("CREATE INDEX ");
                t.ident(&stmt.name);
                t.push(" ON ");
                t.ident(&stmt.collection);
                t.push(" (");
                t.comma(&stmt.columns, |t, column| {
                    t.ident(column);
                    Ok(())
                })?;
                t.push(if stmt.unique { ") UNIQUE" } else { ") NOTUNIQUE" });
            }
            Statement::DropIndex(stmt) => {
                t.push("DROP INDEX ");
                t.ident(&stmt.name);
            }
            Statement::Insert(stmt) if stmt.columns.is_empty() => {
                t.push("INSERT INTO ");
                t.ident(&stmt.collection);
                t.push(" CONTENT {}");
            }
            _ => return Ok(false),
        }

        Ok(true)
    }
}
