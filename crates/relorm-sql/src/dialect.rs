mod document;
pub use document::Document;

mod mysql;
pub use mysql::Mysql;

mod postgresql;
pub use postgresql::Postgresql;

mod sqlite;
pub use sqlite::Sqlite;

use crate::{Node, Translator};

use relorm_core::{
    driver::Capability,
    stmt::{FieldDef, Statement},
    Result,
};

use std::fmt::Debug;

/// How positional arguments are written in statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every argument
    Question,

    /// The prefix followed by the 1-based argument position, e.g. `$1`
    Numbered(&'static str),
}

/// The rules for one family of backends.
///
/// A dialect is consulted in two places. `prepare` may rewrite the statement
/// tree once before rendering, and `translate` may take over rendering of
/// any node. Everything a dialect does not claim falls back to the base
/// rules in [`Translator`].
pub trait Dialect: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn quote(&self) -> char {
        '"'
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }

    fn capability(&self) -> &'static Capability;

    /// The column type for a field definition.
    fn column_type(&self, field: &FieldDef) -> Result<String>;

    /// The keyword that follows an auto-increment column, if the dialect
    /// spells auto increment as a constraint.
    fn auto_increment(&self) -> Option<&'static str> {
        None
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Rewrites a top-level statement before it is rendered.
    fn prepare(&self, stmt: &mut Statement) -> Result<()> {
        let _ = stmt;
        Ok(())
    }

    /// Renders `node` in place of the base rules. Returns `false` to leave
    /// the node to the base rules.
    fn translate(&self, t: &mut Translator<'_>, node: Node<'_>) -> Result<bool> {
        let _ = (t, node);
        Ok(false)
    }

    fn limit_offset(&self, t: &mut Translator<'_>, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            t.push(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            t.push(&format!(" OFFSET {offset}"));
        }
    }
}
