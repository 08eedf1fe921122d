mod dialect;
pub use dialect::{Dialect, Document, Mysql, Placeholder, Postgresql, Sqlite};

mod translator;
pub use translator::{Node, Translated, Translator};

use relorm_core::{stmt::Statement, Result};

/// Renders `stmt` for `dialect` with a fresh translator.
pub fn translate(dialect: &dyn Dialect, stmt: &Statement) -> Result<Translated> {
    Translator::new(dialect).translate(stmt)
}
