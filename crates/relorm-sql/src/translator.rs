mod ddl;
mod expr;
mod statement;

use crate::{Dialect, Placeholder};

use relorm_core::{
    stmt::{Constraint, Expr, ExprColumn, FieldDef, Join, OrderBy, Statement, Value},
    Error, Result,
};

use std::mem;

/// Token written for every argument while rendering. Replaced by the
/// dialect's placeholder syntax once the whole statement has been emitted.
const GENERIC_PLACEHOLDER: char = '\u{FDD0}';

/// Statement text plus positional arguments, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    pub sql: String,
    pub args: Vec<Value>,
}

/// A node handed to [`Dialect::translate`] before base rendering.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Expr(&'a Expr),
    FieldDef(&'a FieldDef),
    Constraint(&'a Constraint),
    Join(&'a Join),
    OrderBy(&'a OrderBy),
}

/// Applies a dialect's rules to render a statement tree.
///
/// The text and argument buffers belong to one statement at a time:
/// `translate` hands them over when it finishes and clears them when it
/// fails.
#[derive(Debug)]
pub struct Translator<'a> {
    dialect: &'a dyn Dialect,

    /// Where to write the rendered text
    dst: String,

    /// Positional arguments, in emission order
    args: Vec<Value>,

    /// Statement nesting level. Statements rendered at a depth greater than
    /// one are parenthesized.
    depth: usize,
}

impl<'a> Translator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Translator<'a> {
        Translator {
            dialect,
            dst: String::new(),
            args: vec![],
            depth: 0,
        }
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Clears the buffers and the nesting depth.
    pub fn reset(&mut self) {
        self.dst.clear();
        self.args.clear();
        self.depth = 0;
    }

    /// Validates, prepares and renders a top-level statement.
    pub fn translate(&mut self, stmt: &Statement) -> Result<Translated> {
        self.reset();

        let ret = self.translate_top_level(stmt);
        if ret.is_err() {
            self.reset();
        }
        ret
    }

    fn translate_top_level(&mut self, stmt: &Statement) -> Result<Translated> {
        stmt.validate()?;

        let mut stmt = stmt.clone();
        self.dialect.prepare(&mut stmt)?;

        self.statement(&stmt)?;
        self.finish()
    }

    /// Renders a statement, in parentheses when nested inside another.
    pub fn statement(&mut self, stmt: &Statement) -> Result<()> {
        self.depth += 1;
        let nested = self.depth > 1;

        if nested {
            self.push("(");
        }
        let ret = self.node(Node::Statement(stmt));
        if nested {
            self.push(")");
        }

        self.depth -= 1;
        ret
    }

    /// Renders a node, giving the dialect the first chance at it.
    pub fn node(&mut self, node: Node<'_>) -> Result<()> {
        let dialect = self.dialect;
        if dialect.translate(self, node)? {
            return Ok(());
        }
        self.base(node)
    }

    /// Renders a node with the base rules, bypassing dialect overrides for
    /// this node only.
    pub fn base(&mut self, node: Node<'_>) -> Result<()> {
        match node {
            Node::Statement(stmt) => self.base_statement(stmt),
            Node::Expr(expr) => self.base_expr(expr),
            Node::FieldDef(field) => self.base_field_def(field),
            Node::Constraint(constraint) => self.base_constraint(constraint),
            Node::Join(join) => self.base_join(join),
            Node::OrderBy(order_by) => self.base_order_by(order_by),
        }
    }

    pub fn expr(&mut self, expr: &Expr) -> Result<()> {
        self.node(Node::Expr(expr))
    }

    pub fn push(&mut self, text: &str) {
        self.dst.push_str(text);
    }

    /// Writes a quoted identifier.
    pub fn ident(&mut self, name: &str) {
        let quote = self.dialect.quote();
        self.dst.push(quote);
        for ch in name.chars() {
            if ch == quote {
                self.dst.push(quote);
            }
            self.dst.push(ch);
        }
        self.dst.push(quote);
    }

    pub fn column(&mut self, column: &ExprColumn) {
        if let Some(table) = &column.table {
            self.ident(table);
            self.push(".");
        }
        self.ident(&column.name);
    }

    /// Writes a placeholder and records `value` as its argument.
    pub fn param(&mut self, value: Value) {
        self.dst.push(GENERIC_PLACEHOLDER);
        self.args.push(value);
    }

    /// Renders `items` separated by commas.
    pub fn comma<T>(
        &mut self,
        items: impl IntoIterator<Item = T>,
        mut f: impl FnMut(&mut Self, T) -> Result<()>,
    ) -> Result<()> {
        let mut sep = "";
        for item in items {
            self.push(sep);
            f(self, item)?;
            sep = ", ";
        }
        Ok(())
    }

    /// Rewrites generic placeholders into the dialect's syntax and hands the
    /// buffers over. Runs once per top-level statement so that placeholders
    /// inside subqueries are numbered together with the outer ones.
    fn finish(&mut self) -> Result<Translated> {
        let dst = mem::take(&mut self.dst);
        let args = mem::take(&mut self.args);
        self.depth = 0;

        let placeholder = self.dialect.placeholder();
        let mut sql = String::with_capacity(dst.len() + args.len() * 2);
        let mut n = 0;

        for ch in dst.chars() {
            if ch != GENERIC_PLACEHOLDER {
                sql.push(ch);
                continue;
            }

            n += 1;
            match placeholder {
                Placeholder::Question => sql.push('?'),
                Placeholder::Numbered(prefix) => {
                    sql.push_str(prefix);
                    sql.push_str(&n.to_string());
                }
            }
        }

        if n != args.len() {
            return Err(Error::translation(format!(
                "{n} placeholders rendered for {} arguments",
                args.len()
            )));
        }

        Ok(Translated { sql, args })
    }
}
