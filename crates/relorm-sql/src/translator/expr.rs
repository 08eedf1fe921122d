use super::*;

use relorm_core::stmt::{BinaryOp, ExprFilter};

impl Translator<'_> {
    pub(super) fn base_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Value(value) => {
                self.param(value.clone());
                Ok(())
            }
            Expr::Ident(name) => {
                self.ident(name);
                Ok(())
            }
            Expr::Column(column) => {
                self.column(column);
                Ok(())
            }
            Expr::Text(text) => {
                self.push(text);
                Ok(())
            }
            Expr::Func(func) => {
                self.push(&func.name);
                self.push("(");
                self.comma(&func.args, |t, arg| t.expr(arg))?;
                self.push(")");
                Ok(())
            }
            Expr::And(and) => self.junction(&and.operands, " AND ", "1 = 1"),
            Expr::Or(or) => self.junction(&or.operands, " OR ", "1 = 0"),
            Expr::Not(expr) => {
                self.push("NOT ");
                self.expr(expr)
            }
            Expr::Filter(filter) => self.filter(filter),
            Expr::Stmt(stmt) => self.statement(stmt),
        }
    }

    /// Parenthesized only when there is more than one operand.
    fn junction(&mut self, operands: &[Expr], sep: &str, empty: &str) -> Result<()> {
        match operands {
            [] => {
                self.push(empty);
                Ok(())
            }
            [operand] => self.expr(operand),
            operands => {
                self.push("(");
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        self.push(sep);
                    }
                    self.expr(operand)?;
                }
                self.push(")");
                Ok(())
            }
        }
    }

    fn filter(&mut self, filter: &ExprFilter) -> Result<()> {
        let Some(clause) = filter.clause() else {
            return Err(Error::invalid_expression(
                "filter",
                relorm_core::stmt::Invalid::MissingClause,
            ));
        };

        match (filter.op, clause) {
            (BinaryOp::Eq, Expr::Value(Value::Null)) => {
                self.column(&filter.column);
                self.push(" IS NULL");
            }
            (BinaryOp::Ne, Expr::Value(Value::Null)) => {
                self.column(&filter.column);
                self.push(" IS NOT NULL");
            }
            (op, Expr::Value(Value::List(items))) if op.is_set_membership() => {
                if items.is_empty() {
                    // Nothing is a member of the empty set
                    self.push(if op == BinaryOp::In { "1 = 0" } else { "1 = 1" });
                    return Ok(());
                }

                self.column(&filter.column);
                self.push(" ");
                self.push(&op.to_string());
                self.push(" (");
                self.comma(items, |t, item| {
                    t.param(item.clone());
                    Ok(())
                })?;
                self.push(")");
            }
            (op, clause) => {
                self.column(&filter.column);
                self.push(" ");
                self.push(&op.to_string());
                self.push(" ");
                self.expr(clause)?;
            }
        }

        Ok(())
    }

    /// Writes a literal inline. Used where placeholders are not accepted,
    /// such as column defaults.
    pub fn literal(&mut self, expr: &Expr) -> Result<()> {
        let value = match expr {
            Expr::Value(value) => value,
            Expr::Text(text) => {
                self.push(text);
                return Ok(());
            }
            _ => {
                return Err(Error::translation(format!(
                    "expected a literal, found {expr:?}"
                )))
            }
        };

        match value {
            Value::Null => self.push("NULL"),
            Value::Bool(v) => {
                let text = self.dialect.bool_literal(*v);
                self.push(text);
            }
            Value::I64(v) => self.push(&v.to_string()),
            Value::F64(v) => self.push(&v.to_string()),
            Value::String(v) => self.string_literal(v)?,
            Value::Time(v) => self.string_literal(&v.to_rfc3339())?,
            Value::Json(v) => self.string_literal(&v.to_string())?,
            Value::Bytes(v) => {
                self.push("X'");
                for byte in v {
                    self.push(&format!("{byte:02X}"));
                }
                self.push("'");
            }
            Value::List(_) => return Err(Error::unsupported_construct("list literal")),
        }

        Ok(())
    }

    fn string_literal(&mut self, text: &str) -> Result<()> {
        if text.contains(GENERIC_PLACEHOLDER) {
            return Err(Error::translation("literal contains a reserved character"));
        }

        self.push("'");
        self.push(&text.replace('\'', "''"));
        self.push("'");
        Ok(())
    }
}
