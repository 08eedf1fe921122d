use super::*;
use crate::{Error, Result};

use std::cmp::Ordering;

impl Expr {
    /// Evaluates the expression against one row.
    pub fn eval(&self, input: &mut impl Input) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Column(column) => input.column(column),
            Self::Ident(name) => input.column(&ExprColumn::new(name.as_str())),
            Self::Text(text) => Ok(Value::String(text.clone())),
            Self::And(and) => {
                for operand in &and.operands {
                    if !operand.eval_bool(input)? {
                        return Ok(false.into());
                    }
                }
                Ok(true.into())
            }
            Self::Or(or) => {
                for operand in &or.operands {
                    if operand.eval_bool(input)? {
                        return Ok(true.into());
                    }
                }
                Ok(false.into())
            }
            Self::Not(expr) => Ok((!expr.eval_bool(input)?).into()),
            Self::Filter(filter) => filter.eval(input).map(Value::from),
            Self::Stmt(stmt) => match &**stmt {
                Statement::Select(select) => Ok(input
                    .subquery(select)?
                    .into_iter()
                    .next()
                    .unwrap_or(Value::Null)),
                stmt => Err(Error::unsupported_construct(format!(
                    "{} statement in expression",
                    stmt.kind()
                ))),
            },
            Self::Func(func) => Err(Error::unsupported_construct(format!(
                "function `{}` in filter",
                func.name
            ))),
        }
    }

    pub fn eval_bool(&self, input: &mut impl Input) -> Result<bool> {
        match self.eval(input)? {
            Value::Bool(value) => Ok(value),
            Value::Null => Ok(false),
            value => Err(Error::type_conversion(value, Type::Bool)),
        }
    }
}

impl ExprFilter {
    fn eval(&self, input: &mut impl Input) -> Result<bool> {
        let lhs = input.column(&self.column)?;

        let Some(clause) = self.clause() else {
            return Err(Error::invalid_expression("filter", Invalid::MissingClause));
        };

        if self.op.is_set_membership() {
            let set = match clause {
                Expr::Stmt(stmt) => match &**stmt {
                    Statement::Select(select) => input.subquery(select)?,
                    stmt => {
                        return Err(Error::unsupported_construct(format!(
                            "{} statement in IN clause",
                            stmt.kind()
                        )))
                    }
                },
                expr => expr.eval(input)?.into_list(),
            };

            if lhs.is_null() {
                return Ok(false);
            }

            let contains = set.contains(&lhs);
            return Ok(if self.op == BinaryOp::In {
                contains
            } else {
                !contains
            });
        }

        let rhs = clause.eval(input)?;

        Ok(match self.op {
            BinaryOp::Eq if rhs.is_null() => lhs.is_null(),
            BinaryOp::Ne if rhs.is_null() => !lhs.is_null(),
            _ if lhs.is_null() || rhs.is_null() => false,
            BinaryOp::Eq => lhs == rhs,
            BinaryOp::Ne => lhs != rhs,
            BinaryOp::Gt => lhs.cmp(&rhs) == Ordering::Greater,
            BinaryOp::Ge => lhs.cmp(&rhs) != Ordering::Less,
            BinaryOp::Lt => lhs.cmp(&rhs) == Ordering::Less,
            BinaryOp::Le => lhs.cmp(&rhs) != Ordering::Greater,
            BinaryOp::Like | BinaryOp::NotLike => {
                let (Some(text), Some(pattern)) = (lhs.as_str(), rhs.as_str()) else {
                    return Err(Error::unsupported_construct("LIKE on a non-string value"));
                };
                like(text, pattern) == (self.op == BinaryOp::Like)
            }
            BinaryOp::In | BinaryOp::NotIn => unreachable!(),
        })
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matches[j] = pattern[..i] matches text[..j]
    let mut matches = vec![false; text.len() + 1];
    matches[0] = true;

    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '%' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= matches[j];
                    next[j] = seen;
                }
            }
            _ => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1] && (*p == '_' || *p == text[j - 1]);
                }
            }
        }
        matches = next;
    }

    matches[text.len()]
}
