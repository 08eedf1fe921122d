use super::*;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub collection: String,

    /// Selected expressions, `*` when empty.
    pub fields: Vec<Expr>,

    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,

    /// Relation paths loaded alongside the result by a fetch-plan dialect.
    pub fetch_plan: Vec<String>,
}

impl Select {
    pub fn new(collection: impl Into<String>) -> Self {
        Select {
            collection: collection.into(),
            ..Select::default()
        }
    }

    pub fn field(mut self, expr: impl Into<Expr>) -> Self {
        self.fields.push(expr.into());
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// ANDs `expr` into the existing filter.
    pub fn filter(mut self, expr: impl Into<Expr>) -> Self {
        self.and_filter(expr.into());
        self
    }

    pub fn and_filter(&mut self, expr: Expr) {
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_count(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_count()
    }

    pub(super) fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(Error::invalid_expression("select", Invalid::EmptyCollection));
        }

        self.fields.iter().try_for_each(Expr::validate)?;
        self.joins.iter().try_for_each(Join::validate)?;

        if let Some(filter) = &self.filter {
            filter.validate()?;
        }

        self.order_by.iter().try_for_each(OrderBy::validate)
    }
}
