use super::Row;
use crate::stmt::Value;

#[derive(Debug, Default)]
pub struct Response {
    pub rows: Rows,

    /// Key generated for an inserted record, when the backend assigned one.
    pub generated_key: Option<Value>,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of affected records
    Count(u64),

    Values(Vec<Row>),
}

impl Default for Rows {
    fn default() -> Self {
        Rows::Count(0)
    }
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
            generated_key: None,
        }
    }

    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(rows),
            generated_key: None,
        }
    }

    pub fn with_generated_key(mut self, key: Option<Value>) -> Self {
        self.generated_key = key;
        self
    }

    /// Affected-record count; for row results, the number of rows.
    pub fn affected(&self) -> u64 {
        match &self.rows {
            Rows::Count(count) => *count,
            Rows::Values(rows) => rows.len() as u64,
        }
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self.rows {
            Rows::Values(rows) => rows,
            Rows::Count(_) => vec![],
        }
    }
}
