use relorm::{async_trait, driver::Row, ExecResult, Executor, Result, Value};

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// An executor that records every statement it receives.
///
/// Queries answer with scripted row sets, in the order they were pushed, and
/// fall back to no rows. Executions report one affected row and hand out
/// sequential insert ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct ExecLog {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<(String, Vec<Value>)>,
    scripted: VecDeque<Vec<Row>>,
    last_insert_id: i64,
}

impl ExecLog {
    pub fn new() -> ExecLog {
        ExecLog::default()
    }

    /// Queue the rows returned by the next unanswered query
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.state.lock().unwrap().scripted.push_back(rows);
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return the oldest recorded statement
    pub fn pop(&self) -> (String, Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        assert!(!state.entries.is_empty(), "no statement was executed");
        state.entries.remove(0)
    }

    /// The SQL text of every recorded statement
    pub fn sql(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().entries.clear();
    }

    fn record(&self, sql: &str, args: &[Value]) {
        self.state
            .lock()
            .unwrap()
            .entries
            .push((sql.to_string(), args.to_vec()));
    }
}

#[async_trait]
impl Executor for ExecLog {
    async fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        self.record(sql, args);

        let mut state = self.state.lock().unwrap();
        state.last_insert_id += 1;
        Ok(ExecResult::inserted(state.last_insert_id))
    }

    async fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.record(sql, args);
        Ok(self
            .state
            .lock()
            .unwrap()
            .scripted
            .pop_front()
            .unwrap_or_default())
    }

    async fn begin(&self) -> Result<Arc<dyn Executor>> {
        self.record("BEGIN", &[]);
        Ok(Arc::new(self.clone()))
    }

    async fn commit(&self) -> Result<()> {
        self.record("COMMIT", &[]);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.record("ROLLBACK", &[]);
        Ok(())
    }
}
