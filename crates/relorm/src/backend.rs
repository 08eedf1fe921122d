//! Storage backends.
//!
//! [`Memory`] interprets statements against an in-process store.
//! [`SqlBackend`] renders them with a dialect and hands the text to an
//! [`Executor`] owning the actual connection.

mod memory;
pub use memory::Memory;

mod sql;
pub use sql::{ExecResult, Executor, SqlBackend};

pub use relorm_core::driver::{Backend, Capability, Response, Row, Rows};
