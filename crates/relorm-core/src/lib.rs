pub mod driver;
pub use driver::Backend;

mod error;
pub use error::{Error, IntoError, UnsupportedKind};

mod record;
pub use record::{Record, Related};

pub mod schema;
pub use schema::Registry;

pub mod stmt;

/// A Result type alias that uses relorm's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
