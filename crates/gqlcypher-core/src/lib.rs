pub mod context;
pub use context::Context;

pub mod driver;
pub use driver::Executor;

pub mod env;
pub use env::Environment;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub use async_trait::async_trait;
