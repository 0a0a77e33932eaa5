mod query;
pub use query::{AccessMode, Query};

mod response;
pub use response::{Counters, Record, Response, Summary};

use crate::async_trait;

use std::fmt::Debug;

/// Runs compiled statements against a graph database.
///
/// Implementations wrap a database client. The compiler hands over the
/// rendered text and parameter table and expects rows back keyed by the
/// statement's `RETURN` columns.
#[async_trait]
pub trait Executor: Debug + Send + Sync {
    /// Execute one statement in a transaction of the given access mode.
    async fn execute(&self, query: &Query) -> crate::Result<Response>;
}
