mod builder;
pub use builder::Builder;

use crate::{
    auth::{FORBIDDEN, RELATIONSHIP_REQUIRED},
    request::Operation,
    response, Config, Request,
};

use gqlcypher_core::{
    driver::{AccessMode, Executor, Query},
    stmt::{ParamTable, Value},
    Context, Error, Result, Schema,
};
use gqlcypher_cypher::Serializer;

use std::sync::Arc;

/// Compiles resolved GraphQL requests into Cypher.
///
/// A compiler holds only the schema and configuration, both read-only, so
/// one instance can be shared across tasks and cloned cheaply. Every
/// compilation allocates its own variables and parameters.
#[derive(Debug, Clone)]
pub struct Compiler {
    pub(crate) schema: Arc<Schema>,
    pub(crate) config: Config,
}

/// A rendered statement and the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub cypher: String,
    pub params: ParamTable,
    pub access_mode: AccessMode,
}

impl Compiler {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compiles `request` for the request context `cx`.
    pub fn compile(&self, request: &Request, cx: &Context) -> Result<CompiledQuery> {
        if self.config.global_authentication && !cx.is_authenticated() {
            tracing::warn!(entity = %request.entity, "unauthenticated request rejected");
            return Err(Error::forbidden());
        }

        let translated = self.translate(request, cx)?;
        let mut rendered = Serializer::new(&translated.env).serialize(&translated.stmt);

        for param in &translated.raw_params {
            if !rendered.params.contains(param.name()) {
                let value = translated.env.param_value(param).cloned().unwrap_or_default();
                rendered.params.insert(param.name(), value);
            }
        }

        tracing::debug!(
            operation = ?request.operation,
            entity = %request.entity,
            params = rendered.params.len(),
            cypher = %rendered.cypher,
            "compiled request"
        );

        Ok(CompiledQuery {
            cypher: rendered.cypher,
            params: rendered.params,
            access_mode: access_mode(request.operation),
        })
    }

    /// Compiles `request`, runs it on `executor` and shapes the rows into
    /// the response the selection asked for.
    pub async fn execute(
        &self,
        executor: &dyn Executor,
        request: &Request,
        cx: &Context,
    ) -> Result<Value> {
        let query = self.compile(request, cx)?.into_query();
        let response = executor
            .execute(&query)
            .await
            .map_err(translate_executor_error)?;

        response::shape(&self.schema, &self.config, request, &response)
    }
}

impl CompiledQuery {
    pub fn into_query(self) -> Query {
        Query {
            cypher: self.cypher,
            params: self.params,
            access_mode: self.access_mode,
        }
    }
}

fn access_mode(operation: Operation) -> AccessMode {
    match operation {
        Operation::Read | Operation::Aggregate | Operation::Connection => AccessMode::Read,
        Operation::Create | Operation::Update | Operation::Delete => AccessMode::Write,
    }
}

/// Maps a failed runtime assertion back to the error it stands for. The
/// message of a forbidden assertion is not passed on.
fn translate_executor_error(err: Error) -> Error {
    let Some(message) = err.executor_message() else {
        return err;
    };

    if message.contains(FORBIDDEN) {
        tracing::warn!("authorization assertion failed during execution");
        return Error::forbidden();
    }

    if let Some(index) = message.find(RELATIONSHIP_REQUIRED) {
        let detail = message[index + RELATIONSHIP_REQUIRED.len()..].trim();
        return Error::relationship_required(detail);
    }

    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Message(&'static str);

    impl std::error::Error for Message {}

    impl std::fmt::Display for Message {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    #[test]
    fn forbidden_marker_hides_the_message() {
        let err = translate_executor_error(Error::executor(Message(
            "Failed to invoke procedure: @gqlcypher/FORBIDDEN",
        )));
        assert!(err.is_forbidden());
        assert_eq!(err.to_string(), "forbidden");
    }

    #[test]
    fn relationship_required_keeps_the_detail() {
        let err = translate_executor_error(Error::executor(Message(
            "@gqlcypher/RELATIONSHIP-REQUIRED Post.author required exactly once",
        )));
        assert!(err.is_relationship_required());
        assert!(err.to_string().contains("Post.author required exactly once"));
    }

    #[test]
    fn other_executor_errors_pass_through() {
        let err = translate_executor_error(Error::executor(Message("connection reset")));
        assert!(err.is_executor());
    }

    #[test]
    fn reads_run_in_read_transactions() {
        assert_eq!(access_mode(Operation::Connection), AccessMode::Read);
        assert_eq!(access_mode(Operation::Delete), AccessMode::Write);
    }
}
