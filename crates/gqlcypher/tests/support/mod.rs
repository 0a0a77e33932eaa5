#![allow(dead_code)]

use gqlcypher::{
    async_trait,
    driver::{Query, Response},
    schema::{
        AuthorizationRule, Entity, Field, Operation as RuleOperation, Relationship,
        RelationshipProperties, RuleCondition, Scalar,
    },
    CompiledQuery, Compiler, Context, Error, Executor, Request, Result, Schema,
};

use std::sync::{Arc, Mutex};

/// Movies, their genres and the actors who acted in them.
///
/// Creating or connecting a genre requires the `admin` role.
pub fn movies() -> Schema {
    Schema::builder()
        .entity(
            Entity::new("Movie")
                .field(Field::primitive("title", Scalar::String))
                .field(Field::primitive("released", Scalar::Int))
                .field(Field::relationship(
                    "genres",
                    Relationship::outgoing("IN_GENRE", "Genre"),
                ))
                .field(Field::relationship(
                    "actors",
                    Relationship::incoming("ACTED_IN", "Actor").properties("ActedIn"),
                )),
        )
        .entity(
            Entity::new("Genre")
                .field(Field::primitive("name", Scalar::String).unique())
                .rule(
                    AuthorizationRule::allow(RuleCondition::roles(["admin"]))
                        .operations([RuleOperation::Create, RuleOperation::Connect]),
                ),
        )
        .entity(Entity::new("Actor").field(Field::primitive("name", Scalar::String)))
        .relationship_properties(
            RelationshipProperties::new("ActedIn")
                .field(Field::primitive("role", Scalar::String)),
        )
        .build()
        .unwrap()
}

/// Posts, the user who wrote each one and the users who liked them.
pub fn posts() -> Schema {
    Schema::builder()
        .entity(
            Entity::new("Post")
                .field(Field::primitive("content", Scalar::String))
                .field(Field::relationship(
                    "author",
                    Relationship::incoming("WROTE", "User").one(),
                ))
                .field(Field::relationship(
                    "likes",
                    Relationship::incoming("LIKES", "User"),
                )),
        )
        .entity(Entity::new("User").field(Field::primitive("name", Scalar::String)))
        .build()
        .unwrap()
}

/// Logs compiled statements when `RUST_LOG` asks for them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn compiler(schema: Schema) -> Compiler {
    init_tracing();
    Compiler::builder().schema(schema).build().unwrap()
}

pub fn compile(schema: Schema, request: &Request, cx: &Context) -> Result<CompiledQuery> {
    compiler(schema).compile(request, cx)
}

/// An executor returning a canned response and recording every query it
/// receives.
#[derive(Debug, Clone)]
pub struct MockExecutor {
    /// The response, or the message of the error to fail with
    outcome: std::result::Result<Response, String>,

    queries: Arc<Mutex<Vec<Query>>>,
}

impl MockExecutor {
    pub fn returning(response: Response) -> MockExecutor {
        MockExecutor {
            outcome: Ok(response),
            queries: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> MockExecutor {
        MockExecutor {
            outcome: Err(message.into()),
            queries: Arc::default(),
        }
    }

    /// Queries executed so far
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, query: &Query) -> Result<Response> {
        self.queries.lock().unwrap().push(query.clone());

        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(Error::executor(message.clone())),
        }
    }
}
