mod aggregate;
mod connect;
mod connect_or_create;
mod connection;
mod create;
mod delete;
mod disconnect;
pub(crate) mod filter;
pub(crate) mod input;
mod nested;
mod options;
mod polymorphic;
mod projection;
mod properties;
mod read;
mod required;
mod subject;
mod update;
mod value;

pub(crate) use connection::page;
pub(crate) use projection::selection_types;
pub(crate) use subject::Subject;

use crate::{request::Operation, Compiler, Config, Request};

use gqlcypher_core::{
    schema::{Entity, Relationship, RelationshipProperties},
    stmt::{
        Clause, Expr, NodePattern, Param, Pattern, Projection, RelationshipPattern, Return,
        Statement, Value, Variable,
    },
    Context, Environment, Error, Result, Schema,
};

/// The output of translating one request.
#[derive(Debug)]
pub(crate) struct Translated {
    pub(crate) stmt: Statement,
    pub(crate) env: Environment,

    /// Parameters referenced from user-supplied Cypher text, which the
    /// renderer cannot see
    pub(crate) raw_params: Vec<Param>,
}

/// Per-request translation state.
///
/// Holds the request context and the environment every variable and
/// parameter of the statement is allocated from. A translator is created
/// fresh for each request and dropped once the statement is rendered.
#[derive(Debug)]
pub(crate) struct Translator<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) config: &'a Config,
    pub(crate) cx: &'a Context,
    pub(crate) env: Environment,

    /// `$jwt`, bound on first use
    jwt: Option<Param>,

    /// `$isAuthenticated`, bound on first use
    is_authenticated: Option<Param>,

    /// Depth of authorization rule lowering in progress. Relationship
    /// filters compiled from a rule do not apply the target's own rules.
    pub(crate) lowering_rules: usize,

    raw_params: Vec<Param>,
}

impl Compiler {
    pub(crate) fn translate(&self, request: &Request, cx: &Context) -> Result<Translated> {
        let schema = &*self.schema;
        let entity = schema.expect_entity(&request.entity)?;
        let mut translator = Translator::new(schema, &self.config, cx);

        let stmt = match request.operation {
            Operation::Read => translator.read(entity, &request.tree)?,
            Operation::Aggregate => translator.root_aggregate(entity, &request.tree)?,
            Operation::Connection => translator.root_connection(entity, &request.tree)?,
            Operation::Create => translator.create(entity, &request.tree)?,
            Operation::Update => translator.update(entity, &request.tree)?,
            Operation::Delete => translator.delete(entity, &request.tree)?,
        };

        Ok(Translated {
            stmt,
            env: translator.env,
            raw_params: translator.raw_params,
        })
    }
}

impl<'a> Translator<'a> {
    pub(crate) fn new(schema: &'a Schema, config: &'a Config, cx: &'a Context) -> Translator<'a> {
        Translator {
            schema,
            config,
            cx,
            env: Environment::new(),
            jwt: None,
            is_authenticated: None,
            lowering_rules: 0,
            raw_params: vec![],
        }
    }

    /// Binds `value` to a parameter and returns a reference to it.
    pub(crate) fn param(&mut self, hint: &str, value: impl Into<Value>) -> Expr {
        self.env.param(hint, value).into()
    }

    /// The request claims as a map parameter.
    pub(crate) fn jwt(&mut self) -> Param {
        if let Some(param) = &self.jwt {
            return param.clone();
        }

        let param = self.env.param("jwt", self.cx.claims());
        self.jwt = Some(param.clone());
        param
    }

    /// `$isAuthenticated = true`
    pub(crate) fn is_authenticated(&mut self) -> Expr {
        let param = match &self.is_authenticated {
            Some(param) => param.clone(),
            None => {
                let param = self.env.param("isAuthenticated", self.cx.is_authenticated());
                self.is_authenticated = Some(param.clone());
                param
            }
        };

        Expr::eq(param, true)
    }

    /// Records parameters a user-supplied statement refers to by name.
    pub(crate) fn raw_statement_params(&mut self, statement: &str) {
        if statement.contains("$jwt") {
            let jwt = self.jwt();
            if !self.raw_params.contains(&jwt) {
                self.raw_params.push(jwt);
            }
        }
    }

    /// `(var:Label)` with the entity's labels resolved against the request.
    pub(crate) fn node_pattern(&self, var: &Variable, entity: &Entity) -> Result<NodePattern> {
        Ok(NodePattern::new(var).labels(entity.resolve_labels(self.cx)?))
    }

    /// `(from)-[edge:TYPE]->(to)` following the relationship's direction.
    pub(crate) fn relationship_pattern(
        &self,
        from: &Variable,
        relationship: &Relationship,
        edge: Option<&Variable>,
        to: NodePattern,
    ) -> Pattern {
        let mut rel = RelationshipPattern::new(relationship.pattern_direction())
            .rel_type(&relationship.rel_type);
        if let Some(edge) = edge {
            rel = rel.variable(edge);
        }

        Pattern::node(NodePattern::new(from)).related(rel, to)
    }

    /// The properties type stored on `relationship`'s edges, if any.
    pub(crate) fn edge_properties(
        &self,
        relationship: &Relationship,
    ) -> Result<Option<&'a RelationshipProperties>> {
        let Some(name) = &relationship.properties else {
            return Ok(None);
        };

        self.schema
            .relationship_properties(name)
            .map(Some)
            .ok_or_else(|| Error::invalid_schema(format!("unknown properties type `{name}`")))
    }
}

/// `RETURN count(*) AS var` closing a subquery that is only run for its
/// side effects.
pub(crate) fn return_count(env: &mut Environment) -> Clause {
    let var = env.variable("var");
    Return::new(Projection::default().item(Expr::count_star(), &var)).into()
}
