mod resolve_tree;
pub use resolve_tree::ResolveTree;

use gqlcypher_core::{Error, Result, Schema};

/// A resolved root field of an incoming request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub operation: Operation,

    /// Name of the entity the root field operates on
    pub entity: String,

    /// The root field, its arguments and its selection
    pub tree: ResolveTree,
}

/// Root operations, one per generated root field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `posts`
    Read,

    /// `postsAggregate`
    Aggregate,

    /// `postsConnection`
    Connection,

    /// `createPosts`
    Create,

    /// `updatePosts`
    Update,

    /// `deletePosts`
    Delete,
}

impl Request {
    pub fn new(operation: Operation, entity: impl Into<String>, tree: ResolveTree) -> Request {
        Request {
            operation,
            entity: entity.into(),
            tree,
        }
    }

    /// Derives the operation and entity from the root field name.
    pub fn from_root_field(schema: &Schema, tree: ResolveTree) -> Result<Request> {
        for entity in schema.entities() {
            let root = entity.root_field();
            let plural = heck::ToUpperCamelCase::to_upper_camel_case(entity.plural.as_str());

            let operation = if tree.name == root {
                Operation::Read
            } else if tree.name == format!("{root}Aggregate") {
                Operation::Aggregate
            } else if tree.name == format!("{root}Connection") {
                Operation::Connection
            } else if tree.name == format!("create{plural}") {
                Operation::Create
            } else if tree.name == format!("update{plural}") {
                Operation::Update
            } else if tree.name == format!("delete{plural}") {
                Operation::Delete
            } else {
                continue;
            };

            return Ok(Request::new(operation, entity.name.clone(), tree));
        }

        Err(Error::invalid_request(format!(
            "unknown root field `{}`",
            tree.name
        )))
    }
}

impl Operation {
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}
