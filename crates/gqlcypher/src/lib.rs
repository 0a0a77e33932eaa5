mod auth;

pub mod compiler;
pub use compiler::{CompiledQuery, Compiler};

mod cursor;

pub mod config;
pub use config::{Config, QueryLimit};

pub mod request;
pub use request::{Operation, Request, ResolveTree};

mod response;

mod translate;

pub use gqlcypher_core::{
    async_trait,
    driver::{self, Executor},
    schema, stmt, Context, Error, Result, Schema,
};
