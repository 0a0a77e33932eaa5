#[macro_use]
mod fmt;
use fmt::ToCypher;

mod delim;
use delim::{Comma, Delimited};

mod ident;
use ident::{Ident, Label};

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod clause;
mod expr;
mod pattern;
mod statement;
mod value;

use gqlcypher_core::{
    stmt::{Expr, ParamTable, Statement},
    Environment,
};

/// Serialize a statement to Cypher text
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Environment that allocated the statement's variables and holds the
    /// values of its parameters
    env: &'a Environment,
}

/// A rendered statement together with the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub cypher: String,

    /// Referenced parameters, in the order they first appear in `cypher`
    pub params: ParamTable,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized Cypher
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    pub fn new(env: &'a Environment) -> Serializer<'a> {
        Serializer { env }
    }

    /// Renders `stmt`, collecting only the parameters the text references.
    ///
    /// Rendering does not modify the statement or the environment, so
    /// rendering the same statement twice yields the same result.
    pub fn serialize(&self, stmt: &Statement) -> Rendered {
        let mut params = ParamTable::new();
        let cypher = self.serialize_with(stmt, &mut params);
        Rendered { cypher, params }
    }

    pub fn serialize_with(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_cypher(&mut fmt);
        ret
    }

    /// Renders a single expression.
    pub fn serialize_expr(&self, expr: &Expr, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        expr.to_cypher(&mut fmt);
        ret
    }
}

impl<'a, T: Params> Formatter<'a, T> {
    /// A formatter writing to `dst` that shares this formatter's parameter
    /// sink.
    fn nested<'b>(&'b mut self, dst: &'b mut String) -> Formatter<'b, T> {
        Formatter {
            serializer: self.serializer,
            dst,
            params: &mut *self.params,
        }
    }
}
