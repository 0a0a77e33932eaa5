use super::{Formatter, ToCypher};

use gqlcypher_core::stmt::{Param, ParamTable, Value};

/// Receives the parameters a statement references as it is rendered.
pub trait Params {
    fn push(&mut self, param: &Param, value: &Value) -> Placeholder;
}

/// The rendered form of a parameter reference, `$name`.
pub struct Placeholder(pub String);

impl Params for ParamTable {
    fn push(&mut self, param: &Param, value: &Value) -> Placeholder {
        if !self.contains(param.name()) {
            self.insert(param.name(), value.clone());
        }

        Placeholder(param.name().to_string())
    }
}

impl ToCypher for Placeholder {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push('$');
        f.dst.push_str(&self.0);
    }
}

impl ToCypher for &Param {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        let env = f.serializer.env;

        // A parameter the environment never bound is sent as null
        let placeholder = match env.param_value(self) {
            Some(value) => f.params.push(self, value),
            None => f.params.push(self, &Value::Null),
        };

        placeholder.to_cypher(f);
    }
}
