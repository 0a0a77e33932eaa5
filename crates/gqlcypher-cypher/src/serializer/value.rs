use super::{expr::Entry, Comma, Formatter, Params, ToCypher};

use gqlcypher_core::stmt::Value;

/// A string literal, double quoted
struct Quoted<'a>(&'a str);

impl ToCypher for &Value {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Value::Null => f.dst.push_str("NULL"),
            Value::Bool(true) => f.dst.push_str("true"),
            Value::Bool(false) => f.dst.push_str("false"),
            Value::Int(value) => f.dst.push_str(&value.to_string()),
            // Debug keeps the fractional part, so `1.0` stays a float
            Value::Float(value) => f.dst.push_str(&format!("{value:?}")),
            Value::String(value) => Quoted(value).to_cypher(f),
            Value::List(values) => {
                fmt!(f, "[" Comma(values) "]");
            }
            Value::Map(entries) if entries.is_empty() => f.dst.push_str("{}"),
            Value::Map(entries) => {
                let entries = entries.iter().map(|(key, value)| Entry(key, value));
                fmt!(f, "{ " Comma(entries) " }");
            }
        }
    }
}

impl ToCypher for Quoted<'_> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push('"');
        for c in self.0.chars() {
            match c {
                '"' => f.dst.push_str("\\\""),
                '\\' => f.dst.push_str("\\\\"),
                '\n' => f.dst.push_str("\\n"),
                '\r' => f.dst.push_str("\\r"),
                '\t' => f.dst.push_str("\\t"),
                c => f.dst.push(c),
            }
        }
        f.dst.push('"');
    }
}
