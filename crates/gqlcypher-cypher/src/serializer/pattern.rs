use super::{expr::Entry, Comma, Formatter, Label, Params, ToCypher};

use gqlcypher_core::stmt::{Direction, Expr, NodePattern, Pattern, RelationshipPattern};

/// ` { key: expr, .. }` trailing a node or relationship
struct Properties<'a>(&'a [(String, Expr)]);

impl ToCypher for &Pattern {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.start);

        for step in &self.steps {
            let relationship = &step.relationship;
            let node = &step.node;
            fmt!(f, relationship node);
        }
    }
}

impl ToCypher for &NodePattern {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push('(');
        fmt!(f, self.variable.as_ref());
        for label in &self.labels {
            fmt!(f, Label(label));
        }
        fmt!(f, Properties(&self.properties) ")");
    }
}

impl ToCypher for &RelationshipPattern {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        f.dst.push_str(match self.direction {
            Direction::Incoming => "<-",
            Direction::Outgoing | Direction::Undirected => "-",
        });

        if self.variable.is_some() || self.rel_type.is_some() || !self.properties.is_empty() {
            f.dst.push('[');
            fmt!(f, self.variable.as_ref());
            if let Some(rel_type) = &self.rel_type {
                fmt!(f, Label(rel_type));
            }
            fmt!(f, Properties(&self.properties) "]");
        }

        f.dst.push_str(match self.direction {
            Direction::Outgoing => "->",
            Direction::Incoming | Direction::Undirected => "-",
        });
    }
}

impl ToCypher for Properties<'_> {
    fn to_cypher<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.0.is_empty() {
            return;
        }

        // Only separate from a preceding variable or label
        if !matches!(f.dst.chars().last(), Some('(' | '[')) {
            f.dst.push(' ');
        }

        let entries = self.0.iter().map(|(key, value)| Entry(key, value));
        fmt!(f, "{ " Comma(entries) " }");
    }
}
