use super::{junction, RelQuantifier};
use crate::translate::{input, Subject, Translator};

use gqlcypher_core::{
    schema::{Entity, Field, Operation, RelationshipProperties},
    stmt::{Expr, Value, Variable},
    Error, Result,
};

impl<'a> Translator<'a> {
    /// Filters on relationships and their properties together, e.g.
    /// `actorsConnection_SOME: { node: {..}, edge: {..} }`.
    pub(crate) fn connection_filter(
        &mut self,
        var: &Variable,
        field: &'a Field,
        quantifier: RelQuantifier,
        value: &Value,
    ) -> Result<Option<Expr>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!(
                "`{}` is not a relationship",
                field.name
            )));
        };
        let properties = self.edge_properties(rel)?;

        let mut predicates = vec![];
        for (target, filter) in self.connection_targets(field, value)? {
            let node = self.env.variable("this");
            let edge = self.env.variable("edge");

            let inner = self.connection_condition(&node, &edge, target, properties, &filter)?;
            let guard = self.rule_filter(&node, target, &[Operation::Read])?;
            let pattern =
                self.relationship_pattern(var, rel, Some(&edge), self.node_pattern(&node, target)?);
            predicates.push(quantifier.quantify(pattern, guard, inner));
        }

        Ok(quantifier.combine(predicates))
    }

    /// Compiles a connection `where` with `node` and `edge` keys.
    pub(crate) fn connection_condition(
        &mut self,
        node: &Variable,
        edge: &Variable,
        target: &'a Entity,
        properties: Option<&'a RelationshipProperties>,
        value: &Value,
    ) -> Result<Option<Expr>> {
        let mut predicates = vec![];

        for (key, value) in input::expect_map("connection where", value)? {
            let predicate = match key.as_str() {
                "AND" | "OR" => {
                    let mut nested = vec![];
                    for item in input::expect_list(key, value)? {
                        nested.push(self.connection_condition(node, edge, target, properties, item)?);
                    }
                    junction(key, nested)
                }
                "NOT" => self
                    .connection_condition(node, edge, target, properties, value)?
                    .map(Expr::not),
                "node" => self.filter(node, Subject::Entity(target), value)?,
                "edge" => match properties {
                    Some(properties) => self.filter(edge, Subject::Edge(properties), value)?,
                    None => {
                        return Err(Error::invalid_request(format!(
                            "relationship to `{}` has no edge properties",
                            target.name
                        )))
                    }
                },
                _ => {
                    return Err(Error::invalid_request(format!(
                        "unknown connection filter `{key}`"
                    )))
                }
            };
            predicates.push(predicate);
        }

        Ok(Expr::and_all(predicates))
    }
}
