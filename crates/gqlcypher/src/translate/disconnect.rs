use super::{input, return_count, Translator};
use crate::auth::{self, Rules};

use gqlcypher_core::{
    schema::{Entity, Field, NestedOperation, Operation},
    stmt::{Call, Clause, Delete, Expr, Filterable, Match, Statement, Value, Variable},
    Error, Result,
};

use indexmap::IndexMap;

impl<'a> Translator<'a> {
    /// `disconnect: { where: { node, edge }, disconnect }`: deletes the
    /// matching relationships of `parent`, leaving both nodes in place.
    pub(crate) fn disconnect(
        &mut self,
        parent: &Variable,
        entity: &'a Entity,
        field: &'a Field,
        member: Option<&'a Entity>,
        item: &IndexMap<String, Value>,
    ) -> Result<Vec<Clause>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!("`{}` is not a relationship", field.name)));
        };
        if let Some(unknown) = item.keys().find(|key| !matches!(key.as_str(), "where" | "disconnect")) {
            return Err(Error::invalid_request(format!(
                "unknown `disconnect` entry `{unknown}` on `{}`",
                field.name
            )));
        }

        let properties = self.edge_properties(rel)?;
        let filter = item.get("where").filter(|v| !v.is_null());
        let parent_rules = Rules::entity(entity, &[Operation::Disconnect]);

        let mut clauses = vec![];
        for (target, filter) in self.where_targets(field, member, filter)? {
            let node = self.env.variable("this");
            let edge = self.env.variable("edge");
            let rules = Rules::entity(target, &[Operation::Disconnect]);

            let condition = match &filter {
                Some(filter) => self.connection_condition(&node, &edge, target, properties, filter)?,
                None => None,
            };
            let guard = self.lower_rules(&node, target, &rules.filter)?;
            let parent_guard = self.lower_rules(parent, entity, &parent_rules.filter)?;
            let assertion = Expr::and_all([
                self.lower_rules(parent, entity, &parent_rules.assertions())?,
                self.lower_rules(&node, target, &rules.assertions())?,
            ]);

            let pattern = self.relationship_pattern(
                parent,
                rel,
                Some(&edge),
                self.node_pattern(&node, target)?,
            );

            let mut body = Statement::new();
            body.push(Match::new(pattern).filter(Expr::and_all([condition, guard, parent_guard])));
            body.extend(auth::assertion(assertion));

            if let Some(nested) = item.get("disconnect").filter(|v| !v.is_null()) {
                for nested in input::one_or_many(nested) {
                    let nested = self.root_ops(&node, target, NestedOperation::Disconnect, nested)?;
                    body.extend(nested.clauses);
                }
            }

            body.push(Delete::new(&edge));
            body.push(return_count(&mut self.env));
            clauses.push(Call::new([parent], body).into());
        }

        Ok(clauses)
    }
}
