use super::{input, return_count, Subject, Translator};
use crate::auth::{self, Rules};

use gqlcypher_core::{
    schema::{Entity, Field, NestedOperation, Operation, Timestamp},
    stmt::{Call, Clause, Expr, Filterable, Match, Merge, NodePattern, Set, Statement, Value, Variable},
    Error, Result,
};

use indexmap::IndexMap;

impl<'a> Translator<'a> {
    /// `connect: { where: { node }, edge, connect }`
    ///
    /// ```text
    /// CALL {
    ///     WITH parent
    ///     MATCH (node:Label)
    ///     WHERE <where> AND <filter rules>
    ///     <assertions>
    ///     MERGE (parent)-[edge:TYPE]->(node)
    ///     SET <edge properties>
    ///     <nested connects>
    ///     RETURN count(*) AS var
    /// }
    /// ```
    ///
    /// The assertions of both ends run before the `MERGE` they guard.
    pub(crate) fn connect(
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
        if let Some(unknown) = item.keys().find(|key| !matches!(key.as_str(), "where" | "edge" | "connect")) {
            return Err(Error::invalid_request(format!(
                "unknown `connect` entry `{unknown}` on `{}`",
                field.name
            )));
        }

        let properties = self.edge_properties(rel)?;
        let filter = item.get("where").filter(|v| !v.is_null());
        let parent_rules = Rules::entity(entity, &[Operation::Connect]);

        let mut clauses = vec![];
        for (target, filter) in self.where_targets(field, member, filter)? {
            let node = self.env.variable("this");
            let rules = Rules::entity(target, &[Operation::Connect]);

            let node_filter = match filter.as_ref().and_then(|filter| filter.get("node")) {
                Some(value) => self.filter(&node, Subject::Entity(target), value)?,
                None => None,
            };
            let guard = self.lower_rules(&node, target, &rules.filter)?;
            let parent_guard = self.lower_rules(parent, entity, &parent_rules.filter)?;
            let before = Expr::and_all([
                self.lower_rules(parent, entity, &parent_rules.before)?,
                self.lower_rules(&node, target, &rules.before)?,
            ]);
            let after = Expr::and_all([
                self.lower_rules(parent, entity, &parent_rules.after)?,
                self.lower_rules(&node, target, &rules.after)?,
            ]);

            let mut body = Statement::new();
            body.push(
                Match::new(self.node_pattern(&node, target)?)
                    .filter(Expr::and_all([node_filter, guard, parent_guard])),
            );
            body.extend(auth::assertion(before));

            let edge = properties.map(|_| self.env.variable("edge"));
            body.push(Merge::new(self.relationship_pattern(
                parent,
                rel,
                edge.as_ref(),
                NodePattern::new(&node),
            )));

            if let (Some(edge), Some(properties)) = (&edge, properties) {
                let empty = IndexMap::new();
                let edge_input = match item.get("edge") {
                    Some(value) if !value.is_null() => input::expect_map("edge", value)?,
                    _ => &empty,
                };
                let written =
                    self.writes(edge, Subject::Edge(properties), edge_input, Timestamp::Create)?;
                if !written.set.is_empty() {
                    body.push(Set::new(written.set));
                }
            }

            if let Some(nested) = item.get("connect").filter(|v| !v.is_null()) {
                for nested in input::one_or_many(nested) {
                    let clauses = self.root_ops(&node, target, NestedOperation::Connect, nested)?;
                    body.extend(clauses.clauses);
                }
            }

            body.extend(auth::assertion(after));
            body.push(return_count(&mut self.env));
            clauses.push(Call::new([parent], body).into());
        }

        Ok(clauses)
    }
}
