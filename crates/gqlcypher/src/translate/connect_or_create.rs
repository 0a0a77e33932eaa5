use super::{input, return_count, Subject, Translator};
use crate::auth::{self, Rules};

use gqlcypher_core::{
    schema::{AuthorizationRule, Entity, Field, Operation, Target, Timestamp},
    stmt::{Call, Clause, Expr, Merge, NodePattern, Statement, Value, Variable},
    Error, Result,
};

use indexmap::IndexMap;

impl<'a> Translator<'a> {
    /// `connectOrCreate: { where: { node }, onCreate: { node, edge } }`
    ///
    /// `where.node` may only name unique fields; it becomes the property map
    /// of a `MERGE`. Rules that only read the request context are asserted
    /// before the `MERGE`, rules on the node's properties after it.
    pub(crate) fn connect_or_create(
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

        let target = match (member, self.schema.target(field)) {
            (Some(member), _) => member,
            (None, Some(Target::Entity(target))) => target,
            _ => {
                return Err(Error::invalid_request(format!(
                    "`connectOrCreate` on `{}` requires a concrete target",
                    field.name
                )))
            }
        };

        let key = item
            .get("where")
            .and_then(|filter| filter.get("node"))
            .map(|node| input::expect_map("where.node", node))
            .transpose()?
            .filter(|node| !node.is_empty());
        let Some(key) = key else {
            return Err(Error::invalid_request(format!(
                "`connectOrCreate` on `{}` requires `where.node`",
                field.name
            )));
        };

        let on_create = item.get("onCreate").filter(|v| !v.is_null());
        let node_input = on_create_entry(on_create, "node")?;
        let edge_input = on_create_entry(on_create, "edge")?;

        let node = self.env.variable("this");
        let mut pattern = NodePattern::new(&node).labels(target.resolve_labels(self.cx)?);
        for (name, value) in key {
            let unique = target.find_field(name).filter(|field| field.unique && field.is_stored());
            let Some(unique) = unique else {
                return Err(Error::invalid_request(format!(
                    "`connectOrCreate` on `{}` must match on unique fields, `{name}` is not one",
                    field.name
                )));
            };
            let value = self.field_value(&format!("{node}_{name}"), unique, value)?;
            pattern = pattern.property(unique.property_name(), value);
        }

        // The merge key is written by the pattern itself
        let empty = IndexMap::new();
        let preset: Vec<&str> = key.keys().map(String::as_str).collect();
        let written = self.writes_except(
            &node,
            Subject::Entity(target),
            node_input.unwrap_or(&empty),
            Timestamp::Create,
            &preset,
        )?;

        let mut rules = Rules::entity(target, &[Operation::Connect, Operation::Create]);
        rules.extend(Rules::fields(written.fields.clone(), &[Operation::Create]));
        let parent_rules = Rules::entity(entity, &[Operation::Connect]);

        let mut claims_only: Vec<&AuthorizationRule> = vec![];
        let mut on_node = vec![];
        for rule in rules.filter.iter().chain(&rules.before).chain(&rules.after) {
            if rule.condition.references_node() {
                on_node.push(*rule);
            } else {
                claims_only.push(*rule);
            }
        }

        let before = Expr::and_all([
            self.lower_rules(parent, entity, &parent_rules.filter)?,
            self.lower_rules(parent, entity, &parent_rules.before)?,
            self.lower_rules(&node, target, &claims_only)?,
        ]);
        let after = Expr::and_all([
            self.lower_rules(&node, target, &on_node)?,
            self.lower_rules(parent, entity, &parent_rules.after)?,
        ]);

        let mut body = Statement::new();
        body.extend(auth::assertion(before));
        body.push(Merge::new(pattern).on_create(written.set));

        let properties = self.edge_properties(rel)?;
        let edge = properties.map(|_| self.env.variable("edge"));
        let mut merge = Merge::new(self.relationship_pattern(
            parent,
            rel,
            edge.as_ref(),
            NodePattern::new(&node),
        ));
        if let (Some(edge), Some(properties)) = (&edge, properties) {
            let edge_input = edge_input.unwrap_or(&empty);
            let written = self.writes(edge, Subject::Edge(properties), edge_input, Timestamp::Create)?;
            merge = merge.on_create(written.set);
        }
        body.push(merge);

        body.extend(auth::assertion(after));
        body.push(return_count(&mut self.env));

        Ok(vec![Call::new([parent], body).into()])
    }
}

fn on_create_entry<'v>(
    on_create: Option<&'v Value>,
    name: &str,
) -> Result<Option<&'v IndexMap<String, Value>>> {
    on_create
        .and_then(|on_create| on_create.get(name))
        .filter(|value| !value.is_null())
        .map(|value| input::expect_map(name, value))
        .transpose()
}
