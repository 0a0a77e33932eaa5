use super::{input, nested::Nested, return_count, Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, NestedOperation, Operation, Target, Timestamp},
    stmt::{
        Call, Clause, Expr, Filterable, Match, Projection, Remove, Return, Set, Statement, Value,
        Variable,
    },
    Error, Result,
};

use indexmap::IndexMap;

/// Root arguments of an update that operate on relationships, in the order
/// they run.
const ROOT_OPS: &[NestedOperation] = &[
    NestedOperation::Disconnect,
    NestedOperation::Connect,
    NestedOperation::ConnectOrCreate,
    NestedOperation::Create,
    NestedOperation::Delete,
];

impl<'a> Translator<'a> {
    /// `updatePosts(where, update, connect, ..) { posts { .. } }`
    ///
    /// ```text
    /// MATCH (this:Post)
    /// WHERE <where> AND <filter rules>
    /// <before assertions>
    /// SET .. REMOVE ..
    /// <nested operations>
    /// <cardinality checks>
    /// <after assertions>
    /// RETURN collect(DISTINCT this { .. }) AS data
    /// ```
    pub(crate) fn update(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let this = self.env.variable("this");
        let subject = Subject::Entity(entity);

        let filter = self.filter_arg(&this, subject, tree.get_arg("where"))?;

        let empty = IndexMap::new();
        let update = match tree.get_arg("update") {
            Some(update) if !update.is_null() => input::expect_map("update", update)?,
            _ => &empty,
        };

        let written = self.writes(&this, subject, update, Timestamp::Update)?;
        let mut nested = self.nested_inputs(&this, entity, update, Timestamp::Update)?;
        for op in ROOT_OPS {
            if let Some(value) = tree.get_arg(op.input_key()).filter(|v| !v.is_null()) {
                let Nested { clauses, touched } = self.root_ops(&this, entity, *op, value)?;
                nested.clauses.extend(clauses);
                nested.touched.extend(touched);
            }
        }

        let mut rules = Rules::entity(entity, &[Operation::Update]);
        let fields: Vec<&'a Field> = written.fields.iter().chain(&nested.touched).copied().collect();
        rules.extend(Rules::fields(fields, &[Operation::Update]));
        let guard = self.lower_rules(&this, entity, &rules.filter)?;
        let before = self.lower_rules(&this, entity, &rules.before)?;
        let after = self.lower_rules(&this, entity, &rules.after)?;

        let mut stmt = Statement::new();
        stmt.push(Match::new(self.node_pattern(&this, entity)?).filter(Expr::and_all([filter, guard])));
        stmt.extend(auth::assertion(before));
        if !written.set.is_empty() {
            stmt.push(Set::new(written.set));
        }
        if !written.remove.is_empty() {
            stmt.push(Remove { items: written.remove });
        }
        stmt.extend(nested.clauses);
        stmt.extend(self.required_checks(&this, entity, false, &nested.touched)?);
        stmt.extend(auth::assertion(after));

        let (clauses, shape) = self.written_shape(&this, entity, tree)?;
        stmt.extend(clauses);

        let data = self.env.variable("data");
        stmt.push(Return::new(
            Projection::default().item(Expr::func_distinct("collect", [shape]), &data),
        ));
        Ok(stmt)
    }

    /// A nested `update: { node, edge }` of the related nodes of `parent`
    /// matching `filter`.
    pub(crate) fn nested_update(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        member: Option<&'a Entity>,
        filter: Option<&Value>,
        update: &Value,
    ) -> Result<Vec<Clause>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!("`{}` is not a relationship", field.name)));
        };
        let update = input::expect_map("update", update)?;
        if let Some(unknown) = update.keys().find(|key| !matches!(key.as_str(), "node" | "edge")) {
            return Err(Error::invalid_request(format!(
                "unknown `update` entry `{unknown}` on `{}`",
                field.name
            )));
        }

        let properties = self.edge_properties(rel)?;
        let edge_input = match update.get("edge").filter(|v| !v.is_null()) {
            Some(edge) => Some(input::expect_map("edge", edge)?),
            None => None,
        };
        let interface = matches!(self.schema.target(field), Some(Target::Interface(_)));

        let mut clauses = vec![];
        for (target, filter) in self.where_targets(field, member, filter)? {
            let node = self.env.variable("this");
            let edge = self.env.variable("edge");

            let node_input = node_input(target, update.get("node"), interface)?;
            let written = self.writes(&node, Subject::Entity(target), &node_input, Timestamp::Update)?;
            let nested = self.nested_inputs(&node, target, &node_input, Timestamp::Update)?;

            let mut set = written.set;
            match (edge_input, properties) {
                (Some(edge_input), Some(properties)) => {
                    let written =
                        self.writes(&edge, Subject::Edge(properties), edge_input, Timestamp::Update)?;
                    set.extend(written.set);
                }
                (Some(_), None) => {
                    return Err(Error::invalid_request(format!(
                        "`{}` has no relationship properties to update",
                        field.name
                    )))
                }
                (None, _) => {}
            }

            let mut rules = Rules::entity(target, &[Operation::Update]);
            let fields: Vec<&'a Field> =
                written.fields.iter().chain(&nested.touched).copied().collect();
            rules.extend(Rules::fields(fields, &[Operation::Update]));

            let condition = match &filter {
                Some(filter) => self.connection_condition(&node, &edge, target, properties, filter)?,
                None => None,
            };
            let guard = self.lower_rules(&node, target, &rules.filter)?;
            let before = self.lower_rules(&node, target, &rules.before)?;
            let after = self.lower_rules(&node, target, &rules.after)?;

            let pattern =
                self.relationship_pattern(parent, rel, Some(&edge), self.node_pattern(&node, target)?);

            let mut body = Statement::new();
            body.push(Match::new(pattern).filter(Expr::and_all([condition, guard])));
            body.extend(auth::assertion(before));
            if !set.is_empty() {
                body.push(Set::new(set));
            }
            if !written.remove.is_empty() {
                body.push(Remove { items: written.remove });
            }
            body.extend(nested.clauses);
            body.extend(self.required_checks(&node, target, false, &nested.touched)?);
            body.extend(auth::assertion(after));
            body.push(return_count(&mut self.env));

            clauses.push(Call::new([parent], body).into());
        }

        Ok(clauses)
    }
}

/// The `node` input of a nested update as it applies to `target`. Through
/// an interface, entries under `_on.<Implementation>` override the shared
/// ones for that implementation.
fn node_input(
    target: &Entity,
    node: Option<&Value>,
    interface: bool,
) -> Result<IndexMap<String, Value>> {
    let Some(node) = node.filter(|v| !v.is_null()) else {
        return Ok(IndexMap::new());
    };

    let mut merged = input::expect_map("node", node)?.clone();
    let Some(on) = merged.shift_remove("_on") else {
        return Ok(merged);
    };
    if !interface {
        return Err(Error::invalid_request(format!(
            "`_on` is only valid when updating through an interface, not on `{}`",
            target.name
        )));
    }
    if !on.is_null() {
        let on = input::expect_map("_on", &on)?;
        if let Some(specific) = on.get(&target.name).filter(|v| !v.is_null()) {
            for (key, value) in input::expect_map(&target.name, specific)? {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(merged)
}
