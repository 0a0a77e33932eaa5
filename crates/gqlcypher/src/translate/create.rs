use super::{input, Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, Operation, Timestamp},
    stmt::{
        Call, Clause, Create, Expr, NodePattern, Projection, Return, Set, Statement, Value,
        Variable,
    },
    Error, Result,
};

use indexmap::IndexMap;

/// A node being created: the clauses that write it, and the checks that
/// run once everything it links to exists.
struct Created {
    writes: Vec<Clause>,
    checks: Vec<Clause>,
}

impl<'a> Translator<'a> {
    /// `createPosts(input: [..]) { posts { .. } }`
    ///
    /// Each input is created in its own subquery. The created nodes are
    /// projected together as `data`.
    pub(crate) fn create(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let Some(inputs) = tree.get_arg("input") else {
            return Err(Error::invalid_request("`input` is required"));
        };

        let mut stmt = Statement::new();
        let mut created = vec![];

        for input in input::one_or_many(inputs) {
            let node = self.env.variable("this");
            let Created { writes, checks } =
                self.create_node(&node, entity, input::expect_map("input", input)?)?;

            let mut body = Statement::from(writes);
            body.extend(checks);
            body.push(Return::new(Projection::variables([&node])));

            stmt.push(Call::new([], body));
            created.push(node);
        }

        let mut projected = vec![];
        for node in &created {
            let (clauses, shape) = self.written_shape(node, entity, tree)?;
            stmt.extend(clauses);
            projected.push(shape);
        }

        let data = self.env.variable("data");
        stmt.push(Return::new(Projection::default().item(Expr::list(projected), &data)));
        Ok(stmt)
    }

    /// `CREATE (node:Label) SET ..` followed by the input's nested
    /// operations.
    fn create_node(
        &mut self,
        node: &Variable,
        entity: &'a Entity,
        input: &IndexMap<String, Value>,
    ) -> Result<Created> {
        let written = self.writes(node, Subject::Entity(entity), input, Timestamp::Create)?;
        let nested = self.nested_inputs(node, entity, input, Timestamp::Create)?;

        let mut rules = Rules::entity(entity, &[Operation::Create]);
        let fields: Vec<&'a Field> = written.fields.iter().chain(&nested.touched).copied().collect();
        rules.extend(Rules::fields(fields, &[Operation::Create]));
        let before = self.lower_rules(node, entity, &rules.before)?;
        let after = self.lower_rules(node, entity, &rules.after)?;

        let mut writes: Vec<Clause> = vec![Create::new(self.node_pattern(node, entity)?).into()];
        if !written.set.is_empty() {
            writes.push(Set::new(written.set).into());
        }
        writes.extend(auth::assertion(before));
        writes.extend(nested.clauses);

        let mut checks = self.required_checks(node, entity, true, &nested.touched)?;
        checks.extend(auth::assertion(after));

        Ok(Created { writes, checks })
    }

    /// A nested `create: { node, edge }`: creates the node and links it to
    /// `parent`.
    pub(crate) fn create_related(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        member: Option<&'a Entity>,
        item: &IndexMap<String, Value>,
    ) -> Result<Vec<Clause>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!("`{}` is not a relationship", field.name)));
        };
        let Some(node_input) = item.get("node") else {
            return Err(Error::invalid_request(format!(
                "`create` on `{}` requires `node`",
                field.name
            )));
        };

        let (target, node_input) = self.create_target(field, member, node_input)?;
        let node = self.env.variable("this");
        let Created { mut writes, checks } =
            self.create_node(&node, target, input::expect_map("node", node_input)?)?;

        let properties = self.edge_properties(rel)?;
        let edge = properties.map(|_| self.env.variable("edge"));
        writes.push(
            Create::new(self.relationship_pattern(parent, rel, edge.as_ref(), NodePattern::new(&node)))
                .into(),
        );

        if let (Some(edge), Some(properties)) = (&edge, properties) {
            let empty = IndexMap::new();
            let edge_input = match item.get("edge") {
                Some(value) if !value.is_null() => input::expect_map("edge", value)?,
                _ => &empty,
            };
            let written = self.writes(edge, Subject::Edge(properties), edge_input, Timestamp::Create)?;
            if !written.set.is_empty() {
                writes.push(Set::new(written.set).into());
            }
        }

        writes.extend(checks);
        Ok(writes)
    }
}
