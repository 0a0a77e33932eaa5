use super::{input, return_count, Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, NestedOperation, Operation},
    stmt::{
        Call, Clause, Delete, Expr, ExprReduce, Filterable, Match, Projection, Return, Statement,
        Unwind, Value, Variable, With,
    },
    Error, Result,
};

use indexmap::IndexMap;

impl<'a> Translator<'a> {
    /// `deletePosts(where, delete)`
    ///
    /// Without cascading deletes the matched nodes are detached and deleted
    /// directly. Otherwise every node to delete is collected first, then
    /// all of them are deleted together:
    ///
    /// ```text
    /// MATCH (this:Post) WHERE ..
    /// CALL { WITH this MATCH (this)-[..]->(n) .. RETURN collect(DISTINCT n) AS var0 }
    /// WITH collect(DISTINCT this) + reduce(acc = [], l IN collect(var0) | acc + l) AS var1
    /// UNWIND var1 AS x
    /// DETACH DELETE x
    /// ```
    pub(crate) fn delete(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let this = self.env.variable("this");

        let filter = self.filter_arg(&this, Subject::Entity(entity), tree.get_arg("where"))?;
        let rules = Rules::entity(entity, &[Operation::Delete]);
        let guard = self.lower_rules(&this, entity, &rules.filter)?;
        let assertion = self.lower_rules(&this, entity, &rules.assertions())?;

        let mut stmt = Statement::new();
        stmt.push(Match::new(self.node_pattern(&this, entity)?).filter(Expr::and_all([filter, guard])));
        stmt.extend(auth::assertion(assertion));

        let cascades = match tree.get_arg("delete").filter(|v| !v.is_null()) {
            Some(cascade) => self.cascades(&this, entity, cascade)?,
            None => vec![],
        };

        if cascades.is_empty() {
            stmt.push(Delete::detach(&this));
            return Ok(stmt);
        }

        let mut collected = vec![];
        for (call, var) in cascades {
            stmt.push(call);
            collected.push(var);
        }

        let nodes = self.env.variable("var");
        let gathered = self.gather_nodes(&this, &collected);
        stmt.push(With::new(Projection::default().item(gathered, &nodes)));
        stmt.extend(self.delete_all(&nodes));
        Ok(stmt)
    }

    /// A nested `delete: { where, delete }` inside an update.
    pub(crate) fn nested_delete(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        member: Option<&'a Entity>,
        item: &IndexMap<String, Value>,
    ) -> Result<Vec<Clause>> {
        let mut clauses = vec![];

        for (call, nodes) in self.cascade(parent, field, member, item)? {
            let mut body = Statement::from(call);
            body.extend(self.delete_all(&nodes));
            body.push(return_count(&mut self.env));
            clauses.push(Call::new([parent], body).into());
        }

        Ok(clauses)
    }

    /// The cascades of a `delete` map keyed by relationship field.
    fn cascades(
        &mut self,
        parent: &Variable,
        entity: &'a Entity,
        value: &Value,
    ) -> Result<Vec<(Clause, Variable)>> {
        let mut cascades = vec![];

        for (key, value) in input::expect_map("delete", value)? {
            let Some(field) = entity.find_field(key).filter(|field| field.is_relationship()) else {
                return Err(Error::invalid_request(format!(
                    "`{key}` is not a relationship of `{}`",
                    entity.name
                )));
            };
            self.check_allowed(entity, field, NestedOperation::Delete)?;

            for (member, items) in self.members(field, value)? {
                for item in input::one_or_many(items) {
                    let item = input::expect_map(key, item)?;
                    cascades.extend(self.cascade(parent, field, member, item)?);
                }
            }
        }

        Ok(cascades)
    }

    /// Matches the related nodes of `parent` selected by one delete item,
    /// and the nodes their own cascades reach. Each returned subquery
    /// yields the list of nodes as the paired variable.
    fn cascade(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        member: Option<&'a Entity>,
        item: &IndexMap<String, Value>,
    ) -> Result<Vec<(Clause, Variable)>> {
        let Some(rel) = field.as_relationship() else {
            return Err(Error::invalid_request(format!("`{}` is not a relationship", field.name)));
        };
        if let Some(unknown) = item.keys().find(|key| !matches!(key.as_str(), "where" | "delete")) {
            return Err(Error::invalid_request(format!(
                "unknown `delete` entry `{unknown}` on `{}`",
                field.name
            )));
        }

        let properties = self.edge_properties(rel)?;
        let filter = item.get("where").filter(|v| !v.is_null());

        let mut cascades = vec![];
        for (target, filter) in self.where_targets(field, member, filter)? {
            let node = self.env.variable("this");
            let edge = self.env.variable("edge");
            let rules = Rules::entity(target, &[Operation::Delete]);

            let condition = match &filter {
                Some(filter) => self.connection_condition(&node, &edge, target, properties, filter)?,
                None => None,
            };
            let guard = self.lower_rules(&node, target, &rules.filter)?;
            let assertion = self.lower_rules(&node, target, &rules.assertions())?;

            let pattern =
                self.relationship_pattern(parent, rel, Some(&edge), self.node_pattern(&node, target)?);

            let mut body = Statement::new();
            body.push(Match::new(pattern).filter(Expr::and_all([condition, guard])));
            body.extend(auth::assertion(assertion));

            let mut collected = vec![];
            if let Some(nested) = item.get("delete").filter(|v| !v.is_null()) {
                for (call, var) in self.cascades(&node, target, nested)? {
                    body.push(call);
                    collected.push(var);
                }
            }

            let out = self.env.variable("var");
            let gathered = self.gather_nodes(&node, &collected);
            body.push(Return::new(Projection::default().item(gathered, &out)));

            cascades.push((Call::new([parent], body).into(), out));
        }

        Ok(cascades)
    }

    /// `collect(DISTINCT node)` followed by every node list in `lists`,
    /// flattened across rows.
    fn gather_nodes(&mut self, node: &Variable, lists: &[Variable]) -> Expr {
        let mut gathered = Expr::func_distinct("collect", [Expr::from(node)]);

        for list in lists {
            let accumulator = self.env.variable("acc");
            let item = self.env.variable("l");
            let flattened = ExprReduce {
                init: Box::new(Expr::list([])),
                list: Box::new(Expr::collect(list)),
                expr: Box::new(Expr::add(&accumulator, &item)),
                accumulator,
                variable: item,
            };
            gathered = Expr::add(gathered, flattened);
        }

        gathered
    }

    /// `UNWIND nodes AS x DETACH DELETE x`
    fn delete_all(&mut self, nodes: &Variable) -> Vec<Clause> {
        let node = self.env.variable("x");
        vec![
            Unwind {
                expr: nodes.into(),
                alias: node.clone(),
            }
            .into(),
            Delete::detach(&node).into(),
        ]
    }
}
