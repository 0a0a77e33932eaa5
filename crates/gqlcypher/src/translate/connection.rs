use super::{input, projection::selection_types, Subject, Translator};
use crate::{
    auth::{self, Rules},
    cursor, QueryLimit, ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, Operation, Relationship, Target},
    stmt::{
        Call, Clause, Expr, Filterable, Match, Orderable, Projection, Return, SortDirection,
        Statement, Variable, With,
    },
    Error, Result,
};

/// Which part of an edge a sort key reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortTarget {
    Node,
    Properties,
}

/// The rows of a connection before pagination: one `{ node, properties }`
/// map per edge.
struct Edges {
    entry: Expr,
    sort: Vec<(SortTarget, String, SortDirection)>,
}

impl<'a> Translator<'a> {
    /// `postsConnection(where, sort, first, after) { edges totalCount pageInfo }`
    pub(crate) fn root_connection(&mut self, entity: &'a Entity, tree: &ResolveTree) -> Result<Statement> {
        let this = self.env.variable("this");
        let subject = Subject::Entity(entity);

        let filter = self.filter_arg(&this, subject, tree.get_arg("where"))?;
        let rules = Rules::entity(entity, &[Operation::Read]);
        let guard = self.lower_rules(&this, entity, &rules.filter)?;
        let assertion = self.lower_rules(&this, entity, &rules.assertions())?;

        let mut sort = vec![];
        if let Some(value) = tree.get_arg("sort") {
            for item in input::one_or_many(value) {
                for (name, direction) in input::expect_map("sort", item)? {
                    let (name, direction) = self.sort_key(subject, name, direction)?;
                    sort.push((SortTarget::Node, name, direction));
                }
            }
        }

        let node_tree = edges_field(tree, "node");
        let sort_keys = sort_keys(&sort, SortTarget::Node);
        let selection = node_tree
            .map(|node| node.fields_for(&selection_types(entity)))
            .unwrap_or_default();
        let shape = self.shape(&this, subject, &selection, &sort_keys)?;

        let mut stmt = Statement::new();
        stmt.push(
            Match::new(self.node_pattern(&this, entity)?)
                .filter(Expr::and_all([filter, guard, shape.filter.clone()])),
        );
        stmt.extend(shape.subqueries.iter().cloned());
        stmt.extend(auth::assertion(Expr::and_all([assertion, shape.assertion.clone()])));

        let edges = Edges {
            entry: Expr::map([("node", shape.project(&this))]),
            sort,
        };
        stmt.extend(self.paginate(edges, tree, self.config.limit, &this)?);
        Ok(stmt)
    }

    /// `actorsConnection { edges { node properties } totalCount }` selected
    /// on a node.
    pub(crate) fn connection_selection(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        rel: &'a Relationship,
        tree: &ResolveTree,
    ) -> Result<(Clause, Variable)> {
        let Some(Target::Entity(target)) = self.schema.target(field) else {
            return Err(Error::invalid_request(format!(
                "connections of `{}` require a single target type",
                field.name
            )));
        };

        let properties = self.edge_properties(rel)?;
        let node = self.env.variable("this");
        let edge = self.env.variable("edge");

        let filter = match tree.get_arg("where") {
            Some(value) => self.connection_condition(&node, &edge, target, properties, value)?,
            None => None,
        };
        let rules = Rules::entity(target, &[Operation::Read]);
        let guard = self.lower_rules(&node, target, &rules.filter)?;
        let assertion = self.lower_rules(&node, target, &rules.assertions())?;

        let mut sort = vec![];
        if let Some(value) = tree.get_arg("sort") {
            for item in input::one_or_many(value) {
                for (key, keys) in input::expect_map("sort", item)? {
                    let (part, subject) = match (key.as_str(), properties) {
                        ("node", _) => (SortTarget::Node, Subject::Entity(target)),
                        ("edge", Some(properties)) => {
                            (SortTarget::Properties, Subject::Edge(properties))
                        }
                        _ => {
                            return Err(Error::invalid_request(format!(
                                "cannot sort `{}` by `{key}`",
                                field.name
                            )))
                        }
                    };
                    for (name, direction) in input::expect_map(key, keys)? {
                        let (name, direction) = self.sort_key(subject, name, direction)?;
                        sort.push((part, name, direction));
                    }
                }
            }
        }

        let node_selection = edges_field(tree, "node")
            .map(|node| node.fields_for(&selection_types(target)))
            .unwrap_or_default();
        let node_shape = self.shape(
            &node,
            Subject::Entity(target),
            &node_selection,
            &sort_keys(&sort, SortTarget::Node),
        )?;

        let mut entry = vec![("node", node_shape.project(&node))];
        if let Some(properties) = properties {
            let selection = edges_field(tree, "properties")
                .map(|selected| selected.fields_for(&[properties.name.as_str()]))
                .unwrap_or_default();
            let edge_shape = self.shape(
                &edge,
                Subject::Edge(properties),
                &selection,
                &sort_keys(&sort, SortTarget::Properties),
            )?;
            entry.push(("properties", edge_shape.project(&edge)));
        }

        let pattern =
            self.relationship_pattern(parent, rel, Some(&edge), self.node_pattern(&node, target)?);

        let mut body = Statement::new();
        body.push(
            Match::new(pattern).filter(Expr::and_all([filter, guard, node_shape.filter.clone()])),
        );
        body.extend(node_shape.subqueries.iter().cloned());
        body.extend(auth::assertion(Expr::and_all([
            assertion,
            node_shape.assertion.clone(),
        ])));

        let out = self.env.variable("var");
        let edges = Edges {
            entry: Expr::map(entry),
            sort,
        };
        body.extend(self.paginate(edges, tree, None, &out)?);

        Ok((Call::new([parent], body).into(), out))
    }

    /// Orders the edges, collects them and slices the requested page:
    ///
    /// ```text
    /// WITH { node: .. } AS edge ORDER BY ..
    /// WITH collect(edge) AS edges
    /// WITH edges, size(edges) AS totalCount
    /// RETURN { edges: edges[$after..$end], totalCount: totalCount } AS out
    /// ```
    fn paginate(
        &mut self,
        edges: Edges,
        tree: &ResolveTree,
        limit: Option<QueryLimit>,
        out: &Variable,
    ) -> Result<Vec<Clause>> {
        let edge = self.env.variable("edge");
        let list = self.env.variable("edges");
        let total = self.env.variable("totalCount");

        let mut ordered = With::new(Projection::default().item(edges.entry, &edge));
        for (part, key, direction) in edges.sort {
            let part = match part {
                SortTarget::Node => "node",
                SortTarget::Properties => "properties",
            };
            ordered.order_by(Expr::property(edge.property(part), key), direction);
        }

        let (offset, first) = page(tree, limit)?;
        let from = match offset {
            0 => None,
            offset => Some(self.param(&format!("{out}_after"), offset)),
        };
        let to = first.map(|first| self.param(&format!("{out}_first"), offset + first));
        let page = match (from.is_some(), to.is_some()) {
            (false, false) => Expr::from(&list),
            _ => Expr::slice(&list, from, to),
        };

        Ok(vec![
            ordered.into(),
            With::new(Projection::default().item(Expr::collect(&edge), &list)).into(),
            With::new(Projection::variables([&list]).item(Expr::func("size", [Expr::from(&list)]), &total))
                .into(),
            Return::new(Projection::default().item(
                Expr::map([("edges", page), ("totalCount", Expr::from(&total))]),
                out,
            ))
            .into(),
        ])
    }
}

/// The offset an `after` cursor resumes from and the requested page size.
pub(crate) fn page(tree: &ResolveTree, limit: Option<QueryLimit>) -> Result<(i64, Option<i64>)> {
    let offset = match tree.get_arg("after") {
        Some(after) => cursor::decode(input::expect_str("after", after)?)?
            .checked_add(1)
            .ok_or_else(|| Error::invalid_request("`after` cursor is out of range"))?,
        None => 0,
    };

    let requested = match tree.get_arg("first") {
        Some(first) => match input::expect_int("first", first)? {
            n if n < 0 => {
                return Err(Error::invalid_request("`first` must not be negative"));
            }
            n => Some(n),
        },
        None => None,
    };

    let first = match limit {
        Some(limit) => limit.apply(requested),
        None => requested,
    };

    // The page end is rendered as `offset + first`
    if first.is_some_and(|first| offset.checked_add(first).is_none()) {
        return Err(Error::invalid_request("`after` cursor is out of range"));
    }
    Ok((offset, first))
}

/// A field selected under `edges`, e.g. `edges { node { .. } }`.
fn edges_field<'t>(tree: &'t ResolveTree, name: &str) -> Option<&'t ResolveTree> {
    tree.all_fields()
        .filter(|field| field.name == "edges")
        .find_map(|edges| edges.find(name))
}

fn sort_keys(sort: &[(SortTarget, String, SortDirection)], part: SortTarget) -> Vec<String> {
    sort.iter()
        .filter(|(target, _, _)| *target == part)
        .map(|(_, key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_resumes_past_the_cursor() {
        let tree = ResolveTree::new("postsConnection")
            .arg("after", cursor::encode(4))
            .arg("first", 10);
        assert_eq!(page(&tree, None).unwrap(), (5, Some(10)));
    }

    #[test]
    fn configured_limit_caps_first() {
        let limit = QueryLimit {
            default: Some(5),
            max: Some(20),
        };
        let tree = ResolveTree::new("postsConnection");
        assert_eq!(page(&tree, Some(limit)).unwrap(), (0, Some(5)));

        let tree = tree.arg("first", 100);
        assert_eq!(page(&tree, Some(limit)).unwrap(), (0, Some(20)));
    }

    #[test]
    fn cursors_past_the_last_offset_are_rejected() {
        let tree = ResolveTree::new("postsConnection").arg("after", cursor::encode(i64::MAX));
        assert!(page(&tree, None).unwrap_err().is_invalid_request());

        let tree = ResolveTree::new("postsConnection")
            .arg("after", cursor::encode(i64::MAX - 1))
            .arg("first", 10);
        assert!(page(&tree, None).unwrap_err().is_invalid_request());
    }

    #[test]
    fn cursors_must_be_strings() {
        let tree = ResolveTree::new("postsConnection").arg("after", 3);
        assert!(page(&tree, None).unwrap_err().is_invalid_request());
    }
}
