use super::{input, projection::selection_types, Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, Interface, Operation, Relationship, Target, Union},
    stmt::{
        Call, Clause, Expr, Filterable, MapProjectionItem, Match, Projection, Return, Statement,
        Union as UnionClause, Value, Variable, With,
    },
    Error, Result,
};

use indexmap::IndexMap;

/// Per-type overrides of an interface filter.
const ON: &str = "_on";

impl<'a> Translator<'a> {
    /// Splits a relationship `where` into one filter per concrete target.
    ///
    /// For an interface, keys outside `_on` apply to every implementation and
    /// `_on: { Type: {..} }` adds keys for one implementation; when only
    /// `_on` is given the other implementations are not matched at all. For
    /// a union, the filter is keyed by member and unlisted members are not
    /// matched.
    pub(crate) fn filter_targets(
        &self,
        field: &Field,
        value: &Value,
    ) -> Result<Vec<(&'a Entity, Value)>> {
        match self.expect_target(field)? {
            Target::Entity(entity) => Ok(vec![(entity, value.clone())]),
            Target::Interface(interface) => self.interface_targets(interface, value),
            Target::Union(union) => self.union_targets(union, value),
        }
    }

    /// Like [`Translator::filter_targets`] for a connection `where`, where
    /// only the `node` key is narrowed per target.
    pub(crate) fn connection_targets(
        &self,
        field: &Field,
        value: &Value,
    ) -> Result<Vec<(&'a Entity, Value)>> {
        let target = self.expect_target(field)?;
        if let Target::Entity(entity) = target {
            return Ok(vec![(entity, value.clone())]);
        }

        let map = input::expect_map("connection where", value)?;
        let node = map.get("node").filter(|node| !node.is_null());

        let narrowed = match (target, node) {
            (Target::Interface(interface), Some(node)) => self.interface_targets(interface, node)?,
            (Target::Union(union), Some(node)) => self.union_targets(union, node)?,
            _ => self.every_target(field),
        };

        Ok(narrowed
            .into_iter()
            .map(|(entity, node)| {
                let mut filter = map.clone();
                filter.insert("node".to_string(), node);
                (entity, Value::Map(filter))
            })
            .collect())
    }

    pub(crate) fn every_target(&self, field: &Field) -> Vec<(&'a Entity, Value)> {
        self.schema
            .concrete_targets(field)
            .into_iter()
            .map(|entity| (entity, Value::Map(IndexMap::new())))
            .collect()
    }

    fn expect_target(&self, field: &Field) -> Result<Target<'a>> {
        self.schema.target(field).ok_or_else(|| {
            Error::invalid_schema(format!("relationship `{}` has no target", field.name))
        })
    }

    fn interface_targets(
        &self,
        interface: &'a Interface,
        value: &Value,
    ) -> Result<Vec<(&'a Entity, Value)>> {
        let map = input::expect_map("where", value)?;
        let common: IndexMap<String, Value> = map
            .iter()
            .filter(|(key, _)| *key != ON)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let on = map
            .get(ON)
            .map(|on| input::expect_map(ON, on))
            .transpose()?;

        if let Some(on) = on {
            if let Some(unknown) = on.keys().find(|name| !interface.implementations.contains(*name)) {
                return Err(Error::invalid_request(format!(
                    "`{unknown}` does not implement `{}`",
                    interface.name
                )));
            }
        }

        let mut targets = vec![];
        for name in &interface.implementations {
            let overrides = on.and_then(|on| on.get(name));
            if common.is_empty() && on.is_some() && overrides.is_none() {
                continue;
            }

            let mut filter = common.clone();
            if let Some(overrides) = overrides {
                for (key, value) in input::expect_map(name, overrides)? {
                    filter.insert(key.clone(), value.clone());
                }
            }

            targets.push((self.schema.expect_entity(name)?, Value::Map(filter)));
        }

        Ok(targets)
    }

    fn union_targets(&self, union: &'a Union, value: &Value) -> Result<Vec<(&'a Entity, Value)>> {
        let map = input::expect_map("where", value)?;

        if let Some(unknown) = map.keys().find(|name| !union.members.contains(*name)) {
            return Err(Error::invalid_request(format!(
                "`{unknown}` is not a member of `{}`",
                union.name
            )));
        }

        let mut targets = vec![];
        for name in &union.members {
            if map.is_empty() || map.contains_key(name) {
                let filter = map
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| Value::Map(IndexMap::new()));
                targets.push((self.schema.expect_entity(name)?, filter));
            }
        }

        Ok(targets)
    }

    /// An interface or union field: one `UNION` branch per concrete target
    /// in declaration order, each tagged with `__resolveType`.
    pub(crate) fn polymorphic_field(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        rel: &'a Relationship,
        tree: &ResolveTree,
    ) -> Result<(Clause, Variable)> {
        let (targets, sort_subject) = match (self.expect_target(field)?, tree.get_arg("where")) {
            (Target::Interface(interface), Some(filter)) => (
                self.interface_targets(interface, filter)?,
                Some(Subject::Interface(interface)),
            ),
            (Target::Union(union), Some(filter)) => (self.union_targets(union, filter)?, None),
            (target, None) => {
                let subject = match target {
                    Target::Interface(interface) => Some(Subject::Interface(interface)),
                    _ => None,
                };
                (self.every_target(field), subject)
            }
            (Target::Entity(_), Some(_)) => {
                return Err(Error::invalid_schema(format!(
                    "`{}` is not an interface or union relationship",
                    field.name
                )))
            }
        };

        let options_arg = tree.get_arg("options");
        let out = self.env.variable("var");

        let options = match sort_subject {
            Some(subject) => self.options(&out, subject, options_arg, None)?,
            None => {
                let has_sort = options_arg
                    .and_then(|options| options.get("sort"))
                    .is_some_and(|sort| !sort.is_null());
                if has_sort {
                    return Err(Error::invalid_request(format!(
                        "union field `{}` cannot be sorted",
                        field.name
                    )));
                }
                match targets.first() {
                    Some((entity, _)) => {
                        self.options(&out, Subject::Entity(entity), options_arg, None)?
                    }
                    None => Default::default(),
                }
            }
        };
        let sort_keys = options.sort_keys();

        let mut branches = vec![];
        for (target, filter) in targets {
            branches.push(self.polymorphic_branch(parent, rel, target, &filter, tree, &sort_keys, &out)?);
        }

        let mut body = Statement::new();
        if branches.is_empty() {
            // Nothing can match; keep the field present with an empty value
            body.push(With::new(Projection::default().item(Expr::null(), &out)).filter(Expr::from(false)));
        } else {
            body.push(Call::new(
                [],
                Statement::from(Clause::from(UnionClause {
                    all: false,
                    branches,
                })),
            ));
        }

        let mut with = With::new(Projection::variables([&out]));
        let has_options = !options.is_empty();
        options.apply(&mut with, &out);
        if has_options {
            body.push(with);
        }

        let collected = if rel.is_many() {
            Expr::collect(&out)
        } else {
            Expr::head_collect(&out)
        };
        body.push(Return::new(Projection::default().item(collected, &out)));

        Ok((Call::new([parent], body).into(), out))
    }

    #[allow(clippy::too_many_arguments)]
    fn polymorphic_branch(
        &mut self,
        parent: &Variable,
        rel: &Relationship,
        target: &'a Entity,
        filter: &Value,
        tree: &ResolveTree,
        sort_keys: &[String],
        out: &Variable,
    ) -> Result<Statement> {
        let node = self.env.variable("this");
        let subject = Subject::Entity(target);

        let filter = self.filter(&node, subject, filter)?;
        let rules = Rules::entity(target, &[Operation::Read]);
        let guard = self.lower_rules(&node, target, &rules.filter)?;
        let assertion = self.lower_rules(&node, target, &rules.assertions())?;

        let selection = tree.fields_for(&selection_types(target));
        let mut shape = self.shape(&node, subject, &selection, sort_keys)?;
        shape.items.insert(
            0,
            MapProjectionItem::Entry("__resolveType".to_string(), Expr::from(target.name.as_str())),
        );

        let pattern = self.relationship_pattern(parent, rel, None, self.node_pattern(&node, target)?);

        let mut branch = Statement::new();
        branch.push(With::new(Projection::variables([parent])));
        branch.push(Match::new(pattern).filter(Expr::and_all([filter, guard, shape.filter.clone()])));
        branch.extend(shape.subqueries.iter().cloned());
        branch.extend(auth::assertion(Expr::and_all([assertion, shape.assertion.clone()])));
        branch.push(Return::new(Projection::default().item(shape.project(&node), out)));

        Ok(branch)
    }
}
