use super::{Subject, Translator};
use crate::{
    auth::{self, Rules},
    ResolveTree,
};

use gqlcypher_core::{
    schema::{Entity, Field, FieldCypher, FieldPoint, FieldTy, Operation, Relationship, Target},
    stmt::{
        Call, Clause, Expr, Filterable, MapProjectionItem, Match, Projection, Return, Statement,
        Variable, With,
    },
    Error, Result,
};

use indexmap::IndexMap;

/// The projection of one matched node.
#[derive(Debug, Default)]
pub(crate) struct Shape {
    pub(crate) items: Vec<MapProjectionItem>,

    /// Subqueries computing relationship, aggregate and computed fields. They
    /// run after the node is matched and before it is projected.
    pub(crate) subqueries: Vec<Clause>,

    /// Filter rules of the selected fields
    pub(crate) filter: Option<Expr>,

    /// Assertions of the selected fields
    pub(crate) assertion: Option<Expr>,
}

impl Shape {
    /// `var { .. }`
    pub(crate) fn project(&self, var: &Variable) -> Expr {
        Expr::map_projection(var, self.items.clone())
    }

    fn has_key(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key() == key)
    }
}

/// Type names whose selection applies to a node of `entity`.
pub(crate) fn selection_types(entity: &Entity) -> Vec<&str> {
    entity
        .interfaces
        .iter()
        .map(String::as_str)
        .chain([entity.name.as_str()])
        .collect()
}

impl<'a> Translator<'a> {
    /// Builds the projection of `var` for `selection`.
    ///
    /// `sort_keys` names fields that must be present in the projected map for
    /// ordering even when the request does not select them.
    pub(crate) fn shape(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        selection: &IndexMap<&str, &ResolveTree>,
        sort_keys: &[String],
    ) -> Result<Shape> {
        let mut shape = Shape::default();
        let mut selected = vec![];

        for (key, tree) in selection {
            if let Some(field) = self.shape_field(var, subject, key, tree, &mut shape)? {
                selected.push(field);
            }
        }

        for key in sort_keys {
            if !shape.has_key(key) {
                self.shape_field(var, subject, key, &ResolveTree::new(key.clone()), &mut shape)?;
            }
        }

        if let Some(entity) = subject.entity() {
            let rules = Rules::fields(selected, &[Operation::Read]);
            shape.filter = self.lower_rules(var, entity, &rules.filter)?;
            shape.assertion = self.lower_rules(var, entity, &rules.assertions())?;
        }

        Ok(shape)
    }

    /// Adds one selected field to `shape`, returning the schema field it
    /// resolved to.
    fn shape_field(
        &mut self,
        var: &Variable,
        subject: Subject<'a>,
        key: &str,
        tree: &ResolveTree,
        shape: &mut Shape,
    ) -> Result<Option<&'a Field>> {
        let name = tree.name.as_str();

        // Filled in from the node's type when the response is shaped
        if name == "__typename" {
            return Ok(None);
        }

        if let Some(entity) = subject.entity().filter(|e| e.is_global_id_key(name)) {
            let field = self.global_id_field(entity)?;
            shape.items.push(MapProjectionItem::Entry(
                key.to_string(),
                var.property(field.property_name()),
            ));
            return Ok(None);
        }

        if let Some(field) = subject.find_field(name) {
            if !field.selectable {
                return Err(Error::invalid_request(format!(
                    "field `{name}` of `{}` cannot be selected",
                    subject.name()
                )));
            }

            let item = match &field.ty {
                FieldTy::Primitive(_) => property_item(var, key, field),
                FieldTy::Temporal(_) => {
                    let property = var.property(field.property_name());
                    let value = if field.is_list() {
                        self.map_list(property, |item| Expr::func("toString", [item]))
                    } else {
                        Expr::func("toString", [property])
                    };
                    MapProjectionItem::Entry(key.to_string(), value)
                }
                FieldTy::Point(point) => {
                    let value = self.point_projection(var, field, point, tree);
                    MapProjectionItem::Entry(key.to_string(), value)
                }
                FieldTy::Cypher(cypher) => {
                    let (call, out) = self.cypher_field(var, cypher)?;
                    shape.subqueries.push(call);
                    MapProjectionItem::Entry(key.to_string(), out.into())
                }
                FieldTy::Relationship(rel) | FieldTy::Interface(rel) | FieldTy::Union(rel) => {
                    let (call, out) = self.relationship_field(var, field, rel, tree)?;
                    shape.subqueries.push(call);
                    MapProjectionItem::Entry(key.to_string(), out.into())
                }
            };
            shape.items.push(item);
            return Ok(Some(field));
        }

        let relationship = |suffix: &str| {
            name.strip_suffix(suffix)
                .and_then(|name| subject.find_field(name))
                .and_then(|field| Some((field, field.as_relationship()?)))
        };

        let (call, out) = if let Some((field, rel)) = relationship("Aggregate") {
            self.aggregate_selection(var, field, rel, tree)?
        } else if let Some((field, rel)) = relationship("Connection") {
            self.connection_selection(var, field, rel, tree)?
        } else {
            return Err(Error::invalid_request(format!(
                "unknown field `{name}` on `{}`",
                subject.name()
            )));
        };

        shape.subqueries.push(call);
        shape
            .items
            .push(MapProjectionItem::Entry(key.to_string(), out.into()));
        Ok(None)
    }

    /// The projection of a node written by a mutation, selected as e.g.
    /// `createPosts { posts { .. } }`. Returns the clauses computing the
    /// projection and the projected map.
    pub(crate) fn written_shape(
        &mut self,
        var: &Variable,
        entity: &'a Entity,
        tree: &ResolveTree,
    ) -> Result<(Vec<Clause>, Expr)> {
        let root = entity.root_field();
        let selection = tree
            .all_fields()
            .find(|field| field.name == root)
            .map(|field| field.fields_for(&selection_types(entity)))
            .unwrap_or_default();
        let shape = self.shape(var, Subject::Entity(entity), &selection, &[])?;

        let rules = Rules::entity(entity, &[Operation::Read]);
        let assertion = self.lower_rules(var, entity, &rules.assertions())?;

        let mut clauses = shape.subqueries.clone();
        clauses.extend(auth::assertion(Expr::and_all([assertion, shape.assertion.clone()])));
        Ok((clauses, shape.project(var)))
    }

    pub(crate) fn global_id_field(&self, entity: &'a Entity) -> Result<&'a Field> {
        let name = entity.global_id.as_deref().unwrap_or_default();
        entity.expect_field(name)
    }

    /// A point as a map of the selected components, or null.
    fn point_projection(
        &mut self,
        var: &Variable,
        field: &Field,
        point: &FieldPoint,
        tree: &ResolveTree,
    ) -> Expr {
        let selected: Vec<(String, String)> = tree
            .all_fields()
            .filter(|component| point.components().contains(&component.name.as_str()))
            .map(|component| (component.response_key().to_string(), component.name.clone()))
            .collect();

        let components = move |point: Expr| {
            Expr::map(
                selected
                    .iter()
                    .map(|(key, name)| (key.clone(), Expr::property(point.clone(), name.clone()))),
            )
        };

        let property = var.property(field.property_name());
        if point.list {
            return self.map_list(property, components);
        }

        Expr::case(
            vec![(Expr::is_not_null(property.clone()), components(property))],
            Some(Expr::null()),
        )
    }

    /// A computed field: runs the field's statement in a nested subquery
    /// with the parent bound as `this`.
    fn cypher_field(&mut self, parent: &Variable, cypher: &FieldCypher) -> Result<(Clause, Variable)> {
        self.raw_statement_params(&cypher.statement);

        let mut inner = Statement::new();
        if parent.name() != "this" {
            inner.push(Clause::raw(format!("WITH {parent} AS this")));
        }
        inner.push(Clause::raw(cypher.statement.clone()));

        let out = self.env.variable("var");
        let collected = if cypher.list {
            Expr::collect(&out)
        } else {
            Expr::head_collect(&out)
        };

        let mut body = Statement::new();
        body.push(Call::new([parent], inner));
        body.push(With::new(
            Projection::default().item(Expr::raw(cypher.column.clone()), &out),
        ));
        body.push(Return::new(Projection::default().item(collected, &out)));

        Ok((Call::new([parent], body).into(), out))
    }

    /// The nodes related through `field`, projected and collected into one
    /// value per parent.
    fn relationship_field(
        &mut self,
        parent: &Variable,
        field: &'a Field,
        rel: &'a Relationship,
        tree: &ResolveTree,
    ) -> Result<(Clause, Variable)> {
        let target = match self.schema.target(field) {
            Some(Target::Entity(target)) => target,
            Some(_) => return self.polymorphic_field(parent, field, rel, tree),
            None => {
                return Err(Error::invalid_schema(format!(
                    "relationship `{}` has no target",
                    field.name
                )))
            }
        };

        let node = self.env.variable("this");
        let subject = Subject::Entity(target);

        let filter = self.filter_arg(&node, subject, tree.get_arg("where"))?;
        let rules = Rules::entity(target, &[Operation::Read]);
        let guard = self.lower_rules(&node, target, &rules.filter)?;
        let assertion = self.lower_rules(&node, target, &rules.assertions())?;

        let options = self.options(&node, subject, tree.get_arg("options"), None)?;
        let selection = tree.fields_for(&selection_types(target));
        let shape = self.shape(&node, subject, &selection, &options.sort_keys())?;

        let pattern = self.relationship_pattern(parent, rel, None, self.node_pattern(&node, target)?);

        let mut body = Statement::new();
        body.push(Match::new(pattern).filter(Expr::and_all([filter, guard, shape.filter.clone()])));
        body.extend(shape.subqueries.iter().cloned());
        body.extend(auth::assertion(Expr::and_all([assertion, shape.assertion.clone()])));

        let mut with = With::new(Projection::default().item(shape.project(&node), &node));
        options.apply(&mut with, &node);
        body.push(with);

        let out = self.env.variable("var");
        let collected = if rel.is_many() {
            Expr::collect(&node)
        } else {
            Expr::head_collect(&node)
        };
        body.push(Return::new(Projection::default().item(collected, &out)));

        Ok((Call::new([parent], body).into(), out))
    }
}

/// `.name`, or `key: var.property` when the key or stored name differ.
fn property_item(var: &Variable, key: &str, field: &Field) -> MapProjectionItem {
    if key == field.property_name() {
        MapProjectionItem::Property(key.to_string())
    } else {
        MapProjectionItem::Entry(key.to_string(), var.property(field.property_name()))
    }
}
