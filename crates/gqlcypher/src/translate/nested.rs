use super::{input, Translator};

use gqlcypher_core::{
    schema::{Entity, Field, NestedOperation, Target, Timestamp},
    stmt::{Clause, Value, Variable},
    Error, Result,
};

use indexmap::IndexMap;

/// Nested operations of one relationship field in a create input.
const CREATE_ORDER: &[NestedOperation] = &[
    NestedOperation::Create,
    NestedOperation::Connect,
    NestedOperation::ConnectOrCreate,
];

/// Nested operations of one relationship field in an update input.
const UPDATE_ORDER: &[NestedOperation] = &[
    NestedOperation::Update,
    NestedOperation::Disconnect,
    NestedOperation::Connect,
    NestedOperation::ConnectOrCreate,
    NestedOperation::Create,
    NestedOperation::Delete,
];

/// Clauses compiled from the relationship entries of an input.
#[derive(Debug, Default)]
pub(crate) struct Nested<'a> {
    pub(crate) clauses: Vec<Clause>,

    /// Relationship fields present in the input
    pub(crate) touched: Vec<&'a Field>,
}

impl<'a> Translator<'a> {
    /// Compiles the relationship entries of a create or update input on
    /// `parent`.
    pub(crate) fn nested_inputs(
        &mut self,
        parent: &Variable,
        entity: &'a Entity,
        input: &IndexMap<String, Value>,
        on: Timestamp,
    ) -> Result<Nested<'a>> {
        let order = match on {
            Timestamp::Create => CREATE_ORDER,
            Timestamp::Update => UPDATE_ORDER,
        };

        let mut nested = Nested::default();
        for (key, value) in input {
            let Some(field) = entity.find_field(key).filter(|field| field.is_relationship()) else {
                continue;
            };
            nested.touched.push(field);

            for (member, value) in self.members(field, value)? {
                for ops in input::one_or_many(value) {
                    let ops = input::expect_map(key, ops)?;

                    if let Some(unknown) = ops.keys().find(|key| {
                        !(order.iter().any(|op| op.input_key() == key.as_str())
                            || (on == Timestamp::Update && key.as_str() == "where"))
                    }) {
                        return Err(Error::invalid_request(format!(
                            "unknown nested operation `{unknown}` on `{}.{}`",
                            entity.name, field.name
                        )));
                    }

                    for op in order {
                        let Some(items) = ops.get(op.input_key()).filter(|v| !v.is_null()) else {
                            continue;
                        };

                        let clauses = if *op == NestedOperation::Update {
                            self.check_allowed(entity, field, *op)?;
                            let filter = ops.get("where").filter(|v| !v.is_null());
                            self.nested_update(parent, field, member, filter, items)?
                        } else {
                            self.nested_op(parent, entity, field, member, *op, items)?
                        };
                        nested.clauses.extend(clauses);
                    }
                }
            }
        }

        Ok(nested)
    }

    /// Root `connect`, `disconnect`, `create`, `delete` and
    /// `connectOrCreate` arguments of an update, keyed by relationship field.
    pub(crate) fn root_ops(
        &mut self,
        parent: &Variable,
        entity: &'a Entity,
        op: NestedOperation,
        value: &Value,
    ) -> Result<Nested<'a>> {
        let mut nested = Nested::default();

        for (key, items) in input::expect_map(op.input_key(), value)? {
            let Some(field) = entity.find_field(key).filter(|field| field.is_relationship()) else {
                return Err(Error::invalid_request(format!(
                    "`{key}` is not a relationship of `{}`",
                    entity.name
                )));
            };
            nested.touched.push(field);

            for (member, items) in self.members(field, items)? {
                let clauses = self.nested_op(parent, entity, field, member, op, items)?;
                nested.clauses.extend(clauses);
            }
        }

        Ok(nested)
    }

    /// Runs one nested operation for every item of `items`.
    pub(crate) fn nested_op(
        &mut self,
        parent: &Variable,
        entity: &'a Entity,
        field: &'a Field,
        member: Option<&'a Entity>,
        op: NestedOperation,
        items: &Value,
    ) -> Result<Vec<Clause>> {
        self.check_allowed(entity, field, op)?;

        let mut clauses = vec![];
        for item in input::one_or_many(items) {
            let item = input::expect_map(op.input_key(), item)?;
            clauses.extend(match op {
                NestedOperation::Create => self.create_related(parent, field, member, item)?,
                NestedOperation::Connect => self.connect(parent, entity, field, member, item)?,
                NestedOperation::Disconnect => self.disconnect(parent, entity, field, member, item)?,
                NestedOperation::ConnectOrCreate => {
                    self.connect_or_create(parent, entity, field, member, item)?
                }
                NestedOperation::Delete => self.nested_delete(parent, field, member, item)?,
                NestedOperation::Update => {
                    let filter = item.get("where").filter(|v| !v.is_null());
                    let Some(update) = item.get("update") else {
                        return Err(Error::invalid_request("`update` requires an `update` entry"));
                    };
                    self.nested_update(parent, field, member, filter, update)?
                }
            });
        }

        Ok(clauses)
    }

    pub(crate) fn check_allowed(
        &self,
        entity: &Entity,
        field: &Field,
        op: NestedOperation,
    ) -> Result<()> {
        match field.as_relationship() {
            Some(rel) if rel.allows(op) => Ok(()),
            _ => Err(Error::invalid_request(format!(
                "`{}` is not allowed on `{}.{}`",
                op.input_key(),
                entity.name,
                field.name
            ))),
        }
    }

    /// Splits an input for a union field by member. Inputs for other
    /// fields are returned whole.
    pub(crate) fn members<'v>(
        &self,
        field: &Field,
        value: &'v Value,
    ) -> Result<Vec<(Option<&'a Entity>, &'v Value)>> {
        let Some(Target::Union(union)) = self.schema.target(field) else {
            return Ok(vec![(None, value)]);
        };

        let mut members = vec![];
        for (name, value) in input::expect_map(&field.name, value)? {
            if !union.members.contains(name) {
                return Err(Error::invalid_request(format!(
                    "`{name}` is not a member of `{}`",
                    union.name
                )));
            }
            members.push((Some(self.schema.expect_entity(name)?), value));
        }
        Ok(members)
    }

    /// The concrete targets an operation with a connection `where` reaches,
    /// each with the `where` narrowed to it.
    pub(crate) fn where_targets(
        &self,
        field: &Field,
        member: Option<&'a Entity>,
        filter: Option<&Value>,
    ) -> Result<Vec<(&'a Entity, Option<Value>)>> {
        if let Some(member) = member {
            return Ok(vec![(member, filter.cloned())]);
        }

        match filter {
            Some(filter) => Ok(self
                .connection_targets(field, filter)?
                .into_iter()
                .map(|(entity, filter)| (entity, Some(filter)))
                .collect()),
            None => Ok(self
                .every_target(field)
                .into_iter()
                .map(|(entity, _)| (entity, None))
                .collect()),
        }
    }

    /// The entity a nested `create` builds. An interface field names the
    /// implementation as the single key of `node`.
    pub(crate) fn create_target<'v>(
        &self,
        field: &Field,
        member: Option<&'a Entity>,
        node: &'v Value,
    ) -> Result<(&'a Entity, &'v Value)> {
        if let Some(member) = member {
            return Ok((member, node));
        }

        match self.schema.target(field) {
            Some(Target::Entity(entity)) => Ok((entity, node)),
            Some(Target::Interface(interface)) => {
                let map = input::expect_map("node", node)?;
                match map.iter().next() {
                    Some((name, node))
                        if map.len() == 1 && interface.implementations.contains(name) =>
                    {
                        Ok((self.schema.expect_entity(name)?, node))
                    }
                    _ => Err(Error::invalid_request(format!(
                        "`create` on `{}` must name exactly one implementation of `{}`",
                        field.name, interface.name
                    ))),
                }
            }
            _ => Err(Error::invalid_request(format!(
                "`create` on `{}` must name a member",
                field.name
            ))),
        }
    }
}
