//! Shapes executor rows into the response a request's selection describes.
//!
//! The statement projects maps keyed by response key. Shaping fills in what
//! the database cannot produce: `__typename`, opaque global ids, connection
//! cursors and page info, and the `info` block of mutations. Keys projected
//! only to support sorting are dropped here.

use crate::{
    cursor,
    request::Operation,
    translate::{page, selection_types},
    Config, QueryLimit, Request, ResolveTree,
};

use gqlcypher_core::{
    driver::{Record, Response},
    schema::{Entity, Relationship, Target},
    stmt::Value,
    Result, Schema,
};

use indexmap::IndexMap;

/// Key polymorphic projections tag each node with.
const RESOLVE_TYPE: &str = "__resolveType";

pub(crate) fn shape(
    schema: &Schema,
    config: &Config,
    request: &Request,
    response: &Response,
) -> Result<Value> {
    let entity = schema.expect_entity(&request.entity)?;
    let shaper = Shaper { schema };
    let tree = &request.tree;

    let value = match request.operation {
        Operation::Read => Value::List(
            response
                .records
                .iter()
                .filter_map(first_column)
                .map(|node| shaper.node(entity, node, tree))
                .collect::<Result<_>>()?,
        ),
        Operation::Aggregate => response
            .records
            .first()
            .and_then(first_column)
            .cloned()
            .unwrap_or_default(),
        Operation::Connection => {
            let connection = response.records.first().and_then(first_column);
            shaper.connection(Some(entity), connection, tree, config.limit)?
        }
        Operation::Create | Operation::Update => {
            let mut nodes = vec![];
            for record in &response.records {
                match first_column(record) {
                    Some(Value::List(written)) => {
                        for node in written {
                            nodes.push(shaper.node(entity, node, tree_root(tree, entity))?);
                        }
                    }
                    Some(node @ Value::Map(_)) => {
                        nodes.push(shaper.node(entity, node, tree_root(tree, entity))?)
                    }
                    _ => {}
                }
            }
            mutation_payload(entity, tree, Value::List(nodes), response)
        }
        Operation::Delete => select(&info(response), Some(tree)),
    };

    Ok(value)
}

struct Shaper<'a> {
    schema: &'a Schema,
}

impl<'a> Shaper<'a> {
    /// One projected node. Null stays null.
    fn node(&self, entity: &'a Entity, value: &Value, tree: &ResolveTree) -> Result<Value> {
        let Some(map) = value.as_map() else {
            return Ok(value.clone());
        };

        let entity = map
            .get(RESOLVE_TYPE)
            .and_then(Value::as_str)
            .and_then(|name| self.schema.entity(name))
            .unwrap_or(entity);

        let mut shaped = IndexMap::new();
        for (key, field) in tree.fields_for(&selection_types(entity)) {
            let raw = map.get(key).cloned().unwrap_or_default();
            let name = field.name.as_str();

            let value = if name == "__typename" {
                Value::from(entity.name.as_str())
            } else if entity.is_global_id_key(name) {
                match raw {
                    Value::Null => Value::Null,
                    raw => entity.to_global_id(&raw).map(Value::from).unwrap_or(raw),
                }
            } else if let Some(schema_field) = entity.find_field(name) {
                match self.schema.target(schema_field) {
                    Some(target) => {
                        let many = schema_field
                            .as_relationship()
                            .is_some_and(Relationship::is_many);
                        self.related(target, &raw, field, many)?
                    }
                    None => raw,
                }
            } else if let Some(target) = name
                .strip_suffix("Connection")
                .and_then(|name| entity.find_field(name))
                .and_then(|field| self.schema.target(field))
            {
                let target = match target {
                    Target::Entity(target) => Some(target),
                    _ => None,
                };
                self.connection(target, Some(&raw), field, None)?
            } else {
                raw
            };

            shaped.insert(key.to_string(), value);
        }

        Ok(Value::Map(shaped))
    }

    /// The value of a relationship field: a list for to-many, a node or
    /// null for to-one.
    fn related(
        &self,
        target: Target<'a>,
        value: &Value,
        tree: &ResolveTree,
        many: bool,
    ) -> Result<Value> {
        match value {
            Value::Null if many => Ok(Value::List(vec![])),
            Value::List(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| self.related_node(target, item, tree))
                    .collect::<Result<_>>()?,
            )),
            item => self.related_node(target, item, tree),
        }
    }

    fn related_node(&self, target: Target<'a>, item: &Value, tree: &ResolveTree) -> Result<Value> {
        let entity = match target {
            Target::Entity(entity) => Some(entity),
            _ => item
                .get(RESOLVE_TYPE)
                .and_then(Value::as_str)
                .and_then(|name| self.schema.entity(name)),
        };

        match entity {
            Some(entity) => self.node(entity, item, tree),
            None => Ok(item.clone()),
        }
    }

    /// `{ edges { cursor node properties } totalCount pageInfo }`
    fn connection(
        &self,
        target: Option<&'a Entity>,
        value: Option<&Value>,
        tree: &ResolveTree,
        limit: Option<QueryLimit>,
    ) -> Result<Value> {
        let (offset, _) = page(tree, limit)?;
        let empty = vec![];
        let edges = value
            .and_then(|value| value.get("edges"))
            .and_then(Value::as_list)
            .unwrap_or(&empty);
        let total = value
            .and_then(|value| value.get("totalCount"))
            .and_then(Value::as_i64)
            .unwrap_or_default();

        let cursors: Vec<String> = (0..edges.len() as i64)
            .map(|index| cursor::encode(offset.saturating_add(index)))
            .collect();

        let mut shaped = IndexMap::new();
        for field in tree.all_fields() {
            let value = match field.name.as_str() {
                "edges" => {
                    let mut shaped_edges = vec![];
                    for (edge, cursor) in edges.iter().zip(&cursors) {
                        shaped_edges.push(self.edge(target, edge, cursor, field)?);
                    }
                    Value::List(shaped_edges)
                }
                "totalCount" => Value::Int(total),
                "pageInfo" => {
                    let info = Value::map_from_iter([
                        ("hasNextPage", Value::from(offset.saturating_add(edges.len() as i64) < total)),
                        ("hasPreviousPage", Value::from(offset > 0)),
                        ("startCursor", Value::from(cursors.first().cloned())),
                        ("endCursor", Value::from(cursors.last().cloned())),
                    ]);
                    select(&info, Some(field))
                }
                _ => Value::Null,
            };
            shaped.insert(field.response_key().to_string(), value);
        }

        Ok(Value::Map(shaped))
    }

    fn edge(
        &self,
        target: Option<&'a Entity>,
        edge: &Value,
        cursor: &str,
        tree: &ResolveTree,
    ) -> Result<Value> {
        let mut shaped = IndexMap::new();
        for field in tree.all_fields() {
            let raw = edge.get(&field.name).cloned().unwrap_or_default();
            let value = match (field.name.as_str(), target) {
                ("cursor", _) => Value::from(cursor),
                ("node", Some(target)) => self.node(target, &raw, field)?,
                ("properties", _) => select(&raw, Some(field)),
                _ => raw,
            };
            shaped.insert(field.response_key().to_string(), value);
        }
        Ok(Value::Map(shaped))
    }
}

/// `createPosts { posts { .. } info { .. } }`
fn mutation_payload(entity: &Entity, tree: &ResolveTree, nodes: Value, response: &Response) -> Value {
    let root = entity.root_field();
    let mut payload = IndexMap::new();

    for field in tree.all_fields() {
        let value = if field.name == root {
            nodes.clone()
        } else if field.name == "info" {
            select(&info(response), Some(field))
        } else {
            Value::Null
        };
        payload.insert(field.response_key().to_string(), value);
    }

    Value::Map(payload)
}

/// Counters reported for a mutation, with the transaction's bookmark.
fn info(response: &Response) -> Value {
    let counters = &response.summary.counters;
    let count = |n: u64| Value::Int(i64::try_from(n).unwrap_or(i64::MAX));

    Value::map_from_iter([
        ("nodesCreated", count(counters.nodes_created)),
        ("nodesDeleted", count(counters.nodes_deleted)),
        ("relationshipsCreated", count(counters.relationships_created)),
        ("relationshipsDeleted", count(counters.relationships_deleted)),
        ("bookmark", Value::from(response.summary.bookmark.clone())),
    ])
}

/// Keeps the selected keys of a plain map, renamed to their response keys.
/// Without a selection the map is returned whole.
fn select(value: &Value, tree: Option<&ResolveTree>) -> Value {
    let Some(map) = value.as_map() else {
        return value.clone();
    };
    let Some(tree) = tree.filter(|tree| tree.all_fields().next().is_some()) else {
        return value.clone();
    };

    Value::Map(
        tree.all_fields()
            .map(|field| {
                let value = map.get(&field.name).cloned().unwrap_or_default();
                (field.response_key().to_string(), value)
            })
            .collect(),
    )
}

/// The selection under the payload key naming the written nodes.
fn tree_root<'t>(tree: &'t ResolveTree, entity: &Entity) -> &'t ResolveTree {
    let root = entity.root_field();
    tree.all_fields()
        .find(|field| field.name == root)
        .unwrap_or(tree)
}

fn first_column(record: &Record) -> Option<&Value> {
    record.values().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlcypher_core::driver::{Counters, Summary};
    use pretty_assertions::assert_eq;

    #[test]
    fn select_renames_to_response_keys() {
        let info = Value::map_from_iter([("nodesCreated", 2), ("nodesDeleted", 0)]);
        let tree = ResolveTree::new("info")
            .field("CreateInfo", ResolveTree::new("nodesCreated").alias("created"));

        assert_eq!(
            select(&info, Some(&tree)),
            Value::map_from_iter([("created", 2)])
        );
        assert_eq!(select(&info, None), info);
    }

    #[test]
    fn info_reports_counters_and_bookmark() {
        let response = Response {
            records: vec![],
            summary: Summary {
                counters: Counters {
                    nodes_deleted: 3,
                    relationships_deleted: 4,
                    ..Counters::default()
                },
                bookmark: Some("bm:1".to_string()),
            },
        };

        let info = info(&response);
        assert_eq!(info.get("nodesDeleted"), Some(&Value::Int(3)));
        assert_eq!(info.get("relationshipsDeleted"), Some(&Value::Int(4)));
        assert_eq!(info.get("bookmark"), Some(&Value::from("bm:1")));
    }
}
