use super::{Entity, Field, FieldTy, Interface, RelationshipProperties, Schema, Union};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// Collects type definitions and verifies them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    entities: Vec<Entity>,
    interfaces: Vec<Interface>,
    unions: Vec<Union>,
    relationship_properties: Vec<RelationshipProperties>,
}

impl Builder {
    pub fn entity(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn interface(&mut self, interface: Interface) -> &mut Self {
        self.interfaces.push(interface);
        self
    }

    pub fn union(&mut self, union: Union) -> &mut Self {
        self.unions.push(union);
        self
    }

    pub fn relationship_properties(&mut self, properties: RelationshipProperties) -> &mut Self {
        self.relationship_properties.push(properties);
        self
    }

    pub fn build(&mut self) -> Result<Schema> {
        let mut schema = Schema::default();
        let mut names = HashSet::new();

        for entity in std::mem::take(&mut self.entities) {
            claim_name(&mut names, &entity.name)?;
            schema.entities.insert(entity.name.clone(), entity);
        }

        for interface in std::mem::take(&mut self.interfaces) {
            claim_name(&mut names, &interface.name)?;
            schema.interfaces.insert(interface.name.clone(), interface);
        }

        for union in std::mem::take(&mut self.unions) {
            claim_name(&mut names, &union.name)?;
            schema.unions.insert(union.name.clone(), union);
        }

        for properties in std::mem::take(&mut self.relationship_properties) {
            claim_name(&mut names, &properties.name)?;
            schema
                .relationship_properties
                .insert(properties.name.clone(), properties);
        }

        link_implementations(&mut schema)?;
        verify(&schema)?;

        tracing::debug!(
            entities = schema.entities.len(),
            interfaces = schema.interfaces.len(),
            unions = schema.unions.len(),
            "schema built"
        );

        Ok(schema)
    }
}

fn claim_name(names: &mut HashSet<String>, name: &str) -> Result<()> {
    if !names.insert(name.to_string()) {
        return Err(Error::invalid_schema(format!(
            "type name `{name}` is defined more than once"
        )));
    }
    Ok(())
}

/// Fills in each interface's implementation list, in entity declaration
/// order.
fn link_implementations(schema: &mut Schema) -> Result<()> {
    let mut implementations: IndexMap<String, Vec<String>> = IndexMap::new();

    for entity in schema.entities.values() {
        for interface in &entity.interfaces {
            if !schema.interfaces.contains_key(interface) {
                return Err(Error::invalid_schema(format!(
                    "`{}` implements unknown interface `{interface}`",
                    entity.name
                )));
            }
            implementations
                .entry(interface.clone())
                .or_default()
                .push(entity.name.clone());
        }
    }

    for (name, interface) in &mut schema.interfaces {
        interface.implementations = implementations.shift_remove(name).unwrap_or_default();
    }

    Ok(())
}

fn verify(schema: &Schema) -> Result<()> {
    for entity in schema.entities() {
        verify_fields(schema, &entity.name, &entity.fields)?;

        for rule in &entity.rules {
            rule.verify(&entity.name)?;
        }

        if let Some(field) = &entity.global_id {
            match entity.find_field(field) {
                Some(field) if field.is_stored() && field.unique => {}
                _ => {
                    return Err(Error::invalid_schema(format!(
                        "global id field `{}.{field}` must be a unique stored field",
                        entity.name
                    )))
                }
            }
        }

        for interface in &entity.interfaces {
            let Some(interface) = schema.interface(interface) else {
                continue;
            };
            for field in &interface.fields {
                if entity.find_field(&field.name).is_none() {
                    return Err(Error::invalid_schema(format!(
                        "`{}` implements `{}` but does not declare field `{}`",
                        entity.name, interface.name, field.name
                    )));
                }
            }
        }
    }

    for interface in schema.interfaces.values() {
        if interface.implementations.is_empty() {
            return Err(Error::invalid_schema(format!(
                "interface `{}` has no implementations",
                interface.name
            )));
        }
        verify_fields(schema, &interface.name, &interface.fields)?;
    }

    for union in schema.unions.values() {
        if union.members.is_empty() {
            return Err(Error::invalid_schema(format!(
                "union `{}` has no members",
                union.name
            )));
        }
        for member in &union.members {
            if schema.entity(member).is_none() {
                return Err(Error::invalid_schema(format!(
                    "union `{}` has unknown member `{member}`",
                    union.name
                )));
            }
        }
    }

    for properties in schema.relationship_properties.values() {
        verify_fields(schema, &properties.name, &properties.fields)?;
        if let Some(field) = properties.fields.iter().find(|field| !field.is_stored()) {
            return Err(Error::invalid_schema(format!(
                "relationship property `{}.{}` must be a stored field",
                properties.name, field.name
            )));
        }
    }

    Ok(())
}

fn verify_fields(schema: &Schema, owner: &str, fields: &[Field]) -> Result<()> {
    let mut seen = HashSet::new();

    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(Error::invalid_schema(format!(
                "field `{owner}.{}` is declared more than once",
                field.name
            )));
        }

        let qualified = format!("{owner}.{}", field.name);
        for rule in &field.rules {
            rule.verify(&qualified)?;
        }

        let (rel, found) = match &field.ty {
            FieldTy::Relationship(rel) => (rel, schema.entity(&rel.target).is_some()),
            FieldTy::Interface(rel) => (rel, schema.interface(&rel.target).is_some()),
            FieldTy::Union(rel) => (rel, schema.union(&rel.target).is_some()),
            _ => continue,
        };

        if !found {
            return Err(Error::invalid_schema(format!(
                "relationship `{qualified}` targets unknown type `{}`",
                rel.target
            )));
        }

        if let Some(properties) = &rel.properties {
            if schema.relationship_properties(properties).is_none() {
                return Err(Error::invalid_schema(format!(
                    "relationship `{qualified}` uses unknown properties type `{properties}`"
                )));
            }
        }
    }

    Ok(())
}
