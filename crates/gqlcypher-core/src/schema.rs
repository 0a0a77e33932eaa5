mod auth;
pub use auth::{AuthorizationRule, Operation, RuleCondition, RuleKind, When};

mod builder;
pub use builder::Builder;

mod entity;
pub use entity::{Entity, Label};

mod field;
pub use field::{
    Field, FieldCypher, FieldPoint, FieldPrimitive, FieldTemporal, FieldTy, Scalar, TemporalKind,
    Timestamp,
};

pub mod global_id;

mod interface;
pub use interface::Interface;

mod relationship;
pub use relationship::{Cardinality, NestedOperation, Relationship, RelationshipDirection};

mod relationship_properties;
pub use relationship_properties::RelationshipProperties;

mod union;
pub use union::Union;

use crate::{Error, Result};
use indexmap::IndexMap;

/// The type model requests are compiled against.
///
/// A schema is immutable once built and is shared by every request the
/// compiler handles.
#[derive(Debug, Default)]
pub struct Schema {
    pub entities: IndexMap<String, Entity>,
    pub interfaces: IndexMap<String, Interface>,
    pub unions: IndexMap<String, Union>,
    pub relationship_properties: IndexMap<String, RelationshipProperties>,
}

/// A relationship target resolved against the schema.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Entity(&'a Entity),
    Interface(&'a Interface),
    Union(&'a Union),
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Like [`Schema::entity`] but reports an unknown name as an invalid
    /// request.
    pub fn expect_entity(&self, name: &str) -> Result<&Entity> {
        self.entity(name)
            .ok_or_else(|| Error::invalid_request(format!("unknown entity `{name}`")))
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    pub fn union(&self, name: &str) -> Option<&Union> {
        self.unions.get(name)
    }

    pub fn relationship_properties(&self, name: &str) -> Option<&RelationshipProperties> {
        self.relationship_properties.get(name)
    }

    /// Resolves the target of a relationship-valued field.
    pub fn target(&self, field: &Field) -> Option<Target<'_>> {
        match &field.ty {
            FieldTy::Relationship(rel) => self.entity(&rel.target).map(Target::Entity),
            FieldTy::Interface(rel) => self.interface(&rel.target).map(Target::Interface),
            FieldTy::Union(rel) => self.union(&rel.target).map(Target::Union),
            _ => None,
        }
    }

    /// The concrete entities a relationship-valued field can reach, in
    /// declaration order.
    pub fn concrete_targets(&self, field: &Field) -> Vec<&Entity> {
        match self.target(field) {
            Some(Target::Entity(entity)) => vec![entity],
            Some(Target::Interface(interface)) => interface
                .implementations
                .iter()
                .filter_map(|name| self.entity(name))
                .collect(),
            Some(Target::Union(union)) => union
                .members
                .iter()
                .filter_map(|name| self.entity(name))
                .collect(),
            None => vec![],
        }
    }

    /// Finds the entity whose root query field is `root_field`, e.g. `posts`
    /// for `Post`.
    pub fn entity_by_root_field(&self, root_field: &str) -> Option<&Entity> {
        self.entities().find(|entity| entity.root_field() == root_field)
    }
}

impl<'a> Target<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Target::Entity(entity) => &entity.name,
            Target::Interface(interface) => &interface.name,
            Target::Union(union) => &union.name,
        }
    }
}
