mod cypher;
pub use cypher::FieldCypher;

mod point;
pub use point::FieldPoint;

mod primitive;
pub use primitive::{FieldPrimitive, Scalar};

mod temporal;
pub use temporal::{FieldTemporal, TemporalKind, Timestamp};

use super::{AuthorizationRule, Cardinality, Relationship};
use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name as exposed to clients
    pub name: String,

    /// Property name in the database, when it differs from `name`
    pub db_name: Option<String>,

    /// Primitive, relationship, computed, ...
    pub ty: FieldTy,

    /// True if the field must always have a value
    pub required: bool,

    /// True if no two nodes of the entity share a value for this field
    pub unique: bool,

    pub selectable: bool,
    pub settable: bool,
    pub filterable: bool,

    /// Field-level authorization rules
    pub rules: Vec<AuthorizationRule>,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(FieldPrimitive),
    Temporal(FieldTemporal),
    Point(FieldPoint),

    /// Computed by a user-supplied statement
    Cypher(FieldCypher),

    /// Relationship to a single entity type
    Relationship(Relationship),

    /// Relationship to any implementation of an interface
    Interface(Relationship),

    /// Relationship to any member of a union
    Union(Relationship),
}

impl Field {
    fn new(name: impl Into<String>, ty: FieldTy) -> Field {
        Field {
            name: name.into(),
            db_name: None,
            ty,
            required: false,
            unique: false,
            selectable: true,
            settable: true,
            filterable: true,
            rules: vec![],
        }
    }

    pub fn primitive(name: impl Into<String>, scalar: Scalar) -> Field {
        Field::new(name, FieldTy::Primitive(FieldPrimitive::new(scalar)))
    }

    pub fn temporal(name: impl Into<String>, kind: TemporalKind) -> Field {
        Field::new(name, FieldTy::Temporal(FieldTemporal::new(kind)))
    }

    pub fn point(name: impl Into<String>) -> Field {
        Field::new(name, FieldTy::Point(FieldPoint::default()))
    }

    pub fn cypher(
        name: impl Into<String>,
        statement: impl Into<String>,
        column: impl Into<String>,
        scalar: Scalar,
    ) -> Field {
        let mut field = Field::new(name, FieldTy::Cypher(FieldCypher::new(statement, column, scalar)));
        field.settable = false;
        field.filterable = false;
        field
    }

    pub fn relationship(name: impl Into<String>, relationship: Relationship) -> Field {
        Field::with_relationship(name, relationship, FieldTy::Relationship)
    }

    pub fn interface(name: impl Into<String>, relationship: Relationship) -> Field {
        Field::with_relationship(name, relationship, FieldTy::Interface)
    }

    pub fn union(name: impl Into<String>, relationship: Relationship) -> Field {
        Field::with_relationship(name, relationship, FieldTy::Union)
    }

    fn with_relationship(
        name: impl Into<String>,
        relationship: Relationship,
        ty: fn(Relationship) -> FieldTy,
    ) -> Field {
        let required = matches!(relationship.cardinality, Cardinality::One { required: true });
        let mut field = Field::new(name, ty(relationship));
        field.required = required;
        field
    }

    pub fn db_name(mut self, db_name: impl Into<String>) -> Field {
        self.db_name = Some(db_name.into());
        self
    }

    pub fn required(mut self) -> Field {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Field {
        self.unique = true;
        self
    }

    /// Marks a primitive, temporal, point or computed field as list-valued.
    pub fn list(mut self) -> Field {
        match &mut self.ty {
            FieldTy::Primitive(primitive) => primitive.list = true,
            FieldTy::Temporal(temporal) => temporal.list = true,
            FieldTy::Point(point) => point.list = true,
            FieldTy::Cypher(cypher) => cypher.list = true,
            _ => {}
        }
        self
    }

    /// Populates the field with `randomUUID()` on create. Autogenerated
    /// fields cannot be set by clients.
    pub fn autogenerate(mut self) -> Field {
        if let FieldTy::Primitive(primitive) = &mut self.ty {
            primitive.autogenerate = true;
        }
        self.settable = false;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Field {
        if let FieldTy::Primitive(primitive) = &mut self.ty {
            primitive.default = Some(value.into());
        }
        self
    }

    /// Sets the field to the current time on the given operations.
    pub fn timestamps(mut self, timestamps: impl IntoIterator<Item = Timestamp>) -> Field {
        if let FieldTy::Temporal(temporal) = &mut self.ty {
            temporal.timestamps.extend(timestamps);
        }
        self.settable = false;
        self
    }

    /// Marks a point field as cartesian.
    pub fn cartesian(mut self) -> Field {
        if let FieldTy::Point(point) = &mut self.ty {
            point.cartesian = true;
        }
        self
    }

    pub fn not_selectable(mut self) -> Field {
        self.selectable = false;
        self
    }

    pub fn not_settable(mut self) -> Field {
        self.settable = false;
        self
    }

    pub fn not_filterable(mut self) -> Field {
        self.filterable = false;
        self
    }

    pub fn rule(mut self, rule: AuthorizationRule) -> Field {
        self.rules.push(rule);
        self
    }

    /// Name of the property backing this field.
    pub fn property_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_list(&self) -> bool {
        match &self.ty {
            FieldTy::Primitive(primitive) => primitive.list,
            FieldTy::Temporal(temporal) => temporal.list,
            FieldTy::Point(point) => point.list,
            FieldTy::Cypher(cypher) => cypher.list,
            FieldTy::Relationship(rel) | FieldTy::Interface(rel) | FieldTy::Union(rel) => {
                rel.is_many()
            }
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match &self.ty {
            FieldTy::Relationship(rel) | FieldTy::Interface(rel) | FieldTy::Union(rel) => Some(rel),
            _ => None,
        }
    }

    pub fn is_relationship(&self) -> bool {
        self.as_relationship().is_some()
    }

    /// True for fields stored as a node property.
    pub fn is_stored(&self) -> bool {
        matches!(
            self.ty,
            FieldTy::Primitive(_) | FieldTy::Temporal(_) | FieldTy::Point(_)
        )
    }

    /// True for single-valued fields that can be used as sort keys.
    pub fn is_sortable(&self) -> bool {
        !self.is_list()
            && matches!(
                self.ty,
                FieldTy::Primitive(_) | FieldTy::Temporal(_) | FieldTy::Cypher(_)
            )
    }

    /// Parses the value part of a decoded global id according to the field
    /// type. Integer fields get integers, everything else stays a string.
    pub(crate) fn parse_global_id_value(&self, raw: String) -> Value {
        match &self.ty {
            FieldTy::Primitive(FieldPrimitive {
                scalar: Scalar::Int | Scalar::BigInt,
                ..
            }) => raw.parse::<i64>().map(Value::Int).unwrap_or(Value::String(raw)),
            _ => Value::String(raw),
        }
    }
}
