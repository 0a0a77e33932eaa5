use crate::stmt::Direction;

/// How a relationship-valued field is stored in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Relationship type in the database, e.g. `ACTED_IN`
    pub rel_type: String,

    pub direction: RelationshipDirection,

    /// Name of the target entity, interface or union
    pub target: String,

    pub cardinality: Cardinality,

    /// Name of the relationship-properties type describing edge fields
    pub properties: Option<String>,

    /// Nested mutation operations clients may use on this field
    pub nested_operations: Vec<NestedOperation>,

    /// Whether `<field>Aggregate` is available
    pub aggregate: bool,
}

/// Direction from the owning entity's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipDirection {
    Out,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One { required: bool },
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedOperation {
    Create,
    Connect,
    Disconnect,
    Update,
    Delete,
    ConnectOrCreate,
}

impl Relationship {
    pub fn new(
        rel_type: impl Into<String>,
        direction: RelationshipDirection,
        target: impl Into<String>,
    ) -> Relationship {
        Relationship {
            rel_type: rel_type.into(),
            direction,
            target: target.into(),
            cardinality: Cardinality::Many,
            properties: None,
            nested_operations: NestedOperation::ALL.to_vec(),
            aggregate: true,
        }
    }

    pub fn outgoing(rel_type: impl Into<String>, target: impl Into<String>) -> Relationship {
        Relationship::new(rel_type, RelationshipDirection::Out, target)
    }

    pub fn incoming(rel_type: impl Into<String>, target: impl Into<String>) -> Relationship {
        Relationship::new(rel_type, RelationshipDirection::In, target)
    }

    /// To-one, optional.
    pub fn one(mut self) -> Relationship {
        self.cardinality = Cardinality::One { required: false };
        self
    }

    /// To-one, exactly one related node must exist.
    pub fn required_one(mut self) -> Relationship {
        self.cardinality = Cardinality::One { required: true };
        self
    }

    pub fn properties(mut self, properties: impl Into<String>) -> Relationship {
        self.properties = Some(properties.into());
        self
    }

    pub fn nested_operations(
        mut self,
        operations: impl IntoIterator<Item = NestedOperation>,
    ) -> Relationship {
        self.nested_operations = operations.into_iter().collect();
        self
    }

    pub fn without_aggregate(mut self) -> Relationship {
        self.aggregate = false;
        self
    }

    pub fn is_many(&self) -> bool {
        matches!(self.cardinality, Cardinality::Many)
    }

    pub fn is_required(&self) -> bool {
        matches!(self.cardinality, Cardinality::One { required: true })
    }

    pub fn allows(&self, operation: NestedOperation) -> bool {
        self.nested_operations.contains(&operation)
    }

    /// Arrow direction when the owning node is written on the left.
    pub fn pattern_direction(&self) -> Direction {
        match self.direction {
            RelationshipDirection::Out => Direction::Outgoing,
            RelationshipDirection::In => Direction::Incoming,
        }
    }
}

impl NestedOperation {
    pub const ALL: [NestedOperation; 6] = [
        NestedOperation::Create,
        NestedOperation::Connect,
        NestedOperation::Disconnect,
        NestedOperation::Update,
        NestedOperation::Delete,
        NestedOperation::ConnectOrCreate,
    ];

    /// The input key selecting this operation.
    pub fn input_key(self) -> &'static str {
        match self {
            NestedOperation::Create => "create",
            NestedOperation::Connect => "connect",
            NestedOperation::Disconnect => "disconnect",
            NestedOperation::Update => "update",
            NestedOperation::Delete => "delete",
            NestedOperation::ConnectOrCreate => "connectOrCreate",
        }
    }
}
