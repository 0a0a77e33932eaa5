use crate::stmt::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPrimitive {
    pub scalar: Scalar,

    pub list: bool,

    /// Filled with `randomUUID()` on create
    pub autogenerate: bool,

    /// Value written on create when the input omits the field
    pub default: Option<Value>,
}

/// Scalar types a primitive field can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    ID,
    String,
    Int,
    Float,
    Boolean,
    BigInt,

    /// Named enumeration, stored as its string value
    Enum(String),
}

impl FieldPrimitive {
    pub fn new(scalar: Scalar) -> FieldPrimitive {
        FieldPrimitive {
            scalar,
            list: false,
            autogenerate: false,
            default: None,
        }
    }
}

impl Scalar {
    /// True for scalars that support `MIN`/`MAX`/`AVERAGE`/`SUM`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int | Scalar::Float | Scalar::BigInt)
    }

    /// True for scalars that support the string comparison operators.
    pub fn is_string_like(&self) -> bool {
        matches!(self, Scalar::ID | Scalar::String)
    }

    pub fn name(&self) -> &str {
        match self {
            Scalar::ID => "ID",
            Scalar::String => "String",
            Scalar::Int => "Int",
            Scalar::Float => "Float",
            Scalar::Boolean => "Boolean",
            Scalar::BigInt => "BigInt",
            Scalar::Enum(name) => name,
        }
    }
}
