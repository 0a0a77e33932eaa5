use super::Scalar;

/// A field computed by running a user-supplied statement with the parent
/// node bound as `this`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCypher {
    pub statement: String,

    /// Column of the statement's `RETURN` holding the value
    pub column: String,

    pub scalar: Scalar,
    pub list: bool,
}

impl FieldCypher {
    pub fn new(statement: impl Into<String>, column: impl Into<String>, scalar: Scalar) -> FieldCypher {
        FieldCypher {
            statement: statement.into(),
            column: column.into(),
            scalar,
            list: false,
        }
    }
}
