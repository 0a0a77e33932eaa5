use super::{Clause, Statement};

/// Branches joined with `UNION` (or `UNION ALL`). Every branch must return
/// the same columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub all: bool,
    pub branches: Vec<Statement>,
}

impl From<Union> for Clause {
    fn from(value: Union) -> Self {
        Clause::Union(value)
    }
}
