use super::{Clause, Expr, Variable};

/// `UNWIND expr AS alias`
#[derive(Debug, Clone, PartialEq)]
pub struct Unwind {
    pub expr: Expr,
    pub alias: Variable,
}

impl From<Unwind> for Clause {
    fn from(value: Unwind) -> Self {
        Clause::Unwind(value)
    }
}
