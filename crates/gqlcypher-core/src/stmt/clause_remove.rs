use super::{Clause, Expr};

/// `REMOVE a.b, ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Remove {
    pub items: Vec<Expr>,
}

impl From<Remove> for Clause {
    fn from(value: Remove) -> Self {
        Clause::Remove(value)
    }
}
