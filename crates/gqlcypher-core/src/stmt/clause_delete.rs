use super::{Clause, Expr};

/// `[DETACH] DELETE a, ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub detach: bool,
    pub items: Vec<Expr>,
}

impl Delete {
    pub fn detach(item: impl Into<Expr>) -> Delete {
        Delete {
            detach: true,
            items: vec![item.into()],
        }
    }

    pub fn new(item: impl Into<Expr>) -> Delete {
        Delete {
            detach: false,
            items: vec![item.into()],
        }
    }
}

impl From<Delete> for Clause {
    fn from(value: Delete) -> Self {
        Clause::Delete(value)
    }
}
