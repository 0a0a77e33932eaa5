use super::{Clause, Expr};

/// `SET target = value, ..`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Set {
    pub items: Vec<SetItem>,
}

/// A single assignment, `target = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetItem {
    pub target: Expr,
    pub value: Expr,
}

impl Set {
    pub fn new(items: impl IntoIterator<Item = SetItem>) -> Set {
        Set {
            items: items.into_iter().collect(),
        }
    }
}

impl SetItem {
    pub fn new(target: impl Into<Expr>, value: impl Into<Expr>) -> SetItem {
        SetItem {
            target: target.into(),
            value: value.into(),
        }
    }
}

impl From<Set> for Clause {
    fn from(value: Set) -> Self {
        Clause::Set(value)
    }
}
