use super::{Expr, Variable};

/// `reduce(accumulator = init, variable IN list | expr)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprReduce {
    pub accumulator: Variable,
    pub init: Box<Expr>,
    pub variable: Variable,
    pub list: Box<Expr>,
    pub expr: Box<Expr>,
}

impl From<ExprReduce> for Expr {
    fn from(value: ExprReduce) -> Self {
        Self::Reduce(value)
    }
}
