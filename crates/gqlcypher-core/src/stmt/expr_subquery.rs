use super::{Expr, Statement};

/// `EXISTS { <statement> }`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprExists {
    pub subquery: Box<Statement>,
}

/// `COUNT { <statement> }`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCount {
    pub subquery: Box<Statement>,
}

impl Expr {
    pub fn exists(subquery: impl Into<Statement>) -> Self {
        ExprExists {
            subquery: Box::new(subquery.into()),
        }
        .into()
    }

    pub fn count_subquery(subquery: impl Into<Statement>) -> Self {
        ExprCount {
            subquery: Box::new(subquery.into()),
        }
        .into()
    }
}

impl From<ExprExists> for Expr {
    fn from(value: ExprExists) -> Self {
        Self::Exists(value)
    }
}

impl From<ExprCount> for Expr {
    fn from(value: ExprCount) -> Self {
        Self::Count(value)
    }
}
