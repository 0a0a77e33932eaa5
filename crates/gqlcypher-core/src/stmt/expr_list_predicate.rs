use super::{Expr, Variable};

use std::fmt;

/// `quantifier(variable IN list WHERE predicate)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprListPredicate {
    pub quantifier: Quantifier,
    pub variable: Variable,
    pub list: Box<Expr>,
    pub predicate: Box<Expr>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
    None,
    Single,
}

impl Expr {
    pub fn list_predicate(
        quantifier: Quantifier,
        variable: &Variable,
        list: impl Into<Self>,
        predicate: impl Into<Self>,
    ) -> Self {
        ExprListPredicate {
            quantifier,
            variable: variable.clone(),
            list: Box::new(list.into()),
            predicate: Box::new(predicate.into()),
        }
        .into()
    }

    pub fn any(variable: &Variable, list: impl Into<Self>, predicate: impl Into<Self>) -> Self {
        Expr::list_predicate(Quantifier::Any, variable, list, predicate)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quantifier::Any => "any",
            Quantifier::All => "all",
            Quantifier::None => "none",
            Quantifier::Single => "single",
        })
    }
}

impl From<ExprListPredicate> for Expr {
    fn from(value: ExprListPredicate) -> Self {
        Self::ListPredicate(value)
    }
}
