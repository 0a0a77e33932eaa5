use super::{Expr, Variable};

/// `var:Label` as a predicate
#[derive(Debug, Clone, PartialEq)]
pub struct ExprHasLabels {
    pub variable: Variable,
    pub labels: Vec<String>,
}

impl Expr {
    pub fn has_labels(variable: &Variable, labels: impl IntoIterator<Item = String>) -> Self {
        ExprHasLabels {
            variable: variable.clone(),
            labels: labels.into_iter().collect(),
        }
        .into()
    }
}

impl From<ExprHasLabels> for Expr {
    fn from(value: ExprHasLabels) -> Self {
        Self::HasLabels(value)
    }
}
