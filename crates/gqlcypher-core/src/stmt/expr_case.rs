use super::Expr;

/// Searched `CASE` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCase {
    pub when: Vec<(Expr, Expr)>,
    pub otherwise: Option<Box<Expr>>,
}

impl Expr {
    pub fn case(when: Vec<(Expr, Expr)>, otherwise: Option<Expr>) -> Self {
        ExprCase {
            when,
            otherwise: otherwise.map(Box::new),
        }
        .into()
    }
}

impl From<ExprCase> for Expr {
    fn from(value: ExprCase) -> Self {
        Self::Case(value)
    }
}
