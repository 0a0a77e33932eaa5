use super::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprNot {
    pub expr: Box<Expr>,
}

impl Expr {
    /// Negates `expr`. Negating a negation unwraps it.
    pub fn not(expr: impl Into<Self>) -> Self {
        match expr.into() {
            Self::Not(not) => *not.expr,
            expr => ExprNot {
                expr: Box::new(expr),
            }
            .into(),
        }
    }
}

impl From<ExprNot> for Expr {
    fn from(value: ExprNot) -> Self {
        Self::Not(value)
    }
}
