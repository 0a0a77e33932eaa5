use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprXor {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn xor(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Self::Xor(lhs_xor), rhs) => {
                lhs_xor.operands.push(rhs);
                lhs
            }
            (_, rhs) => ExprXor {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }
}

impl From<ExprXor> for Expr {
    fn from(value: ExprXor) -> Self {
        Self::Xor(value)
    }
}
