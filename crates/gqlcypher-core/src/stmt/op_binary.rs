use std::fmt;

#[derive(Copy, Clone, PartialEq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    In,
    Add,
    Sub,
}

impl BinaryOp {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::Eq)
    }

    /// Returns `true` for operators that produce a boolean.
    pub fn is_comparison(self) -> bool {
        !matches!(self, Self::Add | Self::Sub)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        match self {
            Eq => "=".fmt(f),
            Ne => "<>".fmt(f),
            Ge => ">=".fmt(f),
            Gt => ">".fmt(f),
            Le => "<=".fmt(f),
            Lt => "<".fmt(f),
            Contains => "CONTAINS".fmt(f),
            StartsWith => "STARTS WITH".fmt(f),
            EndsWith => "ENDS WITH".fmt(f),
            Matches => "=~".fmt(f),
            In => "IN".fmt(f),
            Add => "+".fmt(f),
            Sub => "-".fmt(f),
        }
    }
}

impl fmt::Debug for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
