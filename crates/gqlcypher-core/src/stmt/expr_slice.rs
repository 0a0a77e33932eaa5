use super::Expr;

/// `list[from..to]`; either bound may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSlice {
    pub list: Box<Expr>,
    pub from: Option<Box<Expr>>,
    pub to: Option<Box<Expr>>,
}

impl Expr {
    pub fn slice(list: impl Into<Self>, from: Option<Expr>, to: Option<Expr>) -> Self {
        ExprSlice {
            list: Box::new(list.into()),
            from: from.map(Box::new),
            to: to.map(Box::new),
        }
        .into()
    }
}

impl From<ExprSlice> for Expr {
    fn from(value: ExprSlice) -> Self {
        Self::Slice(value)
    }
}
