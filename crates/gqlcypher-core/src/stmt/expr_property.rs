use super::Expr;

/// `base.name`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprProperty {
    pub base: Box<Expr>,
    pub name: String,
}

impl Expr {
    pub fn property(base: impl Into<Self>, name: impl Into<String>) -> Self {
        ExprProperty {
            base: Box::new(base.into()),
            name: name.into(),
        }
        .into()
    }

    /// Follows a dotted path, `base.a.b`.
    pub fn property_path(base: impl Into<Self>, path: &str) -> Self {
        path.split('.')
            .fold(base.into(), |expr, segment| Expr::property(expr, segment))
    }
}

impl From<ExprProperty> for Expr {
    fn from(value: ExprProperty) -> Self {
        Self::Property(value)
    }
}
