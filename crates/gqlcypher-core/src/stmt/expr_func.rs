use super::Expr;

/// A function call such as `count(DISTINCT x)` or
/// `apoc.util.validatePredicate(..)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    /// Function name, possibly namespaced
    pub name: String,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args: args.into_iter().collect(),
            distinct: false,
        }
        .into()
    }

    pub fn func_distinct(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args: args.into_iter().collect(),
            distinct: true,
        }
        .into()
    }

    /// `count(*)`
    pub fn count_star() -> Self {
        Expr::func("count", [Expr::raw("*")])
    }

    pub fn collect(expr: impl Into<Self>) -> Self {
        Expr::func("collect", [expr.into()])
    }

    /// `head(collect(expr))`, the to-one counterpart of [`Expr::collect`].
    pub fn head_collect(expr: impl Into<Self>) -> Self {
        Expr::func("head", [Expr::collect(expr)])
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
