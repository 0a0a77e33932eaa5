use super::{Expr, Variable};

/// The item list of a `WITH` or `RETURN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Leading `*`
    pub star: bool,
    pub items: Vec<ProjectionItem>,
}

/// `expr [AS alias]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expr: Expr,
    pub alias: Option<Variable>,
}

impl Projection {
    pub fn star() -> Projection {
        Projection {
            star: true,
            items: vec![],
        }
    }

    pub fn items(items: impl IntoIterator<Item = ProjectionItem>) -> Projection {
        Projection {
            star: false,
            items: items.into_iter().collect(),
        }
    }

    /// Projects the given variables unchanged.
    pub fn variables<'a>(variables: impl IntoIterator<Item = &'a Variable>) -> Projection {
        Projection::items(variables.into_iter().map(ProjectionItem::from))
    }

    pub fn item(mut self, expr: impl Into<Expr>, alias: &Variable) -> Projection {
        self.items.push(ProjectionItem::aliased(expr, alias));
        self
    }
}

impl ProjectionItem {
    pub fn aliased(expr: impl Into<Expr>, alias: &Variable) -> ProjectionItem {
        ProjectionItem {
            expr: expr.into(),
            alias: Some(alias.clone()),
        }
    }
}

impl From<&Variable> for ProjectionItem {
    fn from(value: &Variable) -> Self {
        ProjectionItem {
            expr: value.into(),
            alias: None,
        }
    }
}
