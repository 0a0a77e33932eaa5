use super::{Expr, Variable};

/// `variable { .prop, key: expr }`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMapProjection {
    pub variable: Variable,
    pub items: Vec<MapProjectionItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapProjectionItem {
    /// `.name`
    Property(String),

    /// `key: expr`
    Entry(String, Expr),
}

impl MapProjectionItem {
    /// The key this item occupies in the projected map.
    pub fn key(&self) -> &str {
        match self {
            MapProjectionItem::Property(name) => name,
            MapProjectionItem::Entry(key, _) => key,
        }
    }
}

impl Expr {
    pub fn map_projection(
        variable: &Variable,
        items: impl IntoIterator<Item = MapProjectionItem>,
    ) -> Self {
        ExprMapProjection {
            variable: variable.clone(),
            items: items.into_iter().collect(),
        }
        .into()
    }
}

impl From<ExprMapProjection> for Expr {
    fn from(value: ExprMapProjection) -> Self {
        Self::MapProjection(value)
    }
}
