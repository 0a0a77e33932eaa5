use super::Expr;

use indexmap::IndexMap;

/// `{ key: expr, .. }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprMap {
    pub entries: IndexMap<String, Expr>,
}

impl ExprMap {
    pub fn new() -> ExprMap {
        ExprMap::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, expr: impl Into<Expr>) {
        self.entries.insert(key.into(), expr.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Expr {
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        ExprMap {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
        .into()
    }
}

impl From<ExprMap> for Expr {
    fn from(value: ExprMap) -> Self {
        Self::Map(value)
    }
}
