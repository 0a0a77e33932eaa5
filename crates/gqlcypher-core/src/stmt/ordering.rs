use super::Expr;

/// `ORDER BY .. SKIP .. LIMIT ..` trailing a `WITH` or `RETURN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ordering {
    pub order_by: Vec<SortItem>,
    pub skip: Option<Expr>,
    pub limit: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub expr: Expr,
    pub direction: SortDirection,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Ordering {
    pub fn is_empty(&self) -> bool {
        self.order_by.is_empty() && self.skip.is_none() && self.limit.is_none()
    }
}
