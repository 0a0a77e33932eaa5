use super::{Expr, Ordering, SortDirection, SortItem};

/// Clauses that accept a `WHERE` predicate.
pub trait Filterable {
    fn predicate_mut(&mut self) -> &mut Option<Expr>;

    /// ANDs `predicate` onto the clause's existing predicate. `None` is a
    /// no-op.
    fn and_where(&mut self, predicate: impl Into<Option<Expr>>) {
        let Some(predicate) = predicate.into() else {
            return;
        };

        let slot = self.predicate_mut();
        *slot = Some(match slot.take() {
            Some(existing) => Expr::and(existing, predicate),
            None => predicate,
        });
    }

    fn filter(mut self, predicate: impl Into<Option<Expr>>) -> Self
    where
        Self: Sized,
    {
        self.and_where(predicate);
        self
    }
}

/// Clauses that accept `ORDER BY`, `SKIP` and `LIMIT`.
pub trait Orderable {
    fn ordering_mut(&mut self) -> &mut Ordering;

    fn order_by(&mut self, expr: impl Into<Expr>, direction: SortDirection) {
        self.ordering_mut().order_by.push(SortItem {
            expr: expr.into(),
            direction,
        });
    }

    fn skip(&mut self, expr: impl Into<Expr>) {
        self.ordering_mut().skip = Some(expr.into());
    }

    fn limit(&mut self, expr: impl Into<Expr>) {
        self.ordering_mut().limit = Some(expr.into());
    }
}
