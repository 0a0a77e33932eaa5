use super::{Clause, Expr, Filterable, Orderable, Ordering, Projection};

/// `WITH [DISTINCT] projection [ORDER BY ..] [SKIP ..] [LIMIT ..] [WHERE ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub distinct: bool,
    pub projection: Projection,
    pub ordering: Ordering,
    pub predicate: Option<Expr>,
}

impl With {
    pub fn new(projection: Projection) -> With {
        With {
            distinct: false,
            projection,
            ordering: Ordering::default(),
            predicate: None,
        }
    }

    /// `WITH *`
    pub fn star() -> With {
        With::new(Projection::star())
    }
}

impl Filterable for With {
    fn predicate_mut(&mut self) -> &mut Option<Expr> {
        &mut self.predicate
    }
}

impl Orderable for With {
    fn ordering_mut(&mut self) -> &mut Ordering {
        &mut self.ordering
    }
}

impl From<With> for Clause {
    fn from(value: With) -> Self {
        Clause::With(value)
    }
}
