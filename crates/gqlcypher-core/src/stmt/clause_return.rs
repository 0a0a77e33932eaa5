use super::{Clause, Orderable, Ordering, Projection};

/// `RETURN [DISTINCT] projection [ORDER BY ..] [SKIP ..] [LIMIT ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub distinct: bool,
    pub projection: Projection,
    pub ordering: Ordering,
}

impl Return {
    pub fn new(projection: Projection) -> Return {
        Return {
            distinct: false,
            projection,
            ordering: Ordering::default(),
        }
    }
}

impl Orderable for Return {
    fn ordering_mut(&mut self) -> &mut Ordering {
        &mut self.ordering
    }
}

impl From<Return> for Clause {
    fn from(value: Return) -> Self {
        Clause::Return(value)
    }
}
