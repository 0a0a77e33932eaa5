use super::{Clause, Expr, Filterable, Pattern};

/// `[OPTIONAL] MATCH pattern [WHERE predicate]`
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub optional: bool,
    pub pattern: Pattern,
    pub predicate: Option<Expr>,
}

impl Match {
    pub fn new(pattern: impl Into<Pattern>) -> Match {
        Match {
            optional: false,
            pattern: pattern.into(),
            predicate: None,
        }
    }

    pub fn optional(pattern: impl Into<Pattern>) -> Match {
        Match {
            optional: true,
            ..Match::new(pattern)
        }
    }
}

impl Filterable for Match {
    fn predicate_mut(&mut self) -> &mut Option<Expr> {
        &mut self.predicate
    }
}

impl From<Match> for Clause {
    fn from(value: Match) -> Self {
        Clause::Match(value)
    }
}
