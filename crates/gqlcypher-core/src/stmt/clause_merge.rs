use super::{Clause, Pattern, SetItem};

/// `MERGE pattern [ON CREATE SET ..] [ON MATCH SET ..]`
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub pattern: Pattern,
    pub on_create: Vec<SetItem>,
    pub on_match: Vec<SetItem>,
}

impl Merge {
    pub fn new(pattern: impl Into<Pattern>) -> Merge {
        Merge {
            pattern: pattern.into(),
            on_create: vec![],
            on_match: vec![],
        }
    }

    pub fn on_create(mut self, items: impl IntoIterator<Item = SetItem>) -> Merge {
        self.on_create.extend(items);
        self
    }
}

impl From<Merge> for Clause {
    fn from(value: Merge) -> Self {
        Clause::Merge(value)
    }
}
