use super::{Clause, Pattern};

/// `CREATE pattern`
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub pattern: Pattern,
}

impl Create {
    pub fn new(pattern: impl Into<Pattern>) -> Create {
        Create {
            pattern: pattern.into(),
        }
    }
}

impl From<Create> for Clause {
    fn from(value: Create) -> Self {
        Clause::Create(value)
    }
}
