use super::*;

/// An ordered sequence of clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub clauses: Vec<Clause>,
}

impl Statement {
    pub fn new() -> Statement {
        Statement::default()
    }

    pub fn push(&mut self, clause: impl Into<Clause>) {
        self.clauses.push(clause.into());
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }
}

impl From<Vec<Clause>> for Statement {
    fn from(clauses: Vec<Clause>) -> Self {
        Statement { clauses }
    }
}

impl From<Clause> for Statement {
    fn from(clause: Clause) -> Self {
        Statement {
            clauses: vec![clause],
        }
    }
}

impl From<Match> for Statement {
    fn from(value: Match) -> Self {
        Statement::from(Clause::from(value))
    }
}

impl Extend<Clause> for Statement {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        self.clauses.extend(iter);
    }
}

impl FromIterator<Clause> for Statement {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Statement {
            clauses: iter.into_iter().collect(),
        }
    }
}
