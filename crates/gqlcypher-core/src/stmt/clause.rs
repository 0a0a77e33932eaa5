use super::*;

/// One clause of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Match(Match),
    Create(Create),
    Merge(Merge),
    Set(Set),
    Remove(Remove),
    Delete(Delete),
    With(With),
    Return(Return),
    Unwind(Unwind),
    Call(Call),
    Union(Union),

    /// Cypher text inserted verbatim, used for user-supplied statements of
    /// computed fields
    Raw(String),
}

impl Clause {
    pub fn raw(cypher: impl Into<String>) -> Clause {
        Clause::Raw(cypher.into())
    }
}
