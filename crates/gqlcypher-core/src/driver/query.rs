use crate::stmt::ParamTable;

/// A rendered statement ready to hand to an [`Executor`](super::Executor).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub cypher: String,
    pub params: ParamTable,
    pub access_mode: AccessMode,
}

/// Transaction mode the executor should open.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    pub fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }
}
