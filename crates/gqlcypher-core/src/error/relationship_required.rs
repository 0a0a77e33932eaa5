use super::Error;

/// A singular relationship ended up with the wrong number of related nodes
/// after a mutation.
#[derive(Debug)]
pub(super) struct RelationshipRequired {
    message: Box<str>,
}

impl std::error::Error for RelationshipRequired {}

impl core::fmt::Display for RelationshipRequired {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "relationship required: {}", self.message)
    }
}

impl Error {
    /// Creates a relationship cardinality error.
    pub fn relationship_required(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::RelationshipRequired(RelationshipRequired {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error in its context chain, is
    /// a relationship cardinality error.
    pub fn is_relationship_required(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::RelationshipRequired(_)))
    }
}
