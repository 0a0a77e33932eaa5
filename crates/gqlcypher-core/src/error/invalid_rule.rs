use super::Error;

/// Error when an authorization rule attached to the schema is malformed.
#[derive(Debug)]
pub(super) struct InvalidRule {
    owner: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InvalidRule {}

impl core::fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid authorization rule on `{}`: {}",
            self.owner, self.message
        )
    }
}

impl Error {
    /// Creates an invalid rule error. `owner` names the entity or field the
    /// rule is attached to.
    pub fn invalid_rule(owner: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRule(InvalidRule {
            owner: owner.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid rule error.
    pub fn is_invalid_rule(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidRule(_)))
    }
}
