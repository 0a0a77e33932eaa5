use super::Error;

/// The request was rejected by an authorization rule.
#[derive(Debug)]
pub(super) struct Forbidden;

impl std::error::Error for Forbidden {}

impl core::fmt::Display for Forbidden {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("forbidden")
    }
}

impl Error {
    /// Creates a forbidden error.
    ///
    /// Raised at compile time when global authentication is required and
    /// the context carries no claims, and at execution time when a runtime
    /// assertion fails.
    pub fn forbidden() -> Error {
        Error::from(super::ErrorKind::Forbidden(Forbidden))
    }

    /// Returns `true` if this error, or any error in its context chain, is
    /// a forbidden error.
    pub fn is_forbidden(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Forbidden(_)))
    }
}
