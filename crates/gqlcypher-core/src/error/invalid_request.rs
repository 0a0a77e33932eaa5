use super::Error;

/// Error when an incoming request cannot be compiled.
///
/// This occurs when:
/// - A selection, argument, or filter names a field the entity does not have
/// - A value has the wrong shape for the field it targets
/// - A nested operation is not enabled on the relationship
/// - A connectOrCreate `where` does not reference unique fields
#[derive(Debug)]
pub(super) struct InvalidRequest {
    message: Box<str>,
}

impl std::error::Error for InvalidRequest {}

impl core::fmt::Display for InvalidRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid request: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRequest(InvalidRequest {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error in its context chain, is
    /// an invalid request error.
    pub fn is_invalid_request(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidRequest(_)))
    }
}
