use super::Error;

/// Error reported by the executor that ran a compiled statement.
#[derive(Debug)]
pub(super) struct ExecutorError {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("executor error: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from an executor failure.
    ///
    /// Executors wrap whatever their client library reports. Messages
    /// carrying one of the runtime assertion markers are translated into
    /// [`Error::forbidden`] or [`Error::relationship_required`] by the
    /// compiler before they reach the caller.
    pub fn executor(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        Error::from(super::ErrorKind::Executor(ExecutorError { inner: err.into() }))
    }

    /// Returns `true` if this error is an executor error.
    pub fn is_executor(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Executor(_))
    }

    /// Returns the executor's message if this error is an executor error.
    pub fn executor_message(&self) -> Option<String> {
        match self.kind() {
            super::ErrorKind::Executor(err) => Some(err.inner.to_string()),
            _ => None,
        }
    }
}
