//! Result type for internal invariant violations.

/// Result of an operation that can only fail because of a bug in Cerata.
///
/// Problems in a user's design description are reported as diagnostics and
/// the operation still returns `Ok`.
pub type CerataResult<T> = Result<T, InternalError>;

/// An internal error: an invariant of the generator itself was broken.
#[derive(Debug, thiserror::Error)]
#[error("internal generator error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("pool lost a node");
        assert_eq!(err.to_string(), "internal generator error: pool lost a node");
    }

    #[test]
    fn from_string() {
        let err: InternalError = String::from("dangling edge").into();
        assert_eq!(err.message, "dangling edge");
    }
}
