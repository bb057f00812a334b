//! Error types for the botgame engine.

use thiserror::Error;

/// All possible errors from the registry core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Lookup errors
    #[error("user not found: {0}")]
    UserNotFound(String),

    // Allocation errors
    #[error("user id already taken: {0}")]
    DuplicateId(String),

    #[error("identifier space exhausted after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },

    #[error("allocation deadline exceeded")]
    Timeout,

    // Store errors
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UserNotFound("aB3xZ9".into());
        assert_eq!(err.to_string(), "user not found: aB3xZ9");

        let err = Error::IdSpaceExhausted { attempts: 8 };
        assert_eq!(
            err.to_string(),
            "identifier space exhausted after 8 attempts"
        );

        let err = Error::InvalidArgument("points delta is not numeric: \"ten\"".into());
        assert_eq!(
            err.to_string(),
            "invalid argument: points delta is not numeric: \"ten\""
        );
    }
}
