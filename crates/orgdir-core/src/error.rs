// crates/orgdir-core/src/error.rs
use thiserror::Error;

/// Failure categories surfaced by every directory operation.
///
/// Callers branch on the kind rather than on individual variants: the HTTP
/// layer maps kinds to status codes, the service facade uses them to decide
/// the log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Duplicate organization name.
    Conflict,
    /// No rows matched a lookup.
    NotFound,
    /// Rejected input (activity nesting too deep).
    Validation,
    /// Integrity violation reported by the underlying store.
    StorageConstraint,
    /// Anything else.
    Unexpected,
}

impl ErrorKind {
    /// `true` for the kinds that are server faults rather than client faults.
    #[inline]
    pub fn is_internal(self) -> bool {
        matches!(self, ErrorKind::StorageConstraint | ErrorKind::Unexpected)
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Organization {0} already exists")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Exceeded maximum activity nesting level of {max}")]
    NestingTooDeep { max: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage constraint violated: {0}")]
    StorageConstraint(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary snapshot error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::Conflict(_) => ErrorKind::Conflict,
            DirectoryError::NotFound(_) => ErrorKind::NotFound,
            DirectoryError::NestingTooDeep { .. } | DirectoryError::Validation(_) => {
                ErrorKind::Validation
            }
            DirectoryError::StorageConstraint(_) => ErrorKind::StorageConstraint,
            DirectoryError::Unexpected(_) | DirectoryError::Io(_) | DirectoryError::Bincode(_) => {
                ErrorKind::Unexpected
            }
            #[cfg(feature = "json")]
            DirectoryError::Json(_) => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            DirectoryError::Conflict("Acme".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DirectoryError::NestingTooDeep { max: 3 }.kind(),
            ErrorKind::Validation
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(DirectoryError::from(io).kind(), ErrorKind::Unexpected);
        assert!(ErrorKind::StorageConstraint.is_internal());
        assert!(!ErrorKind::NotFound.is_internal());
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            DirectoryError::Conflict("Acme".into()).to_string(),
            "Organization Acme already exists"
        );
        assert_eq!(
            DirectoryError::NestingTooDeep { max: 3 }.to_string(),
            "Exceeded maximum activity nesting level of 3"
        );
    }
}
