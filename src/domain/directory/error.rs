//! Directory client errors

use thiserror::Error;

/// Classification of a remote directory failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryErrorKind {
    /// The requested state already holds (already a member / already absent)
    Conflict,
    NotFound,
    Unauthorized,
    RateLimited,
    /// The request never produced a response
    Transport,
    /// A response arrived but could not be decoded
    InvalidResponse,
    /// Any other non-success status
    Remote { status: u16 },
}

impl std::fmt::Display for DirectoryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Transport => write!(f, "transport"),
            Self::InvalidResponse => write!(f, "invalid response"),
            Self::Remote { status } => write!(f, "HTTP {}", status),
        }
    }
}

/// Error returned by every directory collaborator operation
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Directory {kind} error: {message}")]
pub struct DirectoryError {
    pub kind: DirectoryErrorKind,
    pub message: String,
}

impl DirectoryError {
    pub fn new(kind: DirectoryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::Conflict, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::Unauthorized, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::Transport, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::InvalidResponse, message)
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::Remote { status }, message)
    }

    /// Whether the remote reported that the requested state already holds
    pub fn is_conflict(&self) -> bool {
        self.kind == DirectoryErrorKind::Conflict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_detected_by_kind() {
        assert!(DirectoryError::conflict("User is already a member").is_conflict());
        assert!(!DirectoryError::remote(500, "409 Conflict").is_conflict());
        assert!(!DirectoryError::not_found("gone").is_conflict());
    }

    #[test]
    fn test_display() {
        let error = DirectoryError::remote(502, "bad gateway");
        assert_eq!(error.to_string(), "Directory HTTP 502 error: bad gateway");

        let error = DirectoryError::transport("connection refused");
        assert_eq!(
            error.to_string(),
            "Directory transport error: connection refused"
        );
    }
}
