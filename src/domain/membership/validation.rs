//! Membership key validation

use serde::Serialize;
use thiserror::Error;

/// Which side of a reconciliation a membership set was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOrigin {
    /// Last applied / last observed membership
    Previous,
    /// Target membership
    Desired,
}

impl std::fmt::Display for SetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Previous => write!(f, "previous"),
            Self::Desired => write!(f, "desired"),
        }
    }
}

/// Errors raised while building a membership set
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MembershipError {
    #[error("User '{key}' cannot be specified multiple times in the {origin} membership")]
    DuplicateKey { key: String, origin: SetOrigin },

    #[error("Empty user identifier in the {origin} membership")]
    EmptyKey { origin: SetOrigin },
}

/// Normalise a raw member key. Surrounding whitespace is dropped; the rest is
/// kept verbatim since the directory compares emails exactly.
pub fn normalize_key(raw: &str, origin: SetOrigin) -> Result<String, MembershipError> {
    let key = raw.trim();

    if key.is_empty() {
        return Err(MembershipError::EmptyKey { origin });
    }

    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        assert_eq!(
            normalize_key("  a@x.com\n", SetOrigin::Desired).unwrap(),
            "a@x.com"
        );
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(
            normalize_key("Alice@X.com", SetOrigin::Desired).unwrap(),
            "Alice@X.com"
        );
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(
            normalize_key("   ", SetOrigin::Previous),
            Err(MembershipError::EmptyKey {
                origin: SetOrigin::Previous
            })
        );
    }

    #[test]
    fn test_duplicate_key_message() {
        let error = MembershipError::DuplicateKey {
            key: "a@x.com".to_string(),
            origin: SetOrigin::Desired,
        };
        assert_eq!(
            error.to_string(),
            "User 'a@x.com' cannot be specified multiple times in the desired membership"
        );
    }
}
