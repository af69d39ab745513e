//! Membership entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::validation::{normalize_key, MembershipError, SetOrigin};
use crate::domain::team::UserId;

/// A team member reference. Identity is the key; the id is derived later.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub key: String,
}

impl Member {
    /// Create an unresolved member
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self {
            id: UserId::UNRESOLVED,
            key: key.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.id.is_resolved()
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl std::hash::Hash for Member {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Set of members keyed by user identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipSet {
    members: BTreeMap<String, Member>,
}

impl MembershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an ordered list of keys, rejecting duplicates
    pub fn from_keys<I, S>(origin: SetOrigin, keys: I) -> Result<Self, MembershipError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();

        for raw in keys {
            set.insert(origin, raw.as_ref())?;
        }

        Ok(set)
    }

    /// Insert a key, failing if it is already present
    pub fn insert(&mut self, origin: SetOrigin, raw: &str) -> Result<(), MembershipError> {
        let key = normalize_key(raw, origin)?;

        if self.members.contains_key(&key) {
            return Err(MembershipError::DuplicateKey { key, origin });
        }

        self.members.insert(key.clone(), Member::unresolved(key));
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate members in key order
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

/// Kind of membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Remove,
    /// Never produced by the differ; applied like `Add`
    Update,
}

impl ChangeKind {
    /// Whether applying this change adds the member to the team
    pub fn is_additive(&self) -> bool {
        matches!(self, Self::Add | Self::Update)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A single classified membership delta
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipChange {
    pub kind: ChangeKind,
    pub member: Member,
}

impl MembershipChange {
    pub fn add(key: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Add,
            member: Member::unresolved(key),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Remove,
            member: Member::unresolved(key),
        }
    }

    pub fn key(&self) -> &str {
        &self.member.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_equality_ignores_id() {
        let unresolved = Member::unresolved("a@x.com");
        let resolved = Member {
            id: UserId::new(7),
            key: "a@x.com".to_string(),
        };

        assert_eq!(unresolved, resolved);
        assert_ne!(unresolved, Member::unresolved("b@x.com"));
    }

    #[test]
    fn test_from_keys() {
        let set =
            MembershipSet::from_keys(SetOrigin::Desired, ["b@x.com", "a@x.com"]).unwrap();

        assert_eq!(set.len(), 2);
        assert!(set.contains("a@x.com"));
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["a@x.com", "b@x.com"]);
        assert!(set.iter().all(|m| !m.is_resolved()));
    }

    #[test]
    fn test_from_keys_duplicate() {
        let result =
            MembershipSet::from_keys(SetOrigin::Previous, ["a@x.com", "b@x.com", "a@x.com"]);

        assert_eq!(
            result,
            Err(MembershipError::DuplicateKey {
                key: "a@x.com".to_string(),
                origin: SetOrigin::Previous,
            })
        );
    }

    #[test]
    fn test_from_keys_duplicate_after_trim() {
        let result = MembershipSet::from_keys(SetOrigin::Desired, ["a@x.com", " a@x.com "]);
        assert!(matches!(result, Err(MembershipError::DuplicateKey { .. })));
    }

    #[test]
    fn test_empty_set() {
        let set = MembershipSet::from_keys(SetOrigin::Desired, Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_change_kind_additive() {
        assert!(ChangeKind::Add.is_additive());
        assert!(ChangeKind::Update.is_additive());
        assert!(!ChangeKind::Remove.is_additive());
    }

    #[test]
    fn test_change_serializes_snake_case() {
        let change = MembershipChange::remove("a@x.com");
        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["kind"], "remove");
        assert_eq!(json["member"]["key"], "a@x.com");
        assert_eq!(json["member"]["id"], 0);
    }
}
