//! Identity resolution for membership changes

use std::collections::HashMap;

use tracing::{debug, warn};

use super::error::ReconcileError;
use crate::domain::directory::UserProvisioner;
use crate::domain::membership::MembershipChange;
use crate::domain::team::{DirectoryUser, UserId};

/// Email to user id lookup built from one directory snapshot.
///
/// The snapshot is taken by the caller; no refresh happens here.
#[derive(Debug, Clone, Default)]
pub struct KnownUsers {
    by_email: HashMap<String, UserId>,
}

impl KnownUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the lookup from a directory listing
    pub fn from_snapshot(users: impl IntoIterator<Item = DirectoryUser>) -> Self {
        let by_email = users.into_iter().map(|u| (u.email, u.id)).collect();
        Self { by_email }
    }

    pub fn get(&self, email: &str) -> Option<UserId> {
        self.by_email.get(email).copied()
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, UserId)> for KnownUsers {
    fn from_iter<I: IntoIterator<Item = (S, UserId)>>(iter: I) -> Self {
        let by_email = iter.into_iter().map(|(k, id)| (k.into(), id)).collect();
        Self { by_email }
    }
}

/// Result of resolving a batch
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Input changes, in order, each carrying a resolved id
    pub changes: Vec<MembershipChange>,
    /// Users provisioned while resolving
    pub created: Vec<DirectoryUser>,
}

/// Attach a remote user id to every change.
///
/// Unknown keys fail the whole batch unless `allow_create` is set, in which
/// case the provisioner creates the user. A creation failure aborts the batch;
/// users created before the failure stay created.
pub async fn resolve<P>(
    changes: Vec<MembershipChange>,
    known: &KnownUsers,
    allow_create: bool,
    provisioner: &P,
) -> Result<Resolution, ReconcileError>
where
    P: UserProvisioner + ?Sized,
{
    let mut resolution = Resolution {
        changes: Vec::with_capacity(changes.len()),
        created: Vec::new(),
    };
    let mut created_ids: HashMap<String, UserId> = HashMap::new();

    for mut change in changes {
        let key = change.key().to_string();

        let id = match known.get(&key).or_else(|| created_ids.get(&key).copied()) {
            Some(id) => id,
            None if !allow_create => {
                return Err(ReconcileError::UnknownUser { key });
            }
            None => {
                warn!(key = %key, "Creating directory user");

                let id = provisioner
                    .create_user(&key)
                    .await
                    .map_err(|source| ReconcileError::Creation {
                        key: key.clone(),
                        source,
                    })?;

                created_ids.insert(key.clone(), id);
                resolution.created.push(DirectoryUser::new(id, key.clone()));
                id
            }
        };

        debug!(key = %key, user = %id, kind = %change.kind, "Resolved member");
        change.member.id = id;
        resolution.changes.push(change);
    }

    Ok(resolution)
}
