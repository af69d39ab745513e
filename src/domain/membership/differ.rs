//! Membership diffing

use super::entity::{MembershipChange, MembershipSet};
use super::validation::{MembershipError, SetOrigin};

/// Compute the changes that turn `previous` into `desired`.
///
/// Adds come first, then removes, each in key order. Keys present in both
/// sets produce nothing.
pub fn diff(previous: &MembershipSet, desired: &MembershipSet) -> Vec<MembershipChange> {
    let additions = desired
        .keys()
        .filter(|key| !previous.contains(key))
        .map(MembershipChange::add);

    let removals = previous
        .keys()
        .filter(|key| !desired.contains(key))
        .map(MembershipChange::remove);

    additions.chain(removals).collect()
}

/// Build both sets from raw key lists and diff them.
///
/// Duplicate or empty keys in either list fail before any change is produced.
pub fn diff_keys<P, D, S, T>(previous: P, desired: D) -> Result<Vec<MembershipChange>, MembershipError>
where
    P: IntoIterator<Item = S>,
    D: IntoIterator<Item = T>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let previous = MembershipSet::from_keys(SetOrigin::Previous, previous)?;
    let desired = MembershipSet::from_keys(SetOrigin::Desired, desired)?;

    Ok(diff(&previous, &desired))
}
