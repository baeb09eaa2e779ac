// client/src/lookup.rs

use futures::future::join_all;
use log::warn;
use models::medical::PersonName;
use rest_api::{Directory, HospitalApi};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Result of resolving one id to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Name(PersonName),
    /// The directory answered 404: the account was removed.
    Deleted,
    /// Any other failure; the row is still shown.
    Unavailable,
}

impl Resolved {
    pub fn name(&self) -> Option<&PersonName> {
        match self {
            Resolved::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Display text, with `deleted` used for removed accounts.
    pub fn label(&self, deleted: &str) -> String {
        match self {
            Resolved::Name(n) => n.to_string(),
            Resolved::Deleted => deleted.to_string(),
            Resolved::Unavailable => crate::feedback::UNKNOWN_PERSON.to_string(),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.label(crate::feedback::UNKNOWN_PERSON))
    }
}

/// Resolves every distinct id concurrently. Lookups fail independently; a
/// failed one never fails the batch.
pub async fn resolve_names<'a, I>(
    api: &dyn HospitalApi,
    directory: Directory,
    ids: I,
) -> HashMap<String, Resolved>
where
    I: IntoIterator<Item = &'a str>,
{
    let unique: BTreeSet<&str> = ids.into_iter().filter(|id| !id.is_empty()).collect();
    let lookups = unique.into_iter().map(|id| async move {
        let resolved = match api.get_profile(directory, id).await {
            Ok(profile) => Resolved::Name(profile.person_name()),
            Err(e) if e.is_not_found() => Resolved::Deleted,
            Err(e) => {
                warn!("Name lookup for {} {} failed: {}", directory, id, e);
                Resolved::Unavailable
            }
        };
        (id.to_string(), resolved)
    });
    join_all(lookups).await.into_iter().collect()
}

/// Lookup helper for rows whose id was not in the batch.
pub fn name_of(names: &HashMap<String, Resolved>, id: &str) -> Resolved {
    names.get(id).cloned().unwrap_or(Resolved::Unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rest_api::{Failure, InMemoryHospital};

    #[tokio::test]
    async fn resolves_each_id_once() {
        let api = InMemoryHospital::seeded();
        let names = resolve_names(&api, Directory::Doctors, ["doc-1", "doc-2", "doc-1", ""]).await;

        assert_eq!(names.len(), 2);
        assert_eq!(names["doc-1"].to_string(), "Gregory House");
        let lookups = api.calls().await.iter().filter(|c| *c == "get_profile").count();
        assert_eq!(lookups, 2);
    }

    #[tokio::test]
    async fn removed_accounts_are_marked_deleted() {
        let api = InMemoryHospital::seeded();
        let names = resolve_names(&api, Directory::Patients, ["pat-1", "gone"]).await;
        assert!(names["pat-1"].name().is_some());
        assert_eq!(names["gone"], Resolved::Deleted);
        assert_eq!(names["gone"].label("Client has been deleted"), "Client has been deleted");
    }

    #[tokio::test]
    async fn other_failures_do_not_fail_the_batch() {
        let api = InMemoryHospital::seeded();
        api.fail("get_profile", Failure::Status(500, "boom".into())).await;
        let names = resolve_names(&api, Directory::Doctors, ["doc-1"]).await;
        assert_eq!(names["doc-1"], Resolved::Unavailable);
        assert_eq!(name_of(&names, "other"), Resolved::Unavailable);
    }
}
