//! Local entity store seam.
//!
//! Persistence technology is a collaborator concern; the engine only
//! needs list/upsert/delete per variant plus the link set. Deleting an
//! entity cascades removal of its links.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use huddle_core::{Link, Member, MemberId, Organization, OrganizationId};

use crate::error::{StoreError, StoreResult};

/// Capability for reading and writing the local collections.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// All local organizations.
    async fn organizations(&self) -> StoreResult<Vec<Organization>>;

    /// All local members.
    async fn members(&self) -> StoreResult<Vec<Member>>;

    /// Insert or replace an organization by id.
    async fn upsert_organization(&self, organization: Organization) -> StoreResult<()>;

    /// Insert or replace a member by id.
    async fn upsert_member(&self, member: Member) -> StoreResult<()>;

    /// Delete an organization, cascading removal of its links.
    async fn delete_organization(&self, id: OrganizationId) -> StoreResult<()>;

    /// Delete a member, cascading removal of its links.
    async fn delete_member(&self, id: MemberId) -> StoreResult<()>;

    /// All current links.
    async fn links(&self) -> StoreResult<Vec<Link>>;

    /// Insert a link. Inserting an existing link is a no-op.
    async fn insert_link(&self, link: Link) -> StoreResult<()>;

    /// Remove a link. Removing an absent link is a no-op.
    async fn remove_link(&self, link: &Link) -> StoreResult<()>;
}

#[async_trait]
impl<T: SyncStore + ?Sized> SyncStore for std::sync::Arc<T> {
    async fn organizations(&self) -> StoreResult<Vec<Organization>> {
        (**self).organizations().await
    }

    async fn members(&self) -> StoreResult<Vec<Member>> {
        (**self).members().await
    }

    async fn upsert_organization(&self, organization: Organization) -> StoreResult<()> {
        (**self).upsert_organization(organization).await
    }

    async fn upsert_member(&self, member: Member) -> StoreResult<()> {
        (**self).upsert_member(member).await
    }

    async fn delete_organization(&self, id: OrganizationId) -> StoreResult<()> {
        (**self).delete_organization(id).await
    }

    async fn delete_member(&self, id: MemberId) -> StoreResult<()> {
        (**self).delete_member(id).await
    }

    async fn links(&self) -> StoreResult<Vec<Link>> {
        (**self).links().await
    }

    async fn insert_link(&self, link: Link) -> StoreResult<()> {
        (**self).insert_link(link).await
    }

    async fn remove_link(&self, link: &Link) -> StoreResult<()> {
        (**self).remove_link(link).await
    }
}

#[derive(Debug, Default)]
struct Inner {
    organizations: HashMap<OrganizationId, Organization>,
    members: HashMap<MemberId, Member>,
    links: HashSet<Link>,
}

/// In-process store backed by hash maps.
///
/// Backs the test suites and small deployments that do not need durable
/// storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::backend("store lock poisoned"))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::backend("store lock poisoned"))
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn organizations(&self) -> StoreResult<Vec<Organization>> {
        Ok(self.read()?.organizations.values().cloned().collect())
    }

    async fn members(&self) -> StoreResult<Vec<Member>> {
        Ok(self.read()?.members.values().cloned().collect())
    }

    async fn upsert_organization(&self, organization: Organization) -> StoreResult<()> {
        self.write()?
            .organizations
            .insert(organization.id, organization);
        Ok(())
    }

    async fn upsert_member(&self, member: Member) -> StoreResult<()> {
        self.write()?.members.insert(member.id, member);
        Ok(())
    }

    async fn delete_organization(&self, id: OrganizationId) -> StoreResult<()> {
        let mut inner = self.write()?;
        if inner.organizations.remove(&id).is_none() {
            return Err(StoreError::not_found("organization", id.to_string()));
        }
        inner.links.retain(|l| l.organization != id);
        Ok(())
    }

    async fn delete_member(&self, id: MemberId) -> StoreResult<()> {
        let mut inner = self.write()?;
        if inner.members.remove(&id).is_none() {
            return Err(StoreError::not_found("member", id.to_string()));
        }
        inner.links.retain(|l| l.member != id);
        Ok(())
    }

    async fn links(&self) -> StoreResult<Vec<Link>> {
        Ok(self.read()?.links.iter().copied().collect())
    }

    async fn insert_link(&self, link: Link) -> StoreResult<()> {
        self.write()?.links.insert(link);
        Ok(())
    }

    async fn remove_link(&self, link: &Link) -> StoreResult<()> {
        self.write()?.links.remove(link);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_list() {
        let store = MemoryStore::new();
        let org = Organization::new("Windy City Hackers");
        store.upsert_organization(org.clone()).await.unwrap();

        let orgs = store.organizations().await.unwrap();
        assert_eq!(orgs, vec![org]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let mut org = Organization::new("Old Name");
        store.upsert_organization(org.clone()).await.unwrap();

        org.name = "New Name".to_string();
        store.upsert_organization(org.clone()).await.unwrap();

        let orgs = store.organizations().await.unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].name, "New Name");
    }

    #[tokio::test]
    async fn test_delete_cascades_links() {
        let store = MemoryStore::new();
        let org = Organization::new("Windy City Hackers");
        let member = Member::new("Jane Hacker");
        store.upsert_organization(org.clone()).await.unwrap();
        store.upsert_member(member.clone()).await.unwrap();
        store
            .insert_link(Link::new(org.id, member.id))
            .await
            .unwrap();

        store.delete_organization(org.id).await.unwrap();
        assert!(store.links().await.unwrap().is_empty());
        assert_eq!(store.members().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_error() {
        let store = MemoryStore::new();
        let result = store.delete_member(MemberId::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_link_insert_remove_idempotent() {
        let store = MemoryStore::new();
        let link = Link::new(OrganizationId::new(), MemberId::new());

        store.insert_link(link).await.unwrap();
        store.insert_link(link).await.unwrap();
        assert_eq!(store.links().await.unwrap().len(), 1);

        store.remove_link(&link).await.unwrap();
        store.remove_link(&link).await.unwrap();
        assert!(store.links().await.unwrap().is_empty());
    }
}
