//! In-memory storage
//!
//! `HashMap`s behind `tokio::sync::RwLock`, implementing all three repository
//! traits. Nothing survives a restart; used for tests and local development.
//! Conditional writes run under the write lock, so they are atomic within
//! the process. Locks are always taken namespaces first, then elements.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::shared::error::{PlatformError, Result};
use crate::shared::outcome::RenameOutcome;
use crate::{
    Element, ElementPatch, ElementRepository, Invite, InviteRepository, Namespace,
    NamespaceRepository,
};

type ElementId = (String, String);

#[derive(Clone, Default)]
pub struct InMemoryStore {
    namespaces: Arc<RwLock<HashMap<String, Namespace>>>,
    elements: Arc<RwLock<HashMap<ElementId, Element>>>,
    invites: Arc<RwLock<HashMap<String, Invite>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T: Clone>(mut items: Vec<T>, limit: u32, skip: u32) -> Vec<T> {
    let skip = skip as usize;
    if skip >= items.len() {
        return Vec::new();
    }
    items.drain(..skip);
    items.truncate(limit as usize);
    items
}

fn element_id(namespace_id: &str, key: &str) -> ElementId {
    (namespace_id.to_string(), key.to_string())
}

fn sorted_elements<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<Element> {
    let mut found: Vec<Element> = elements.cloned().collect();
    found.sort_by(|a, b| {
        (a.created, &a.namespace_id, &a.key).cmp(&(b.created, &b.namespace_id, &b.key))
    });
    found
}

#[async_trait]
impl NamespaceRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Namespace>> {
        Ok(self.namespaces.read().await.get(id).cloned())
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Namespace>> {
        let mut found: Vec<Namespace> = self.namespaces.read().await.values().cloned().collect();
        found.sort_by(|a, b| (a.created, &a.id).cmp(&(b.created, &b.id)));
        Ok(page(found, limit, skip))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.namespaces.read().await.len() as u64)
    }

    async fn insert(&self, namespace: &Namespace) -> Result<bool> {
        let mut namespaces = self.namespaces.write().await;
        if namespaces.contains_key(&namespace.id) {
            return Ok(false);
        }
        namespaces.insert(namespace.id.clone(), namespace.clone());
        Ok(true)
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Namespace>> {
        let mut namespaces = self.namespaces.write().await;
        Ok(namespaces.get_mut(id).map(|namespace| {
            namespace.active = active;
            namespace.clone()
        }))
    }

    async fn set_token_hash(&self, id: &str, token_hash: &str) -> Result<Option<Namespace>> {
        let mut namespaces = self.namespaces.write().await;
        Ok(namespaces.get_mut(id).map(|namespace| {
            namespace.token_hash = token_hash.to_string();
            namespace.clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut namespaces = self.namespaces.write().await;
        let mut elements = self.elements.write().await;
        elements.retain(|(ns, _), _| ns != id);
        Ok(namespaces.remove(id).is_some())
    }
}

#[async_trait]
impl ElementRepository for InMemoryStore {
    async fn find(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        Ok(self
            .elements
            .read()
            .await
            .get(&element_id(namespace_id, key))
            .cloned())
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Element>> {
        let elements = self.elements.read().await;
        Ok(page(sorted_elements(elements.values()), limit, skip))
    }

    async fn find_in_namespace(
        &self,
        namespace_id: &str,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<Element>> {
        let elements = self.elements.read().await;
        let found = sorted_elements(
            elements
                .values()
                .filter(|element| element.namespace_id == namespace_id),
        );
        Ok(page(found, limit, skip))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.elements.read().await.len() as u64)
    }

    async fn count_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        Ok(self
            .elements
            .read()
            .await
            .values()
            .filter(|element| element.namespace_id == namespace_id)
            .count() as u64)
    }

    async fn insert(&self, element: &Element) -> Result<bool> {
        let namespaces = self.namespaces.read().await;
        if !namespaces.contains_key(&element.namespace_id) {
            return Err(PlatformError::namespace_not_found(&element.namespace_id));
        }
        let mut elements = self.elements.write().await;
        let id = element_id(&element.namespace_id, &element.key);
        if elements.contains_key(&id) {
            return Ok(false);
        }
        elements.insert(id, element.clone());
        Ok(true)
    }

    async fn update_limits(
        &self,
        namespace_id: &str,
        key: &str,
        patch: &ElementPatch,
    ) -> Result<Option<Element>> {
        let mut elements = self.elements.write().await;
        Ok(elements
            .get_mut(&element_id(namespace_id, key))
            .map(|element| {
                if let Some(max_views) = patch.max_views {
                    element.max_views = max_views;
                }
                if let Some(valid_from) = patch.valid_from {
                    element.valid_from = valid_from;
                }
                if let Some(valid_until) = patch.valid_until {
                    element.valid_until = valid_until;
                }
                element.clone()
            }))
    }

    async fn rename(
        &self,
        namespace_id: &str,
        key: &str,
        new_key: &str,
    ) -> Result<RenameOutcome<Element>> {
        let mut elements = self.elements.write().await;
        let new_id = element_id(namespace_id, new_key);
        if elements.contains_key(&new_id) {
            return Ok(RenameOutcome::Taken);
        }
        let Some(element) = elements.remove(&element_id(namespace_id, key)) else {
            return Ok(RenameOutcome::Missing);
        };
        let renamed = element.with_key(new_key);
        elements.insert(new_id, renamed.clone());
        Ok(RenameOutcome::Renamed(renamed))
    }

    async fn record_view(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        let mut elements = self.elements.write().await;
        let Some(element) = elements.get_mut(&element_id(namespace_id, key)) else {
            return Ok(None);
        };
        if element.views_exhausted() {
            return Ok(None);
        }
        element.views += 1;
        Ok(Some(element.clone()))
    }

    async fn delete(&self, namespace_id: &str, key: &str) -> Result<bool> {
        Ok(self
            .elements
            .write()
            .await
            .remove(&element_id(namespace_id, key))
            .is_some())
    }

    async fn delete_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        let mut elements = self.elements.write().await;
        let before = elements.len();
        elements.retain(|(ns, _), _| ns != namespace_id);
        Ok((before - elements.len()) as u64)
    }
}

#[async_trait]
impl InviteRepository for InMemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>> {
        Ok(self.invites.read().await.get(code).cloned())
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Invite>> {
        let mut found: Vec<Invite> = self.invites.read().await.values().cloned().collect();
        found.sort_by(|a, b| (a.created, &a.code).cmp(&(b.created, &b.code)));
        Ok(page(found, limit, skip))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.invites.read().await.len() as u64)
    }

    async fn insert(&self, invite: &Invite) -> Result<bool> {
        let mut invites = self.invites.write().await;
        if invites.contains_key(&invite.code) {
            return Ok(false);
        }
        invites.insert(invite.code.clone(), invite.clone());
        Ok(true)
    }

    async fn set_max_uses(&self, code: &str, max_uses: i32) -> Result<Option<Invite>> {
        let mut invites = self.invites.write().await;
        Ok(invites.get_mut(code).map(|invite| {
            invite.max_uses = max_uses;
            invite.clone()
        }))
    }

    async fn rename(&self, code: &str, new_code: &str) -> Result<RenameOutcome<Invite>> {
        let mut invites = self.invites.write().await;
        if invites.contains_key(new_code) {
            return Ok(RenameOutcome::Taken);
        }
        let Some(invite) = invites.remove(code) else {
            return Ok(RenameOutcome::Missing);
        };
        let renamed = Invite {
            code: new_code.to_string(),
            ..invite
        };
        invites.insert(renamed.code.clone(), renamed.clone());
        Ok(RenameOutcome::Renamed(renamed))
    }

    async fn redeem(&self, code: &str) -> Result<Option<Invite>> {
        let mut invites = self.invites.write().await;
        let Some(invite) = invites.get_mut(code) else {
            return Ok(None);
        };
        if !invite.is_redeemable() {
            return Ok(None);
        }
        invite.uses += 1;
        Ok(Some(invite.clone()))
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        Ok(self.invites.write().await.remove(code).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(namespace_ids: &[&str]) -> InMemoryStore {
        let store = InMemoryStore::new();
        for id in namespace_ids {
            NamespaceRepository::insert(&store, &Namespace::new(*id, "hash"))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_conditional_insert() {
        let store = InMemoryStore::new();
        let namespace = Namespace::new("demo", "hash");

        assert!(NamespaceRepository::insert(&store, &namespace).await.unwrap());
        assert!(!NamespaceRepository::insert(&store, &namespace).await.unwrap());
        assert_eq!(NamespaceRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_namespace_updates_never_recreate() {
        let store = store_with(&["demo"]).await;

        let updated = store.set_active("demo", false).await.unwrap().unwrap();
        assert!(!updated.active);
        let updated = store.set_token_hash("demo", "new-hash").await.unwrap().unwrap();
        assert_eq!(updated.token_hash, "new-hash");
        assert!(!updated.active);

        assert!(NamespaceRepository::delete(&store, "demo").await.unwrap());
        assert!(store.set_active("demo", true).await.unwrap().is_none());
        assert!(store.set_token_hash("demo", "other").await.unwrap().is_none());
        assert!(store.find_by_id("demo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_element_needs_its_namespace() {
        let store = store_with(&["demo"]).await;

        let err = ElementRepository::insert(&store, &Element::paste("ghost", "k", "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::NamespaceNotFound { .. }));

        ElementRepository::insert(&store, &Element::paste("demo", "k", "x"))
            .await
            .unwrap();
        assert!(NamespaceRepository::delete(&store, "demo").await.unwrap());
        assert_eq!(ElementRepository::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pagination_is_stable() {
        let store = store_with(&["demo"]).await;
        for (i, key) in ["c", "a", "b", "d"].iter().enumerate() {
            let mut element = Element::paste("demo", *key, "x");
            element.created = 100 + (i as i64 % 2);
            ElementRepository::insert(&store, &element).await.unwrap();
        }

        let keys = |elements: Vec<Element>| -> Vec<String> {
            elements.into_iter().map(|e| e.key).collect()
        };
        let all = keys(ElementRepository::find_all(&store, 10, 0).await.unwrap());
        assert_eq!(all, vec!["b", "c", "a", "d"]);

        let second_page = keys(store.find_in_namespace("demo", 2, 2).await.unwrap());
        assert_eq!(second_page, vec!["a", "d"]);

        assert!(store.find_in_namespace("demo", 2, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_view_respects_quota() {
        let store = store_with(&["demo"]).await;
        let mut element = Element::paste("demo", "k", "x");
        element.max_views = 2;
        ElementRepository::insert(&store, &element).await.unwrap();

        assert_eq!(store.record_view("demo", "k").await.unwrap().unwrap().views, 1);
        assert_eq!(store.record_view("demo", "k").await.unwrap().unwrap().views, 2);
        assert!(store.record_view("demo", "k").await.unwrap().is_none());
        assert!(store.record_view("demo", "missing").await.unwrap().is_none());

        let stored = store.find("demo", "k").await.unwrap().unwrap();
        assert_eq!(stored.views, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_views_never_exceed_quota() {
        let store = store_with(&["demo"]).await;
        let mut element = Element::paste("demo", "k", "x");
        element.max_views = 5;
        ElementRepository::insert(&store, &element).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.record_view("demo", "k").await.unwrap() })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                granted += 1;
            }
        }
        assert_eq!(granted, 5);
        assert_eq!(store.find("demo", "k").await.unwrap().unwrap().views, 5);
    }

    #[tokio::test]
    async fn test_update_limits_keeps_views() {
        let store = store_with(&["demo"]).await;
        let mut element = Element::paste("demo", "k", "x");
        element.valid_until = 500;
        ElementRepository::insert(&store, &element).await.unwrap();
        store.record_view("demo", "k").await.unwrap();

        let patch = ElementPatch {
            max_views: Some(10),
            ..ElementPatch::default()
        };
        let updated = store.update_limits("demo", "k", &patch).await.unwrap().unwrap();
        assert_eq!(updated.max_views, 10);
        assert_eq!(updated.valid_until, 500);
        assert_eq!(updated.views, 1);

        assert!(store.update_limits("demo", "nope", &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_element_rename_outcomes() {
        let store = store_with(&["demo"]).await;
        ElementRepository::insert(&store, &Element::paste("demo", "a", "x"))
            .await
            .unwrap();
        ElementRepository::insert(&store, &Element::paste("demo", "b", "y"))
            .await
            .unwrap();

        assert_eq!(
            ElementRepository::rename(&store, "demo", "a", "b").await.unwrap(),
            RenameOutcome::Taken
        );
        assert_eq!(
            ElementRepository::rename(&store, "demo", "zzz", "c").await.unwrap(),
            RenameOutcome::Missing
        );

        let RenameOutcome::Renamed(renamed) =
            ElementRepository::rename(&store, "demo", "a", "c").await.unwrap()
        else {
            panic!("rename to a free key should succeed");
        };
        assert_eq!(renamed.key, "c");
        assert_eq!(renamed.content(), Some("x"));
        assert!(store.find("demo", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_in_namespace_only_touches_that_namespace() {
        let store = store_with(&["one", "two"]).await;
        ElementRepository::insert(&store, &Element::paste("one", "a", "x")).await.unwrap();
        ElementRepository::insert(&store, &Element::paste("one", "b", "x")).await.unwrap();
        ElementRepository::insert(&store, &Element::paste("two", "a", "x")).await.unwrap();

        assert_eq!(store.delete_in_namespace("one").await.unwrap(), 2);
        assert_eq!(ElementRepository::count(&store).await.unwrap(), 1);
        assert_eq!(store.count_in_namespace("two").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_redeem_counts_uses() {
        let store = InMemoryStore::new();
        InviteRepository::insert(&store, &Invite::new("code", 1))
            .await
            .unwrap();

        let redeemed = store.redeem("code").await.unwrap().unwrap();
        assert_eq!(redeemed.uses, 1);
        assert!(store.redeem("code").await.unwrap().is_none());
        assert!(store.redeem("unknown").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_redeems_never_exceed_max_uses() {
        let store = InMemoryStore::new();
        InviteRepository::insert(&store, &Invite::new("code", 3))
            .await
            .unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.redeem("code").await.unwrap() })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                granted += 1;
            }
        }
        assert_eq!(granted, 3);
        assert_eq!(store.find_by_code("code").await.unwrap().unwrap().uses, 3);
    }

    #[tokio::test]
    async fn test_invite_updates_keep_use_count() {
        let store = InMemoryStore::new();
        InviteRepository::insert(&store, &Invite::new("old", 5))
            .await
            .unwrap();
        InviteRepository::insert(&store, &Invite::new("other", 5))
            .await
            .unwrap();
        store.redeem("old").await.unwrap();

        let updated = store.set_max_uses("old", 9).await.unwrap().unwrap();
        assert_eq!((updated.uses, updated.max_uses), (1, 9));

        assert_eq!(
            InviteRepository::rename(&store, "old", "other").await.unwrap(),
            RenameOutcome::Taken
        );
        let RenameOutcome::Renamed(renamed) =
            InviteRepository::rename(&store, "old", "new").await.unwrap()
        else {
            panic!("rename to a free code should succeed");
        };
        assert_eq!((renamed.uses, renamed.max_uses), (1, 9));
        assert!(store.find_by_code("old").await.unwrap().is_none());
        assert!(store.set_max_uses("old", 1).await.unwrap().is_none());
    }
}
