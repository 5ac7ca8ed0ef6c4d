//! Fixtures for unit tests: in-memory repositories and a cheap token service.

use async_trait::async_trait;
use std::sync::Arc;

use crate::shared::error::Result;
use crate::shared::outcome::RenameOutcome;
use crate::shared::token_service::{generate_token, Argon2Config, TokenService};
use crate::storage::Repositories;
use crate::{Element, ElementPatch, ElementRepository, Namespace, NamespaceRepository};

pub struct Fixture {
    pub repos: Repositories,
    pub token_service: Arc<TokenService>,
}

pub fn fixture() -> Fixture {
    Fixture {
        repos: Repositories::in_memory(),
        token_service: Arc::new(TokenService::new(Argon2Config::testing()).unwrap()),
    }
}

/// Store an active namespace and return its plaintext token.
pub async fn seed_namespace(fx: &Fixture, id: &str) -> String {
    let token = generate_token();
    let namespace = Namespace::new(id, fx.token_service.hash(&token).unwrap());
    assert!(fx.repos.namespaces.insert(&namespace).await.unwrap());
    token
}

/// What another request does to the same record right before a write lands.
#[derive(Debug, Clone, Copy)]
pub enum Interleave {
    View,
    Delete,
}

/// Element repository that runs an `Interleave` against the real store
/// immediately before each in-place update or rename.
pub struct InterleavedElements {
    inner: Arc<dyn ElementRepository>,
    interleave: Interleave,
}

impl InterleavedElements {
    pub fn new(inner: Arc<dyn ElementRepository>, interleave: Interleave) -> Self {
        Self { inner, interleave }
    }

    async fn interleave(&self, namespace_id: &str, key: &str) {
        match self.interleave {
            Interleave::View => {
                self.inner.record_view(namespace_id, key).await.unwrap();
            }
            Interleave::Delete => {
                self.inner.delete(namespace_id, key).await.unwrap();
            }
        }
    }
}

#[async_trait]
impl ElementRepository for InterleavedElements {
    async fn find(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        self.inner.find(namespace_id, key).await
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Element>> {
        self.inner.find_all(limit, skip).await
    }

    async fn find_in_namespace(
        &self,
        namespace_id: &str,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<Element>> {
        self.inner.find_in_namespace(namespace_id, limit, skip).await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn count_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        self.inner.count_in_namespace(namespace_id).await
    }

    async fn insert(&self, element: &Element) -> Result<bool> {
        self.inner.insert(element).await
    }

    async fn update_limits(
        &self,
        namespace_id: &str,
        key: &str,
        patch: &ElementPatch,
    ) -> Result<Option<Element>> {
        self.interleave(namespace_id, key).await;
        self.inner.update_limits(namespace_id, key, patch).await
    }

    async fn rename(
        &self,
        namespace_id: &str,
        key: &str,
        new_key: &str,
    ) -> Result<RenameOutcome<Element>> {
        self.interleave(namespace_id, key).await;
        self.inner.rename(namespace_id, key, new_key).await
    }

    async fn record_view(&self, namespace_id: &str, key: &str) -> Result<Option<Element>> {
        self.inner.record_view(namespace_id, key).await
    }

    async fn delete(&self, namespace_id: &str, key: &str) -> Result<bool> {
        self.inner.delete(namespace_id, key).await
    }

    async fn delete_in_namespace(&self, namespace_id: &str) -> Result<u64> {
        self.inner.delete_in_namespace(namespace_id).await
    }
}

/// Namespace repository that deletes the namespace right before each update.
pub struct DeletedBeforeUpdate {
    inner: Arc<dyn NamespaceRepository>,
}

impl DeletedBeforeUpdate {
    pub fn new(inner: Arc<dyn NamespaceRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl NamespaceRepository for DeletedBeforeUpdate {
    async fn find_by_id(&self, id: &str) -> Result<Option<Namespace>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Namespace>> {
        self.inner.find_all(limit, skip).await
    }

    async fn count(&self) -> Result<u64> {
        self.inner.count().await
    }

    async fn insert(&self, namespace: &Namespace) -> Result<bool> {
        self.inner.insert(namespace).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Namespace>> {
        self.inner.delete(id).await?;
        self.inner.set_active(id, active).await
    }

    async fn set_token_hash(&self, id: &str, token_hash: &str) -> Result<Option<Namespace>> {
        self.inner.delete(id).await?;
        self.inner.set_token_hash(id, token_hash).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.inner.delete(id).await
    }
}
