//! Namespace Repository

use async_trait::async_trait;

use crate::shared::error::Result;
use crate::Namespace;

/// Persistence contract for namespaces.
///
/// Updates touch existing rows only; none of them recreates a deleted namespace.
#[async_trait]
pub trait NamespaceRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Namespace>>;

    /// Page ordered by creation time, then ID.
    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Namespace>>;

    async fn count(&self) -> Result<u64>;

    /// Insert only if the ID is free. Returns `false` when it was taken.
    async fn insert(&self, namespace: &Namespace) -> Result<bool>;

    /// Set the active flag. `None` when the namespace does not exist.
    async fn set_active(&self, id: &str, active: bool) -> Result<Option<Namespace>>;

    /// Replace the stored token hash. `None` when the namespace does not exist.
    async fn set_token_hash(&self, id: &str, token_hash: &str) -> Result<Option<Namespace>>;

    /// Remove the namespace together with any elements still stored under it.
    async fn delete(&self, id: &str) -> Result<bool>;
}
