//! Element Repository

use async_trait::async_trait;

use crate::shared::error::Result;
use crate::shared::outcome::RenameOutcome;
use crate::Element;

/// Quota and window changes for an existing element. `None` leaves the
/// stored value as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementPatch {
    pub max_views: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

/// Persistence contract for elements, identified by `(namespace_id, key)`.
///
/// Updates touch existing rows only and never write `views`; the view
/// counter moves solely through `record_view`.
#[async_trait]
pub trait ElementRepository: Send + Sync {
    async fn find(&self, namespace_id: &str, key: &str) -> Result<Option<Element>>;

    /// Page across all namespaces, ordered by creation time, then namespace and key.
    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Element>>;

    async fn find_in_namespace(
        &self,
        namespace_id: &str,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<Element>>;

    async fn count(&self) -> Result<u64>;

    async fn count_in_namespace(&self, namespace_id: &str) -> Result<u64>;

    /// Insert only if the key is free in its namespace. Returns `false` when
    /// it was taken. Fails with `NamespaceNotFound` when the namespace is gone.
    async fn insert(&self, element: &Element) -> Result<bool>;

    /// Apply `patch` in place and return the stored element. `None` when the
    /// element does not exist.
    async fn update_limits(
        &self,
        namespace_id: &str,
        key: &str,
        patch: &ElementPatch,
    ) -> Result<Option<Element>>;

    /// Move an element to `new_key` within its namespace, keeping every other field.
    async fn rename(
        &self,
        namespace_id: &str,
        key: &str,
        new_key: &str,
    ) -> Result<RenameOutcome<Element>>;

    /// Atomically add one view while the quota allows it and return the
    /// updated element. `None` when the element is gone or exhausted.
    async fn record_view(&self, namespace_id: &str, key: &str) -> Result<Option<Element>>;

    async fn delete(&self, namespace_id: &str, key: &str) -> Result<bool>;

    /// Remove every element of a namespace, returning how many were removed.
    async fn delete_in_namespace(&self, namespace_id: &str) -> Result<u64>;
}
