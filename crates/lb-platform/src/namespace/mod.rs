//! Namespace Aggregate
//!
//! Isolated containers of elements, each guarded by its own access token.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

// Re-export main types
pub use entity::Namespace;
pub use repository::NamespaceRepository;
pub use api::{namespaces_router, NamespacesState};
