//! Element Aggregate
//!
//! Pastes and redirects, resolved publicly through the gateway.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

// Re-export main types
pub use entity::{Element, ElementType};
pub use repository::{ElementPatch, ElementRepository};
pub use api::{elements_router, ElementsState};
