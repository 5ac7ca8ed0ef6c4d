//! Invite Aggregate
//!
//! Codes gating public namespace creation.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

// Re-export main types
pub use entity::Invite;
pub use repository::InviteRepository;
pub use api::{invites_router, InvitesState};
