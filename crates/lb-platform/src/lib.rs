//! Linkbox Platform
//!
//! Namespaced pastes and redirects:
//! - Namespaces guarded by Argon2id-hashed access tokens
//! - Paste and redirect elements with view quotas and validity windows
//! - Invite codes gating public namespace creation
//! - Admin REST API and a public resolving gateway
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Storage contract
//! - `api` - REST endpoints
//! - `operations` - Use case operations

// Aggregates
pub mod namespace;
pub mod element;
pub mod invite;

// Public resolution
pub mod gateway;

// Infrastructure
pub mod shared;
pub mod storage;
pub mod app;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::token_service::{Argon2Config, TokenService};
pub use shared::outcome::RenameOutcome;

// Re-export main entity types for convenience
pub use namespace::entity::Namespace;
pub use element::entity::{Element, ElementType};
pub use invite::entity::Invite;

// Re-export repositories
pub use namespace::repository::NamespaceRepository;
pub use element::repository::{ElementPatch, ElementRepository};
pub use invite::repository::InviteRepository;

// Re-export API routers and state types
pub use namespace::api::{namespaces_router, NamespacesState};
pub use element::api::{elements_router, ElementsState};
pub use invite::api::{invites_router, InvitesState};
pub use gateway::{gateway_router, GatewayState, Resolution, Resolver};

pub use app::{admin_router, public_gateway_router, AdminSettings};
pub use storage::{InMemoryStore, PostgresStore, Repositories};
