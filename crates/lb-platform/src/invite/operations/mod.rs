//! Invite Operations
//!
//! Redemption happens inside namespace creation, see
//! `namespace::operations::CreateNamespaceUseCase`.

pub mod create;
pub mod update;
pub mod delete;

pub use create::{CreateInviteCommand, CreateInviteUseCase};
pub use update::{UpdateInviteCommand, UpdateInviteUseCase};
pub use delete::{DeleteInviteCommand, DeleteInviteUseCase};
