//! Namespace Operations
//!
//! Use cases for namespace lifecycle following the Command pattern.

pub mod create;
pub mod reset_token;
pub mod activate;
pub mod deactivate;
pub mod delete;

pub use create::{CreateNamespaceCommand, CreateNamespaceResult, CreateNamespaceUseCase};
pub use reset_token::{
    ResetNamespaceTokenCommand, ResetNamespaceTokenResult, ResetNamespaceTokenUseCase,
};
pub use activate::{ActivateNamespaceCommand, ActivateNamespaceUseCase};
pub use deactivate::{DeactivateNamespaceCommand, DeactivateNamespaceUseCase};
pub use delete::{DeleteNamespaceCommand, DeleteNamespaceUseCase};
