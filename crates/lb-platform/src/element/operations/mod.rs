//! Element Operations

pub mod common;
pub mod create_paste;
pub mod create_redirect;
pub mod update;
pub mod delete;

pub use common::ElementLimits;
pub use create_paste::{CreatePasteElementCommand, CreatePasteElementUseCase};
pub use create_redirect::{
    parse_target_url, CreateRedirectElementCommand, CreateRedirectElementUseCase,
};
pub use update::{UpdateElementCommand, UpdateElementUseCase};
pub use delete::{DeleteElementCommand, DeleteElementUseCase};
