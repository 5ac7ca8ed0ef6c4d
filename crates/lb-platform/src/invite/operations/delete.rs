//! Delete Invite Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::InviteRepository;

#[derive(Debug, Clone)]
pub struct DeleteInviteCommand {
    pub code: String,
}

pub struct DeleteInviteUseCase {
    invite_repo: Arc<dyn InviteRepository>,
}

impl DeleteInviteUseCase {
    pub fn new(invite_repo: Arc<dyn InviteRepository>) -> Self {
        Self { invite_repo }
    }

    pub async fn execute(&self, command: DeleteInviteCommand) -> Result<()> {
        if !self.invite_repo.delete(&command.code).await? {
            return Err(PlatformError::invite_not_found(command.code));
        }
        info!("Invite deleted");
        Ok(())
    }
}
