//! Update Invite Use Case

use std::sync::Arc;
use tracing::info;

use super::create::requested_code;
use crate::shared::error::{PlatformError, Result};
use crate::shared::outcome::RenameOutcome;
use crate::{Invite, InviteRepository};

/// Rename and/or change the use limit of an invite. The use count is kept.
#[derive(Debug, Clone, Default)]
pub struct UpdateInviteCommand {
    pub code: String,
    pub new_code: Option<String>,
    pub max_uses: Option<i32>,
}

pub struct UpdateInviteUseCase {
    invite_repo: Arc<dyn InviteRepository>,
}

impl UpdateInviteUseCase {
    pub fn new(invite_repo: Arc<dyn InviteRepository>) -> Self {
        Self { invite_repo }
    }

    pub async fn execute(&self, command: UpdateInviteCommand) -> Result<Invite> {
        let new_code = command
            .new_code
            .as_deref()
            .map(requested_code)
            .transpose()?
            .filter(|new_code| *new_code != command.code);

        let code = match new_code {
            Some(new_code) => match self.invite_repo.rename(&command.code, &new_code).await? {
                RenameOutcome::Renamed(_) => {
                    info!("Invite renamed");
                    new_code
                }
                RenameOutcome::Missing => return Err(PlatformError::invite_not_found(command.code)),
                RenameOutcome::Taken => {
                    return Err(PlatformError::InviteCodeInUse { code: new_code });
                }
            },
            None => command.code,
        };

        let invite = match command.max_uses {
            Some(max_uses) => self.invite_repo.set_max_uses(&code, max_uses).await?,
            None => self.invite_repo.find_by_code(&code).await?,
        }
        .ok_or_else(|| PlatformError::invite_not_found(&code))?;

        info!(max_uses = invite.max_uses, "Invite updated");
        Ok(invite)
    }
}
