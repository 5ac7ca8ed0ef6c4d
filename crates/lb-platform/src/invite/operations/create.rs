//! Create Invite Use Case

use lb_common::UNBOUNDED;
use std::sync::Arc;
use tracing::{debug, info};

use crate::shared::error::{PlatformError, Result};
use crate::shared::token_service::{generate_invite_code, MAX_GENERATION_ATTEMPTS};
use crate::{Invite, InviteRepository};

/// Command for creating an invite.
#[derive(Debug, Clone, Default)]
pub struct CreateInviteCommand {
    /// Generated when absent
    pub code: Option<String>,
    /// Unlimited when absent
    pub max_uses: Option<i32>,
}

pub struct CreateInviteUseCase {
    invite_repo: Arc<dyn InviteRepository>,
}

/// Caller-chosen invite codes must contain something besides whitespace.
pub(crate) fn requested_code(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(PlatformError::BadRequestBody {
            message: "invite code must not be blank".to_string(),
        });
    }
    Ok(raw.to_string())
}

impl CreateInviteUseCase {
    pub fn new(invite_repo: Arc<dyn InviteRepository>) -> Self {
        Self { invite_repo }
    }

    pub async fn execute(&self, command: CreateInviteCommand) -> Result<Invite> {
        let max_uses = command.max_uses.unwrap_or(UNBOUNDED as i32);

        let invite = match command.code {
            Some(code) => {
                let invite = Invite::new(requested_code(&code)?, max_uses);
                if !self.invite_repo.insert(&invite).await? {
                    return Err(PlatformError::InviteCodeInUse { code: invite.code });
                }
                invite
            }
            None => self.insert_generated(max_uses).await?,
        };

        info!(max_uses = invite.max_uses, "Invite created");
        Ok(invite)
    }

    async fn insert_generated(&self, max_uses: i32) -> Result<Invite> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let invite = Invite::new(generate_invite_code(), max_uses);
            if self.invite_repo.insert(&invite).await? {
                return Ok(invite);
            }
            debug!(attempt, "Generated invite code taken");
        }
        Err(PlatformError::internal(format!(
            "No free invite code after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_support::fixture;

    #[tokio::test]
    async fn test_generated_code_is_unlimited_by_default() {
        let fx = fixture();
        let use_case = CreateInviteUseCase::new(fx.repos.invites.clone());

        let invite = use_case.execute(CreateInviteCommand::default()).await.unwrap();
        assert_eq!(invite.code.len(), 32);
        assert_eq!(invite.max_uses, -1);
        assert_eq!(invite.uses, 0);
    }

    #[tokio::test]
    async fn test_requested_code_conflicts() {
        let fx = fixture();
        let use_case = CreateInviteUseCase::new(fx.repos.invites.clone());
        let command = CreateInviteCommand {
            code: Some("friends".to_string()),
            max_uses: Some(3),
        };

        let invite = use_case.execute(command.clone()).await.unwrap();
        assert_eq!(invite.code, "friends");
        assert_eq!(invite.max_uses, 3);

        let err = use_case.execute(command).await.unwrap_err();
        assert!(matches!(err, PlatformError::InviteCodeInUse { .. }));
    }

    #[tokio::test]
    async fn test_blank_code_rejected() {
        let fx = fixture();
        let use_case = CreateInviteUseCase::new(fx.repos.invites.clone());
        let err = use_case
            .execute(CreateInviteCommand {
                code: Some("   ".to_string()),
                max_uses: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::BadRequestBody { .. }));
    }
}
