//! Create Namespace Use Case

use std::sync::Arc;
use tracing::{info, warn};

use crate::shared::error::{PlatformError, Result};
use crate::shared::token_service::{generate_token, TokenService};
use crate::shared::validation::validate_namespace_id;
use crate::{InviteRepository, Namespace, NamespaceRepository};

/// Command for creating a namespace.
#[derive(Debug, Clone)]
pub struct CreateNamespaceCommand {
    pub id: String,
    /// Required from non-admins while invites are enabled
    pub invite_code: Option<String>,
    pub is_admin: bool,
}

/// The stored namespace plus its plaintext token, returned exactly once.
#[derive(Debug, Clone)]
pub struct CreateNamespaceResult {
    pub namespace: Namespace,
    pub token: String,
}

/// Use case for creating a namespace, optionally gated by an invite.
pub struct CreateNamespaceUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
    invite_repo: Arc<dyn InviteRepository>,
    token_service: Arc<TokenService>,
    invites_enabled: bool,
}

impl CreateNamespaceUseCase {
    pub fn new(
        namespace_repo: Arc<dyn NamespaceRepository>,
        invite_repo: Arc<dyn InviteRepository>,
        token_service: Arc<TokenService>,
        invites_enabled: bool,
    ) -> Self {
        Self {
            namespace_repo,
            invite_repo,
            token_service,
            invites_enabled,
        }
    }

    pub async fn execute(&self, command: CreateNamespaceCommand) -> Result<CreateNamespaceResult> {
        let violations = validate_namespace_id(&command.id);
        if !violations.is_empty() {
            return Err(PlatformError::IllegalNamespaceId { violations });
        }

        // Invite is checked up front but only redeemed once the ID is secured
        let invite_code = if self.invites_enabled && !command.is_admin {
            let code = command
                .invite_code
                .ok_or(PlatformError::InvalidInviteCode)?;
            match self.invite_repo.find_by_code(&code).await? {
                Some(invite) if invite.is_redeemable() => Some(code),
                _ => return Err(PlatformError::InvalidInviteCode),
            }
        } else {
            None
        };

        let token = generate_token();
        let namespace = Namespace::new(command.id, self.token_service.hash(&token)?);

        if !self.namespace_repo.insert(&namespace).await? {
            return Err(PlatformError::NamespaceIdInUse { id: namespace.id });
        }

        if let Some(code) = invite_code {
            if self.invite_repo.redeem(&code).await?.is_none() {
                warn!(namespace = %namespace.id, "Invite exhausted concurrently, rolling back namespace");
                self.namespace_repo.delete(&namespace.id).await?;
                return Err(PlatformError::InvalidInviteCode);
            }
        }

        info!(namespace = %namespace.id, "Namespace created");
        Ok(CreateNamespaceResult { namespace, token })
    }
}
