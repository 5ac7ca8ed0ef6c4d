//! Reset Namespace Token Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::shared::token_service::{generate_token, TokenService};
use crate::{Namespace, NamespaceRepository};

/// Command for replacing a namespace's access token.
#[derive(Debug, Clone)]
pub struct ResetNamespaceTokenCommand {
    pub namespace_id: String,
}

#[derive(Debug, Clone)]
pub struct ResetNamespaceTokenResult {
    pub namespace: Namespace,
    /// New plaintext token (shown only once)
    pub token: String,
}

pub struct ResetNamespaceTokenUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
    token_service: Arc<TokenService>,
}

impl ResetNamespaceTokenUseCase {
    pub fn new(
        namespace_repo: Arc<dyn NamespaceRepository>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            namespace_repo,
            token_service,
        }
    }

    pub async fn execute(
        &self,
        command: ResetNamespaceTokenCommand,
    ) -> Result<ResetNamespaceTokenResult> {
        let token = generate_token();
        let token_hash = self.token_service.hash(&token)?;
        let namespace = self
            .namespace_repo
            .set_token_hash(&command.namespace_id, &token_hash)
            .await?
            .ok_or_else(|| PlatformError::namespace_not_found(&command.namespace_id))?;

        info!(namespace = %namespace.id, "Namespace token reset");
        Ok(ResetNamespaceTokenResult { namespace, token })
    }
}
