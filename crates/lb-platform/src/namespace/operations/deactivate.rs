//! Deactivate Namespace Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::{Namespace, NamespaceRepository};

/// Command for deactivating a namespace.
#[derive(Debug, Clone)]
pub struct DeactivateNamespaceCommand {
    pub namespace_id: String,
}

/// Use case for deactivating a namespace.
///
/// Existing elements stay resolvable; only non-admin element creation is blocked.
pub struct DeactivateNamespaceUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
}

impl DeactivateNamespaceUseCase {
    pub fn new(namespace_repo: Arc<dyn NamespaceRepository>) -> Self {
        Self { namespace_repo }
    }

    pub async fn execute(&self, command: DeactivateNamespaceCommand) -> Result<Namespace> {
        let namespace = self
            .namespace_repo
            .set_active(&command.namespace_id, false)
            .await?
            .ok_or_else(|| PlatformError::namespace_not_found(&command.namespace_id))?;

        info!(namespace = %namespace.id, "Namespace deactivated");
        Ok(namespace)
    }
}
