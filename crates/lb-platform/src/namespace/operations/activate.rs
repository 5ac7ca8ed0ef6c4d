//! Activate Namespace Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::{Namespace, NamespaceRepository};

/// Command for activating a namespace.
#[derive(Debug, Clone)]
pub struct ActivateNamespaceCommand {
    pub namespace_id: String,
}

/// Use case for activating a namespace. Activating an active namespace is a no-op.
pub struct ActivateNamespaceUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
}

impl ActivateNamespaceUseCase {
    pub fn new(namespace_repo: Arc<dyn NamespaceRepository>) -> Self {
        Self { namespace_repo }
    }

    pub async fn execute(&self, command: ActivateNamespaceCommand) -> Result<Namespace> {
        let namespace = self
            .namespace_repo
            .set_active(&command.namespace_id, true)
            .await?
            .ok_or_else(|| PlatformError::namespace_not_found(&command.namespace_id))?;

        info!(namespace = %namespace.id, "Namespace activated");
        Ok(namespace)
    }
}
