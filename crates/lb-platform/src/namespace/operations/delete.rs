//! Delete Namespace Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::{ElementRepository, NamespaceRepository};

/// Command for deleting a namespace and everything in it.
#[derive(Debug, Clone)]
pub struct DeleteNamespaceCommand {
    pub namespace_id: String,
}

/// Use case for deleting a namespace. Elements go first; if that fails the
/// namespace record is left in place.
pub struct DeleteNamespaceUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
    element_repo: Arc<dyn ElementRepository>,
}

impl DeleteNamespaceUseCase {
    pub fn new(
        namespace_repo: Arc<dyn NamespaceRepository>,
        element_repo: Arc<dyn ElementRepository>,
    ) -> Self {
        Self {
            namespace_repo,
            element_repo,
        }
    }

    pub async fn execute(&self, command: DeleteNamespaceCommand) -> Result<()> {
        let id = command.namespace_id;
        if self.namespace_repo.find_by_id(&id).await?.is_none() {
            return Err(PlatformError::namespace_not_found(id));
        }

        let removed = self.element_repo.delete_in_namespace(&id).await?;
        self.namespace_repo.delete(&id).await?;

        info!(namespace = %id, elements = removed, "Namespace deleted");
        Ok(())
    }
}
