//! Create Paste Element Use Case

use std::sync::Arc;
use tracing::info;

use super::common::{insert_with_key, writable_namespace, ElementLimits};
use crate::shared::error::{PlatformError, Result};
use crate::{Element, ElementRepository, NamespaceRepository};

/// Command for creating a paste.
#[derive(Debug, Clone)]
pub struct CreatePasteElementCommand {
    pub namespace_id: String,
    pub key: Option<String>,
    pub content: String,
    pub limits: ElementLimits,
    pub is_admin: bool,
}

pub struct CreatePasteElementUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
    element_repo: Arc<dyn ElementRepository>,
}

impl CreatePasteElementUseCase {
    pub fn new(
        namespace_repo: Arc<dyn NamespaceRepository>,
        element_repo: Arc<dyn ElementRepository>,
    ) -> Self {
        Self {
            namespace_repo,
            element_repo,
        }
    }

    pub async fn execute(&self, command: CreatePasteElementCommand) -> Result<Element> {
        let namespace = writable_namespace(
            self.namespace_repo.as_ref(),
            &command.namespace_id,
            command.is_admin,
        )
        .await?;

        if command.content.trim().is_empty() {
            return Err(PlatformError::EmptyPasteContent);
        }

        let mut element = Element::paste(namespace.id, "", command.content);
        command.limits.apply(&mut element);

        let element =
            insert_with_key(self.element_repo.as_ref(), element, command.key.as_deref()).await?;

        info!(namespace = %element.namespace_id, key = %element.key, "Paste created");
        Ok(element)
    }
}
