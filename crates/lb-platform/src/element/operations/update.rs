//! Update Element Use Case

use std::sync::Arc;
use tracing::info;

use crate::shared::error::{PlatformError, Result};
use crate::shared::validation::normalize_element_key;
use crate::shared::outcome::RenameOutcome;
use crate::{Element, ElementPatch, ElementRepository};

/// Partial update of an element. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateElementCommand {
    pub namespace_id: String,
    pub key: String,
    pub new_key: Option<String>,
    pub max_views: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

pub struct UpdateElementUseCase {
    element_repo: Arc<dyn ElementRepository>,
}

impl UpdateElementUseCase {
    pub fn new(element_repo: Arc<dyn ElementRepository>) -> Self {
        Self { element_repo }
    }

    /// Rename first (when asked), then apply the limits in place. Neither
    /// step reads the element beforehand, so concurrent views are kept and a
    /// concurrently deleted element stays deleted.
    pub async fn execute(&self, command: UpdateElementCommand) -> Result<Element> {
        let namespace_id = command.namespace_id;
        let key = command.key.to_lowercase();
        let new_key = command
            .new_key
            .as_deref()
            .map(normalize_element_key)
            .transpose()?
            .filter(|new_key| *new_key != key);

        let key = match new_key {
            Some(new_key) => match self.element_repo.rename(&namespace_id, &key, &new_key).await? {
                RenameOutcome::Renamed(_) => {
                    info!(namespace = %namespace_id, from = %key, to = %new_key, "Element renamed");
                    new_key
                }
                RenameOutcome::Missing => {
                    return Err(PlatformError::element_not_found(namespace_id, key));
                }
                RenameOutcome::Taken => {
                    return Err(PlatformError::ElementKeyInUse { key: new_key });
                }
            },
            None => key,
        };

        let patch = ElementPatch {
            max_views: command.max_views,
            valid_from: command.valid_from,
            valid_until: command.valid_until,
        };
        let element = self
            .element_repo
            .update_limits(&namespace_id, &key, &patch)
            .await?
            .ok_or_else(|| PlatformError::element_not_found(&namespace_id, &key))?;

        info!(namespace = %element.namespace_id, key = %element.key, "Element updated");
        Ok(element)
    }
}
