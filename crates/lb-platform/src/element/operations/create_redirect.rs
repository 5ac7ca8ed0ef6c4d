//! Create Redirect Element Use Case

use std::sync::Arc;
use tracing::info;
use url::Url;

use super::common::{insert_with_key, writable_namespace, ElementLimits};
use crate::shared::error::{PlatformError, Result};
use crate::{Element, ElementRepository, NamespaceRepository};

/// Command for creating a redirect.
#[derive(Debug, Clone)]
pub struct CreateRedirectElementCommand {
    pub namespace_id: String,
    pub key: Option<String>,
    pub target_url: String,
    pub limits: ElementLimits,
    pub is_admin: bool,
}

/// Absolute http(s) URL with a host, in its normalized form.
pub fn parse_target_url(raw: &str) -> Result<Url> {
    let invalid = || PlatformError::InvalidTargetUrl {
        url: raw.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

pub struct CreateRedirectElementUseCase {
    namespace_repo: Arc<dyn NamespaceRepository>,
    element_repo: Arc<dyn ElementRepository>,
}

impl CreateRedirectElementUseCase {
    pub fn new(
        namespace_repo: Arc<dyn NamespaceRepository>,
        element_repo: Arc<dyn ElementRepository>,
    ) -> Self {
        Self {
            namespace_repo,
            element_repo,
        }
    }

    pub async fn execute(&self, command: CreateRedirectElementCommand) -> Result<Element> {
        let namespace = writable_namespace(
            self.namespace_repo.as_ref(),
            &command.namespace_id,
            command.is_admin,
        )
        .await?;

        let target = parse_target_url(&command.target_url)?;

        let mut element = Element::redirect(namespace.id, "", target.as_str());
        command.limits.apply(&mut element);

        let element =
            insert_with_key(self.element_repo.as_ref(), element, command.key.as_deref()).await?;

        info!(namespace = %element.namespace_id, key = %element.key, "Redirect created");
        Ok(element)
    }
}
