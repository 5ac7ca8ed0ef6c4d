//! Helpers shared by the element use cases

use lb_common::UNBOUNDED;
use tracing::debug;

use crate::shared::error::{PlatformError, Result};
use crate::shared::token_service::{generate_element_key, MAX_GENERATION_ATTEMPTS};
use crate::shared::validation::normalize_element_key;
use crate::{Element, ElementRepository, Namespace, NamespaceRepository};

/// Quota and validity window requested for a new element. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementLimits {
    pub max_views: Option<i64>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
}

impl ElementLimits {
    pub(crate) fn apply(&self, element: &mut Element) {
        element.max_views = self.max_views.unwrap_or(UNBOUNDED);
        element.valid_from = self.valid_from.unwrap_or(UNBOUNDED);
        element.valid_until = self.valid_until.unwrap_or(UNBOUNDED);
    }
}

/// Load the target namespace. Non-admins may not add to a deactivated one.
pub(crate) async fn writable_namespace(
    namespaces: &dyn NamespaceRepository,
    namespace_id: &str,
    is_admin: bool,
) -> Result<Namespace> {
    let namespace = namespaces
        .find_by_id(namespace_id)
        .await?
        .ok_or_else(|| PlatformError::namespace_not_found(namespace_id))?;

    if !namespace.active && !is_admin {
        return Err(PlatformError::NamespaceDeactivated { id: namespace.id });
    }
    Ok(namespace)
}

/// Insert `element` under the requested key, or under a fresh random key
/// when none was requested. Returns the stored element.
pub(crate) async fn insert_with_key(
    elements: &dyn ElementRepository,
    element: Element,
    requested_key: Option<&str>,
) -> Result<Element> {
    if let Some(raw) = requested_key {
        let element = element.with_key(normalize_element_key(raw)?);
        if !elements.insert(&element).await? {
            return Err(PlatformError::ElementKeyInUse { key: element.key });
        }
        return Ok(element);
    }

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let candidate = element.with_key(generate_element_key());
        if elements.insert(&candidate).await? {
            return Ok(candidate);
        }
        debug!(namespace = %candidate.namespace_id, attempt, "Generated element key taken");
    }

    Err(PlatformError::internal(format!(
        "No free element key in namespace {} after {} attempts",
        element.namespace_id, MAX_GENERATION_ATTEMPTS
    )))
}
