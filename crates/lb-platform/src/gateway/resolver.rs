//! Gateway Resolver
//!
//! Turns `{namespace_id}/{element_key}` into something servable:
//! namespace -> element -> window -> quota -> record view -> dispatch.
//! The view is counted before the response is written, so a view may be
//! counted for a client that never receives the body.

use lb_common::unix_now;
use std::sync::Arc;
use tracing::debug;

use crate::element::ElementType;
use crate::shared::error::{PlatformError, Result};
use crate::{ElementRepository, NamespaceRepository};

/// Key used when the request names only a namespace.
pub const DEFAULT_ELEMENT_KEY: &str = "@";

/// What the gateway serves for a resolved element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Plain-text body
    Paste(String),
    /// Temporary redirect target
    Redirect(String),
}

#[derive(Clone)]
pub struct Resolver {
    namespaces: Arc<dyn NamespaceRepository>,
    elements: Arc<dyn ElementRepository>,
}

impl Resolver {
    pub fn new(
        namespaces: Arc<dyn NamespaceRepository>,
        elements: Arc<dyn ElementRepository>,
    ) -> Self {
        Self {
            namespaces,
            elements,
        }
    }

    pub async fn resolve(&self, namespace_id: &str, element_key: Option<&str>) -> Result<Resolution> {
        self.resolve_at(namespace_id, element_key, unix_now()).await
    }

    /// Resolve against a fixed `now` (unix seconds).
    pub async fn resolve_at(
        &self,
        namespace_id: &str,
        element_key: Option<&str>,
        now: i64,
    ) -> Result<Resolution> {
        let namespace_id = namespace_id.to_lowercase();
        let key = element_key
            .filter(|key| !key.is_empty())
            .unwrap_or(DEFAULT_ELEMENT_KEY)
            .to_lowercase();

        if self.namespaces.find_by_id(&namespace_id).await?.is_none() {
            return Err(PlatformError::namespace_not_found(namespace_id));
        }

        let element = self
            .elements
            .find(&namespace_id, &key)
            .await?
            .ok_or_else(|| PlatformError::element_not_found(&namespace_id, &key))?;

        element.check_window(now)?;
        if element.views_exhausted() {
            return Err(PlatformError::ElementViewLimitReached);
        }

        // Lost a race for the last view, or deleted in between
        let element = self
            .elements
            .record_view(&namespace_id, &key)
            .await?
            .ok_or(PlatformError::ElementViewLimitReached)?;

        debug!(namespace = %namespace_id, key = %key, views = element.views, "Element resolved");

        let missing = |field: &str| PlatformError::UnsupportedElement {
            reason: format!("{:?} element without {}", element.element_type, field),
        };
        match element.element_type {
            ElementType::Paste => element
                .content()
                .map(|content| Resolution::Paste(content.to_string()))
                .ok_or_else(|| missing("content")),
            ElementType::Redirect => element
                .target_url()
                .map(|url| Resolution::Redirect(url.to_string()))
                .ok_or_else(|| missing("target_url")),
            ElementType::Other(code) => Err(PlatformError::UnsupportedElement {
                reason: format!("unknown element type {}", code),
            }),
        }
    }
}
