//! Element Entity

use lb_common::{time::is_bounded, unix_now, UNBOUNDED};
use serde_json::{Map, Value};

use crate::shared::error::{PlatformError, Result};

pub const PASTE_CONTENT_FIELD: &str = "content";
pub const REDIRECT_TARGET_FIELD: &str = "target_url";

/// Element kind, stored as a small integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Paste,
    Redirect,
    /// Code written by something newer than this build
    Other(i16),
}

impl ElementType {
    pub fn code(self) -> i16 {
        match self {
            ElementType::Paste => 0,
            ElementType::Redirect => 1,
            ElementType::Other(code) => code,
        }
    }

    pub fn from_code(code: i16) -> Self {
        match code {
            0 => ElementType::Paste,
            1 => ElementType::Redirect,
            other => ElementType::Other(other),
        }
    }
}

/// A paste or redirect addressable as `{namespace_id}/{key}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub namespace_id: String,
    pub key: String,
    pub element_type: ElementType,
    /// Never leaves the service
    pub internal_data: Map<String, Value>,
    /// `{content}` for pastes, `{target_url}` for redirects
    pub public_data: Map<String, Value>,
    pub views: i64,
    /// -1 means unlimited
    pub max_views: i64,
    /// Unix seconds, -1 means unbounded
    pub valid_from: i64,
    /// Unix seconds, -1 means unbounded
    pub valid_until: i64,
    pub created: i64,
}

impl Element {
    fn new(
        namespace_id: impl Into<String>,
        key: impl Into<String>,
        element_type: ElementType,
        public_data: Map<String, Value>,
    ) -> Self {
        Self {
            namespace_id: namespace_id.into(),
            key: key.into(),
            element_type,
            internal_data: Map::new(),
            public_data,
            views: 0,
            max_views: UNBOUNDED,
            valid_from: UNBOUNDED,
            valid_until: UNBOUNDED,
            created: unix_now(),
        }
    }

    pub fn paste(
        namespace_id: impl Into<String>,
        key: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut data = Map::new();
        data.insert(PASTE_CONTENT_FIELD.to_string(), Value::String(content.into()));
        Self::new(namespace_id, key, ElementType::Paste, data)
    }

    pub fn redirect(
        namespace_id: impl Into<String>,
        key: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        let mut data = Map::new();
        data.insert(REDIRECT_TARGET_FIELD.to_string(), Value::String(target_url.into()));
        Self::new(namespace_id, key, ElementType::Redirect, data)
    }

    fn public_str(&self, field: &str) -> Option<&str> {
        self.public_data.get(field).and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<&str> {
        self.public_str(PASTE_CONTENT_FIELD)
    }

    pub fn target_url(&self) -> Option<&str> {
        self.public_str(REDIRECT_TARGET_FIELD)
    }

    /// Validity window check. Both edges are tested against the same `now`.
    pub fn check_window(&self, now: i64) -> Result<()> {
        if is_bounded(self.valid_from) && now < self.valid_from {
            return Err(PlatformError::ElementNotYetAvailable);
        }
        if is_bounded(self.valid_until) && now > self.valid_until {
            return Err(PlatformError::ElementNoLongerAvailable);
        }
        Ok(())
    }

    pub fn views_exhausted(&self) -> bool {
        is_bounded(self.max_views) && self.views >= self.max_views
    }

    /// Copy of this element under another key, keeping every other field.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        assert_eq!(ElementType::from_code(0), ElementType::Paste);
        assert_eq!(ElementType::from_code(1), ElementType::Redirect);
        assert_eq!(ElementType::from_code(9), ElementType::Other(9));
        assert_eq!(ElementType::Redirect.code(), 1);
    }

    #[test]
    fn test_constructors_fill_payload() {
        let paste = Element::paste("demo", "abc", "hello");
        assert_eq!(paste.content(), Some("hello"));
        assert_eq!(paste.target_url(), None);
        assert_eq!(paste.max_views, UNBOUNDED);

        let redirect = Element::redirect("demo", "go", "https://example.com");
        assert_eq!(redirect.target_url(), Some("https://example.com"));
        assert_eq!(redirect.element_type, ElementType::Redirect);
    }

    #[test]
    fn test_window_edges() {
        let mut element = Element::paste("demo", "k", "x");
        element.valid_from = 100;
        element.valid_until = 200;

        assert!(matches!(
            element.check_window(99),
            Err(PlatformError::ElementNotYetAvailable)
        ));
        assert!(element.check_window(100).is_ok());
        assert!(element.check_window(200).is_ok());
        assert!(matches!(
            element.check_window(201),
            Err(PlatformError::ElementNoLongerAvailable)
        ));
    }

    #[test]
    fn test_contradictory_window_always_rejects() {
        let mut element = Element::paste("demo", "k", "x");
        element.valid_from = 200;
        element.valid_until = 100;

        for now in [50, 150, 250] {
            assert!(element.check_window(now).is_err());
        }
    }

    #[test]
    fn test_views_exhausted() {
        let mut element = Element::paste("demo", "k", "x");
        element.views = 1_000;
        assert!(!element.views_exhausted());

        element.max_views = 3;
        element.views = 2;
        assert!(!element.views_exhausted());
        element.views = 3;
        assert!(element.views_exhausted());
    }
}
