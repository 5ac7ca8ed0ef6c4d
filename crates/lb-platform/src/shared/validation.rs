//! Identifier validation

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::error::{PlatformError, Result};

pub const NAMESPACE_ID_MIN_LENGTH: usize = 1;
pub const NAMESPACE_ID_MAX_LENGTH: usize = 32;
pub const NAMESPACE_ID_ALLOWED_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz0123456789_";

pub const ELEMENT_KEY_MAX_LENGTH: usize = 64;

/// Rule a namespace ID failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NamespaceIdViolation {
    MinimumLength,
    MaximumLength,
    Characters,
}

/// Collect every rule `id` breaks. Length is counted in characters, and at
/// most one length violation is reported.
pub fn validate_namespace_id(id: &str) -> Vec<NamespaceIdViolation> {
    let mut violations = Vec::new();

    let length = id.chars().count();
    if length < NAMESPACE_ID_MIN_LENGTH {
        violations.push(NamespaceIdViolation::MinimumLength);
    } else if length > NAMESPACE_ID_MAX_LENGTH {
        violations.push(NamespaceIdViolation::MaximumLength);
    }

    if id
        .chars()
        .any(|c| !NAMESPACE_ID_ALLOWED_CHARACTERS.contains(c))
    {
        violations.push(NamespaceIdViolation::Characters);
    }

    violations
}

/// Normalize a caller-supplied element key (trim + lowercase) and check it
/// can be addressed through the gateway.
pub fn normalize_element_key(raw: &str) -> Result<String> {
    let key = raw.trim().to_lowercase();
    let length = key.chars().count();

    let illegal = length == 0
        || length > ELEMENT_KEY_MAX_LENGTH
        || key
            .chars()
            .any(|c| c == '/' || c.is_whitespace() || c.is_control());

    if illegal {
        return Err(PlatformError::IllegalElementKey { key: raw.to_string() });
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_namespace_ids() {
        for id in ["a", "demo", "my_space_01", &"x".repeat(32)] {
            assert!(validate_namespace_id(id).is_empty(), "{id} should be valid");
        }
    }

    #[test]
    fn test_length_violations_are_exclusive() {
        assert_eq!(
            validate_namespace_id(""),
            vec![NamespaceIdViolation::MinimumLength]
        );
        assert_eq!(
            validate_namespace_id(&"a".repeat(33)),
            vec![NamespaceIdViolation::MaximumLength]
        );
    }

    #[test]
    fn test_character_violation_reported_once() {
        assert_eq!(
            validate_namespace_id("Bad-Name!"),
            vec![NamespaceIdViolation::Characters]
        );
        assert_eq!(
            validate_namespace_id(&"Ä".repeat(40)),
            vec![
                NamespaceIdViolation::MaximumLength,
                NamespaceIdViolation::Characters
            ]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 20 two-byte characters: too many bytes but within the rune limit
        let violations = validate_namespace_id(&"é".repeat(20));
        assert_eq!(violations, vec![NamespaceIdViolation::Characters]);
    }

    #[test]
    fn test_element_key_normalization() {
        assert_eq!(normalize_element_key("  MyKey ").unwrap(), "mykey");
        assert_eq!(normalize_element_key("@").unwrap(), "@");
    }

    #[test]
    fn test_illegal_element_keys() {
        for key in ["", "   ", "a/b", "two words", "tab\tkey", &"k".repeat(65)] {
            assert!(
                matches!(
                    normalize_element_key(key),
                    Err(PlatformError::IllegalElementKey { .. })
                ),
                "{key:?} should be rejected"
            );
        }
    }
}
