//! Namespace Entity

use lb_common::unix_now;

/// An isolated container of elements, guarded by a hashed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Lower-case identifier, immutable once created
    pub id: String,
    /// Argon2id PHC string of the access token
    pub token_hash: String,
    /// Inactive namespaces reject element creation by non-admins
    pub active: bool,
    /// Unix seconds
    pub created: i64,
}

impl Namespace {
    pub fn new(id: impl Into<String>, token_hash: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            token_hash: token_hash.into(),
            active: true,
            created: unix_now(),
        }
    }
}
