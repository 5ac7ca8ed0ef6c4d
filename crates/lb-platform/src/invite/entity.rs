//! Invite Entity

use lb_common::{time::is_bounded, unix_now};

/// Code gating public namespace creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub code: String,
    pub uses: i32,
    /// -1 means unlimited
    pub max_uses: i32,
    /// Unix seconds
    pub created: i64,
}

impl Invite {
    pub fn new(code: impl Into<String>, max_uses: i32) -> Self {
        Self {
            code: code.into(),
            uses: 0,
            max_uses,
            created: unix_now(),
        }
    }

    /// Whether one more namespace may be created with this code.
    pub fn is_redeemable(&self) -> bool {
        !is_bounded(i64::from(self.max_uses)) || self.uses < self.max_uses
    }
}
