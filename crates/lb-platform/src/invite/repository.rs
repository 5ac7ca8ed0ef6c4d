//! Invite Repository

use async_trait::async_trait;

use crate::shared::error::Result;
use crate::shared::outcome::RenameOutcome;
use crate::Invite;

/// Persistence contract for invites.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>>;

    /// Page ordered by creation time, then code.
    async fn find_all(&self, limit: u32, skip: u32) -> Result<Vec<Invite>>;

    async fn count(&self) -> Result<u64>;

    /// Insert only if the code is free. Returns `false` when it was taken.
    async fn insert(&self, invite: &Invite) -> Result<bool>;

    /// Change the use limit, leaving the use count alone. `None` when the code is unknown.
    async fn set_max_uses(&self, code: &str, max_uses: i32) -> Result<Option<Invite>>;

    /// Move an invite to `new_code`, keeping its use count and limit.
    async fn rename(&self, code: &str, new_code: &str) -> Result<RenameOutcome<Invite>>;

    /// Atomically count one use while the invite still allows it.
    /// `None` when the code is unknown or exhausted.
    async fn redeem(&self, code: &str) -> Result<Option<Invite>>;

    async fn delete(&self, code: &str) -> Result<bool>;
}
