//! Per-client rate limiting for the admin API

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::shared::error::PlatformError;

/// Checks between sweeps of idle client buckets.
pub const SWEEP_INTERVAL: u64 = 1024;

/// Token bucket per client IP. Buckets of clients that have fully
/// recovered are dropped every `SWEEP_INTERVAL` checks.
pub struct IpRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    checks: AtomicU64,
}

impl IpRateLimiter {
    fn new(requests_per_minute: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(requests_per_minute)),
            checks: AtomicU64::new(0),
        }
    }

    /// `true` when `ip` may proceed.
    pub fn check(&self, ip: IpAddr) -> bool {
        let allowed = self.limiter.check_key(&ip).is_ok();

        if (self.checks.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            self.sweep();
        }
        allowed
    }

    /// Drop buckets that no longer hold any state worth keeping.
    pub fn sweep(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(clients = self.limiter.len(), "Rate limiter swept");
    }

    /// Number of client buckets currently held.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Limiter allowing `requests_per_minute` per client IP.
/// `None` when the limit is 0 (disabled).
pub fn ip_rate_limiter(requests_per_minute: u32) -> Option<Arc<IpRateLimiter>> {
    NonZeroU32::new(requests_per_minute).map(|rpm| Arc::new(IpRateLimiter::new(rpm)))
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// `axum::middleware::from_fn_with_state` handler.
pub async fn rate_limit(
    State(limiter): State<Arc<IpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);
    if !limiter.check(ip) {
        debug!(client = %ip, "Rate limit exceeded");
        return PlatformError::RateLimited.into_response();
    }
    next.run(request).await
}
