//! Gateway
//!
//! Public resolution of elements. No authentication.

pub mod resolver;
pub mod api;

pub use resolver::{Resolution, Resolver, DEFAULT_ELEMENT_KEY};
pub use api::{gateway_router, GatewayState};
