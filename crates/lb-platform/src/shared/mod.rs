//! Shared infrastructure: errors, authorization, pagination, tokens.

pub mod error;
pub mod api_common;
pub mod middleware;
pub mod rate_limit;
pub mod token_service;
pub mod validation;
pub mod info_api;
pub mod outcome;

#[cfg(test)]
pub(crate) mod test_support;
