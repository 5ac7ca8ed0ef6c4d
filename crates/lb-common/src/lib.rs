//! Linkbox Common
//!
//! Infrastructure shared by every linkbox crate:
//! - `logging` - tracing subscriber bootstrap
//! - `time` - unix timestamp helpers used for entity timestamps

pub mod logging;
pub mod time;

pub use logging::init_logging;
pub use time::{unix_now, UNBOUNDED};
