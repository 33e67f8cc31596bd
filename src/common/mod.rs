//! Utilities shared by exchange clients
//!
//! - Request throttle that spaces calls by the exchange's rate limit

pub mod throttle;

pub use throttle::{Throttle, ThrottleConfig};
