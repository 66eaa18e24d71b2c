//! Security primitives for Courtbook.
//!
//! # Main types
//!
//! - [`RateLimiter`] — Per-address token-bucket throttle with idle pruning.
//! - [`SharedSecret`] — The organizer password, compared in constant time.

/// Token-bucket rate limiting.
pub mod rate_limit;
/// Shared-secret verification.
pub mod secret;

pub use rate_limit::{RateLimiter, DEFAULT_IDLE_TIMEOUT};
pub use secret::{constant_time_eq, SharedSecret};
