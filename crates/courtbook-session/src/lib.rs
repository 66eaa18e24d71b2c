//! Session persistence and the roster service for Courtbook.
//!
//! [`SessionStore`] is the storage seam; [`SessionService`] wraps it with
//! validation, the one-active-session rule, and serialized writes.

/// Roster and settings operations over a store.
pub mod service;
/// Storage backends.
pub mod store;

pub use service::SessionService;
pub use store::{FileSessionStore, InMemorySessionStore, SessionStore};
