//! Core types and roster logic for Courtbook.
//!
//! This crate holds everything that does not touch storage or HTTP: the
//! session and player model, the roster state machine, and the shared error
//! type.
//!
//! # Main types
//!
//! - [`CourtbookError`] — Unified error enum with stable kind codes.
//! - [`CourtbookResult`] — Convenience alias for `Result<T, CourtbookError>`.
//! - [`Session`] — One badminton session with its active list and standby queue.
//! - [`Player`] — A registered player.
//! - [`SessionConfig`] / [`SessionPatch`] — Organizer input for create and update.
//! - [`Placement`] / [`Removal`] — Outcomes of roster operations.

/// Error definitions.
pub mod error;
/// Roster transitions (add, remove, rename, promote, close).
pub mod roster;
/// Session and player model.
pub mod session;

pub use error::{CourtbookError, CourtbookResult};
pub use roster::{Placement, Removal};
pub use session::{
    max_players_for, Player, Session, SessionConfig, SessionPatch, DEFAULT_MAX_STANDBY_PLAYERS,
    MAX_COURTS, MIN_COURTS, PLAYERS_PER_COURT,
};
