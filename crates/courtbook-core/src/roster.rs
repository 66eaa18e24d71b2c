//! Roster transitions over a session's active list and standby queue.
//!
//! Every operation validates first and mutates last, so an `Err` leaves the
//! session exactly as it was.

use crate::error::{CourtbookError, CourtbookResult};
use crate::session::{Player, Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which list a newly added player landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// One of the regular slots.
    Active,
    /// Tail of the standby queue.
    Standby,
}

/// Outcome of [`Session::remove_player`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The player that left.
    pub removed: Player,
    /// Standby head moved into the freed slot, if any.
    pub promoted: Option<Player>,
}

impl Session {
    /// Registers `name`, filling a regular slot first and the standby queue after.
    pub fn add_player(&mut self, name: &str) -> CourtbookResult<(Player, Placement)> {
        let name = normalize_name(name)?;
        if self.name_taken(&name, None) {
            return Err(CourtbookError::DuplicateName(name));
        }
        if self.player_count() >= self.total_capacity() {
            return Err(CourtbookError::CapacityExceeded {
                capacity: self.total_capacity(),
            });
        }

        let player = Player::new(name);
        let placement = if self.is_full() {
            self.standby_players.push(player.clone());
            Placement::Standby
        } else {
            self.players.push(player.clone());
            Placement::Active
        };
        self.touch();
        Ok((player, placement))
    }

    /// Removes a player from whichever list holds it.
    ///
    /// Removing an active player promotes the standby head (FIFO) to the tail
    /// of the active list. Removing a standby player promotes nobody.
    pub fn remove_player(&mut self, id: Uuid) -> CourtbookResult<Removal> {
        if let Some(idx) = self.players.iter().position(|p| p.id == id) {
            let removed = self.players.remove(idx);
            let promoted = if self.standby_players.is_empty() {
                None
            } else {
                let head = self.standby_players.remove(0);
                self.players.push(head.clone());
                Some(head)
            };
            self.touch();
            return Ok(Removal { removed, promoted });
        }

        let idx = self
            .standby_players
            .iter()
            .position(|p| p.id == id)
            .ok_or(CourtbookError::PlayerNotFound(id))?;
        let removed = self.standby_players.remove(idx);
        self.touch();
        Ok(Removal {
            removed,
            promoted: None,
        })
    }

    /// Renames a player in place; list and position are unchanged.
    pub fn rename_player(&mut self, id: Uuid, new_name: &str) -> CourtbookResult<()> {
        if self.find_player(id).is_none() {
            return Err(CourtbookError::PlayerNotFound(id));
        }
        let new_name = normalize_name(new_name)?;
        if self.name_taken(&new_name, Some(id)) {
            return Err(CourtbookError::DuplicateName(new_name));
        }

        if let Some(player) = self
            .players
            .iter_mut()
            .chain(self.standby_players.iter_mut())
            .find(|p| p.id == id)
        {
            player.name = new_name;
        }
        self.touch();
        Ok(())
    }

    /// Moves a standby player to the tail of the active list.
    ///
    /// This is an organizer override and does not check `max_players`.
    pub fn promote_player(&mut self, id: Uuid) -> CourtbookResult<Player> {
        let idx = self
            .standby_players
            .iter()
            .position(|p| p.id == id)
            .ok_or(CourtbookError::PlayerNotFound(id))?;
        let player = self.standby_players.remove(idx);
        self.players.push(player.clone());
        self.touch();
        Ok(player)
    }

    /// Deactivates the session and clears both lists. Idempotent.
    pub fn close(&mut self) {
        self.is_active = false;
        self.players.clear();
        self.standby_players.clear();
        self.touch();
    }

    /// Case-insensitive name lookup across both lists, optionally skipping one id.
    pub fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        let wanted = name.to_lowercase();
        self.players
            .iter()
            .chain(self.standby_players.iter())
            .filter(|p| Some(p.id) != except)
            .any(|p| p.name.to_lowercase() == wanted)
    }
}

fn normalize_name(name: &str) -> CourtbookResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CourtbookError::Validation(
            "Player name is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
