use crate::error::{CourtbookError, CourtbookResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Regular slots contributed by each booked court.
pub const PLAYERS_PER_COURT: u32 = 6;
/// Fewest courts a session may book.
pub const MIN_COURTS: u32 = 1;
/// Most courts a session may book.
pub const MAX_COURTS: u32 = 10;
/// Standby queue length used when the organizer does not pick one.
pub const DEFAULT_MAX_STANDBY_PLAYERS: u32 = 4;

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable identifier, assigned when the player registers.
    pub id: Uuid,
    /// Trimmed, non-empty display name.
    pub name: String,
    /// Registration time.
    pub joined_at: DateTime<Utc>,
}

impl Player {
    /// Creates a player with a fresh id, stamped now.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            joined_at: Utc::now(),
        }
    }
}

/// One scheduled badminton session with its roster and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session id.
    pub id: Uuid,
    /// Number of booked courts, within `MIN_COURTS..=MAX_COURTS`.
    pub courts: u32,
    /// Regular slots; derived from `courts` on every write that carries it.
    pub max_players: u32,
    /// Length limit of the standby queue.
    pub max_standby_players: u32,
    /// Free-form date label, e.g. `2026-10-24`.
    pub date: String,
    /// Free-form time label, e.g. `19:00-21:00`.
    pub time: String,
    /// Venue name or address.
    pub location: String,
    /// Optional link to the venue on a map.
    #[serde(default, alias = "googleMapsLink", skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    /// Whether this is the current session.
    pub is_active: bool,
    /// Active roster in registration order.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Standby queue, head first.
    #[serde(default)]
    pub standby_players: Vec<Player>,
    /// Creation time; the newest active session is the current one.
    pub created_at: DateTime<Utc>,
    /// Time of the last successful write.
    pub updated_at: DateTime<Utc>,
}

/// Organizer input for a new session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Courts to book.
    pub courts: u32,
    /// Date label.
    pub date: String,
    /// Time label.
    pub time: String,
    /// Venue.
    pub location: String,
    /// Optional map link.
    #[serde(default, alias = "googleMapsLink")]
    pub map_link: Option<String>,
    /// Standby queue length, [`DEFAULT_MAX_STANDBY_PLAYERS`] when absent.
    #[serde(default)]
    pub max_standby_players: Option<u32>,
}

impl Session {
    /// Builds a new active session with empty rosters from validated config.
    pub fn new(config: SessionConfig) -> CourtbookResult<Self> {
        validate_courts(config.courts)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            courts: config.courts,
            max_players: max_players_for(config.courts),
            max_standby_players: config
                .max_standby_players
                .unwrap_or(DEFAULT_MAX_STANDBY_PLAYERS),
            date: required_text("date", &config.date)?,
            time: required_text("time", &config.time)?,
            location: required_text("location", &config.location)?,
            map_link: optional_text(config.map_link.as_deref()),
            is_active: true,
            players: Vec::new(),
            standby_players: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Combined active + standby capacity.
    pub fn total_capacity(&self) -> usize {
        self.max_players as usize + self.max_standby_players as usize
    }

    /// Players across both lists.
    pub fn player_count(&self) -> usize {
        self.players.len() + self.standby_players.len()
    }

    /// Whether every regular slot is taken.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    /// Looks a player up in either list.
    pub fn find_player(&self, id: Uuid) -> Option<&Player> {
        self.players
            .iter()
            .chain(self.standby_players.iter())
            .find(|p| p.id == id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial settings update.
///
/// Roster fields and `isActive` are not part of the patch; unknown JSON keys
/// are ignored so a client may send back a whole session object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    /// New court count; also recomputes `maxPlayers`.
    #[serde(default)]
    pub courts: Option<u32>,
    /// Explicit regular-slot count, ignored when `courts` is present.
    #[serde(default)]
    pub max_players: Option<u32>,
    /// New standby queue length.
    #[serde(default)]
    pub max_standby_players: Option<u32>,
    /// New date label.
    #[serde(default)]
    pub date: Option<String>,
    /// New time label.
    #[serde(default)]
    pub time: Option<String>,
    /// New venue.
    #[serde(default)]
    pub location: Option<String>,
    /// New map link; an empty string clears it.
    #[serde(default, alias = "googleMapsLink")]
    pub map_link: Option<String>,
}

impl SessionPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.courts.is_none()
            && self.max_players.is_none()
            && self.max_standby_players.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.map_link.is_none()
    }

    /// Validates the patch against `session` and applies it.
    ///
    /// Nothing is written unless every field validates. When `courts` is
    /// present `maxPlayers` is recomputed from it, overriding `max_players`.
    pub fn apply_to(&self, session: &mut Session) -> CourtbookResult<()> {
        let courts = match self.courts {
            Some(courts) => {
                validate_courts(courts)?;
                courts
            }
            None => session.courts,
        };
        let max_players = match (self.courts, self.max_players) {
            (Some(courts), _) => max_players_for(courts),
            (None, Some(max)) if max == 0 => {
                return Err(CourtbookError::Validation(
                    "maxPlayers must be at least 1".to_string(),
                ))
            }
            (None, Some(max)) => max,
            (None, None) => session.max_players,
        };
        let max_standby_players = self
            .max_standby_players
            .unwrap_or(session.max_standby_players);

        // Only a lowered limit is checked; promote can leave the active list
        // above an unchanged `maxPlayers`.
        if max_players < session.max_players && session.players.len() > max_players as usize {
            return Err(CourtbookError::Validation(format!(
                "maxPlayers {max_players} is below the {} registered players",
                session.players.len()
            )));
        }
        if max_standby_players < session.max_standby_players
            && session.standby_players.len() > max_standby_players as usize
        {
            return Err(CourtbookError::Validation(format!(
                "maxStandbyPlayers {max_standby_players} is below the {} standby players",
                session.standby_players.len()
            )));
        }

        let date = self
            .date
            .as_deref()
            .map(|d| required_text("date", d))
            .transpose()?;
        let time = self
            .time
            .as_deref()
            .map(|t| required_text("time", t))
            .transpose()?;
        let location = self
            .location
            .as_deref()
            .map(|l| required_text("location", l))
            .transpose()?;

        session.courts = courts;
        session.max_players = max_players;
        session.max_standby_players = max_standby_players;
        if let Some(date) = date {
            session.date = date;
        }
        if let Some(time) = time {
            session.time = time;
        }
        if let Some(location) = location {
            session.location = location;
        }
        if let Some(link) = self.map_link.as_deref() {
            session.map_link = optional_text(Some(link));
        }
        session.touch();
        Ok(())
    }
}

/// Regular slots for `courts` courts.
pub fn max_players_for(courts: u32) -> u32 {
    courts * PLAYERS_PER_COURT
}

fn validate_courts(courts: u32) -> CourtbookResult<()> {
    if (MIN_COURTS..=MAX_COURTS).contains(&courts) {
        Ok(())
    } else {
        Err(CourtbookError::Validation(format!(
            "courts must be between {MIN_COURTS} and {MAX_COURTS}, got {courts}"
        )))
    }
}

fn required_text(field: &str, value: &str) -> CourtbookResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CourtbookError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
