use crate::store::SessionStore;
use courtbook_core::{
    CourtbookError, CourtbookResult, Placement, Session, SessionConfig, SessionPatch,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Session lifecycle and roster operations on top of a [`SessionStore`].
///
/// Every mutation runs read-compute-persist under one write lock, so
/// concurrent requests inside this process cannot lose each other's writes.
/// Reads go straight to the store.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    write_lock: Mutex<()>,
}

impl SessionService {
    /// Wraps a storage backend.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a session and makes it the only active one.
    ///
    /// Config is validated before any existing session is touched. The new
    /// record is inserted before the others are deactivated, so a storage
    /// failure part way through never leaves the store without a current
    /// session.
    pub async fn create_session(&self, config: SessionConfig) -> CourtbookResult<Session> {
        let session = Session::new(config)?;

        let _guard = self.write_lock.lock().await;
        self.store.create(&session).await?;
        for mut active in self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|s| s.is_active && s.id != session.id)
        {
            active.is_active = false;
            active.updated_at = session.created_at;
            self.store.update(&active).await?;
            info!(session_id = %active.id, "Deactivated previous session");
        }

        info!(
            session_id = %session.id,
            courts = session.courts,
            max_players = session.max_players,
            max_standby = session.max_standby_players,
            "Session created"
        );
        Ok(session)
    }

    /// The most recently created active session, if any.
    pub async fn current_session(&self) -> CourtbookResult<Option<Session>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|s| s.is_active)
            .max_by_key(|s| s.created_at))
    }

    /// All sessions, newest first.
    pub async fn list_sessions(&self) -> CourtbookResult<Vec<Session>> {
        let mut sessions = self.store.list().await?;
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    /// Loads a session or fails with `SessionNotFound`.
    pub async fn get_session(&self, id: Uuid) -> CourtbookResult<Session> {
        self.store
            .get(id)
            .await?
            .ok_or(CourtbookError::SessionNotFound(id))
    }

    /// Applies a settings patch. Rosters are untouched.
    pub async fn update_settings(&self, id: Uuid, patch: SessionPatch) -> CourtbookResult<Session> {
        let (session, ()) = self.mutate(id, |s| patch.apply_to(s)).await?;
        info!(
            session_id = %id,
            courts = session.courts,
            max_players = session.max_players,
            "Session settings updated"
        );
        Ok(session)
    }

    /// Registers a player; reports which list they landed in.
    pub async fn add_player(&self, id: Uuid, name: &str) -> CourtbookResult<(Session, Placement)> {
        let (session, (player, placement)) = self.mutate(id, |s| s.add_player(name)).await?;
        info!(
            session_id = %id,
            player_id = %player.id,
            placement = ?placement,
            "Player added"
        );
        Ok((session, placement))
    }

    /// Removes a player, promoting the standby head into a freed active slot.
    pub async fn remove_player(&self, id: Uuid, player_id: Uuid) -> CourtbookResult<Session> {
        let (session, removal) = self.mutate(id, |s| s.remove_player(player_id)).await?;
        info!(session_id = %id, player_id = %player_id, "Player removed");
        if let Some(promoted) = &removal.promoted {
            info!(
                session_id = %id,
                player_id = %promoted.id,
                "Standby player promoted into freed slot"
            );
        }
        Ok(session)
    }

    /// Renames a player.
    pub async fn rename_player(
        &self,
        id: Uuid,
        player_id: Uuid,
        name: &str,
    ) -> CourtbookResult<Session> {
        let (session, ()) = self
            .mutate(id, |s| s.rename_player(player_id, name))
            .await?;
        info!(session_id = %id, player_id = %player_id, "Player renamed");
        Ok(session)
    }

    /// Moves a standby player to the active list (organizer override).
    pub async fn promote_player(&self, id: Uuid, player_id: Uuid) -> CourtbookResult<Session> {
        let (session, _) = self.mutate(id, |s| s.promote_player(player_id)).await?;
        info!(session_id = %id, player_id = %player_id, "Standby player promoted by organizer");
        Ok(session)
    }

    /// Archives a session: inactive, empty rosters.
    pub async fn close_session(&self, id: Uuid) -> CourtbookResult<Session> {
        let (session, ()) = self
            .mutate(id, |s| {
                s.close();
                Ok(())
            })
            .await?;
        info!(session_id = %id, "Session closed");
        Ok(session)
    }

    /// Load, apply `op` to a copy, persist. Nothing is written if `op` fails.
    async fn mutate<T, F>(&self, id: Uuid, op: F) -> CourtbookResult<(Session, T)>
    where
        F: FnOnce(&mut Session) -> CourtbookResult<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut session = self
            .store
            .get(id)
            .await?
            .ok_or(CourtbookError::SessionNotFound(id))?;
        let outcome = op(&mut session).inspect_err(|e| {
            debug!(session_id = %id, error = %e, "Operation rejected");
        })?;
        self.store.update(&session).await?;
        Ok((session, outcome))
    }
}
