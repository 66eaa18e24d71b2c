use async_trait::async_trait;
use courtbook_core::{CourtbookError, CourtbookResult, Session};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Persistence backend for session records.
///
/// Each call is one indivisible record write or read; cross-record
/// consistency is the caller's job (see [`crate::SessionService`]).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new record.
    async fn create(&self, session: &Session) -> CourtbookResult<()>;
    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> CourtbookResult<Option<Session>>;
    /// Overwrite an existing record.
    async fn update(&self, session: &Session) -> CourtbookResult<()>;
    /// All records, in no particular order.
    async fn list(&self) -> CourtbookResult<Vec<Session>>;
}

/// File-based session store: one pretty-printed JSON file per session.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Opens (and creates if needed) the store directory.
    pub async fn new(dir: PathBuf) -> CourtbookResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn session_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Writes to a sibling temp file then renames over the target.
    async fn write_atomic(&self, session: &Session) -> CourtbookResult<()> {
        let path = self.session_path(session.id);
        let tmp = self.dir.join(format!("{}.json.tmp", session.id));
        let json = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn read(&self, path: PathBuf) -> CourtbookResult<Session> {
        let data = tokio::fs::read_to_string(&path).await?;
        serde_json::from_str(&data).map_err(|e| {
            CourtbookError::Storage(format!(
                "Failed to parse session {}: {e}",
                path.display()
            ))
        })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn create(&self, session: &Session) -> CourtbookResult<()> {
        if self.session_path(session.id).exists() {
            return Err(CourtbookError::Storage(format!(
                "Session {} already exists",
                session.id
            )));
        }
        self.write_atomic(session).await
    }

    async fn get(&self, id: Uuid) -> CourtbookResult<Option<Session>> {
        let path = self.session_path(id);
        if !path.exists() {
            return Ok(None);
        }
        self.read(path).await.map(Some)
    }

    async fn update(&self, session: &Session) -> CourtbookResult<()> {
        if !self.session_path(session.id).exists() {
            return Err(CourtbookError::SessionNotFound(session.id));
        }
        self.write_atomic(session).await
    }

    async fn list(&self) -> CourtbookResult<Vec<Session>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let is_record = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".json"))
                .is_some_and(|stem| Uuid::parse_str(stem).is_ok());
            if is_record {
                sessions.push(self.read(entry.path()).await?);
            }
        }
        Ok(sessions)
    }
}

/// Volatile store for tests and throwaway runs.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> CourtbookResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(CourtbookError::Storage(format!(
                "Session {} already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> CourtbookResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn update(&self, session: &Session) -> CourtbookResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.id) {
            Some(slot) => {
                *slot = session.clone();
                Ok(())
            }
            None => Err(CourtbookError::SessionNotFound(session.id)),
        }
    }

    async fn list(&self) -> CourtbookResult<Vec<Session>> {
        Ok(self.sessions.read().await.values().cloned().collect())
    }
}
