#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use courtbook_core::{
    CourtbookError, CourtbookResult, Placement, Session, SessionConfig, SessionPatch,
};
use courtbook_session::{FileSessionStore, InMemorySessionStore, SessionService, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Helper: a service over a FileSessionStore in a temp directory.
async fn temp_service() -> (SessionService, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(tmp.path().join("sessions"))
        .await
        .unwrap();
    (SessionService::new(Arc::new(store)), tmp)
}

fn config(courts: u32) -> SessionConfig {
    SessionConfig {
        courts,
        date: "2026-10-24".to_string(),
        time: "19:00-21:00".to_string(),
        location: "Riverside Leisure Centre".to_string(),
        map_link: None,
        max_standby_players: None,
    }
}

#[tokio::test]
async fn test_create_and_get_current() {
    let (service, _tmp) = temp_service().await;
    assert!(service.current_session().await.unwrap().is_none());

    let created = service.create_session(config(3)).await.unwrap();
    assert_eq!(created.max_players, 18);
    assert_eq!(created.max_standby_players, 4);

    let current = service.current_session().await.unwrap().unwrap();
    assert_eq!(current.id, created.id);
}

#[tokio::test]
async fn test_create_deactivates_previous() {
    let (service, _tmp) = temp_service().await;
    let first = service.create_session(config(1)).await.unwrap();
    let second = service.create_session(config(2)).await.unwrap();

    let sessions = service.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions.iter().filter(|s| s.is_active).count(), 1);
    assert_eq!(sessions[0].id, second.id);

    let old = service.get_session(first.id).await.unwrap();
    assert!(!old.is_active);
    assert_eq!(
        service.current_session().await.unwrap().unwrap().id,
        second.id
    );
}

#[tokio::test]
async fn test_invalid_create_keeps_current_session() {
    let (service, _tmp) = temp_service().await;
    let first = service.create_session(config(1)).await.unwrap();
    assert!(matches!(
        service.create_session(config(0)).await,
        Err(CourtbookError::Validation(_))
    ));
    assert_eq!(
        service.current_session().await.unwrap().unwrap().id,
        first.id
    );
}

/// In-memory store whose writes can be switched to fail.
#[derive(Default)]
struct FailingStore {
    inner: InMemorySessionStore,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

#[async_trait]
impl SessionStore for FailingStore {
    async fn create(&self, session: &Session) -> CourtbookResult<()> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(CourtbookError::Storage("disk full".to_string()));
        }
        self.inner.create(session).await
    }
    async fn get(&self, id: Uuid) -> CourtbookResult<Option<Session>> {
        self.inner.get(id).await
    }
    async fn update(&self, session: &Session) -> CourtbookResult<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(CourtbookError::Storage("disk full".to_string()));
        }
        self.inner.update(session).await
    }
    async fn list(&self) -> CourtbookResult<Vec<Session>> {
        self.inner.list().await
    }
}

#[tokio::test]
async fn test_failed_insert_keeps_current_session() {
    let store = Arc::new(FailingStore::default());
    let service = SessionService::new(store.clone());
    let first = service.create_session(config(1)).await.unwrap();

    store.fail_create.store(true, Ordering::SeqCst);
    assert!(matches!(
        service.create_session(config(2)).await,
        Err(CourtbookError::Storage(_))
    ));
    let current = service.current_session().await.unwrap().unwrap();
    assert_eq!(current.id, first.id);
    assert!(current.is_active);
}

#[tokio::test]
async fn test_failed_deactivation_still_leaves_newest_current() {
    let store = Arc::new(FailingStore::default());
    let service = SessionService::new(store.clone());
    service.create_session(config(1)).await.unwrap();

    store.fail_update.store(true, Ordering::SeqCst);
    assert!(service.create_session(config(2)).await.is_err());

    let current = service.current_session().await.unwrap().unwrap();
    assert_eq!(current.courts, 2);
}

#[tokio::test]
async fn test_settings_update_after_promote_override() {
    let (service, _tmp) = temp_service().await;
    let id = service.create_session(config(1)).await.unwrap().id;
    for i in 0..7 {
        service.add_player(id, &format!("P{i}")).await.unwrap();
    }
    let standby = service.get_session(id).await.unwrap().standby_players[0].id;
    let promoted = service.promote_player(id, standby).await.unwrap();
    assert_eq!(promoted.players.len(), 7);

    let time_only = SessionPatch {
        time: Some("20:00".to_string()),
        ..Default::default()
    };
    let updated = service.update_settings(id, time_only).await.unwrap();
    assert_eq!(updated.time, "20:00");

    let same_courts = SessionPatch {
        courts: Some(1),
        max_players: Some(6),
        max_standby_players: Some(4),
        ..Default::default()
    };
    let updated = service.update_settings(id, same_courts).await.unwrap();
    assert_eq!(updated.max_players, 6);
    assert_eq!(updated.players.len(), 7);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (service, _tmp) = temp_service().await;
    let id = Uuid::new_v4();
    assert!(matches!(
        service.add_player(id, "Alice").await,
        Err(CourtbookError::SessionNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        service.close_session(id).await,
        Err(CourtbookError::SessionNotFound(_))
    ));
    assert!(matches!(
        service.update_settings(id, SessionPatch::default()).await,
        Err(CourtbookError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_roster_flow_persists() {
    let (service, tmp) = temp_service().await;
    let session = service.create_session(config(3)).await.unwrap();
    let id = session.id;

    for i in 1..=18 {
        let (_, placement) = service.add_player(id, &format!("P{i}")).await.unwrap();
        assert_eq!(placement, Placement::Active);
    }
    let (after, placement) = service.add_player(id, "P19").await.unwrap();
    assert_eq!(placement, Placement::Standby);
    assert_eq!(after.standby_players.len(), 1);

    let p1 = after.players[0].id;
    let after = service.remove_player(id, p1).await.unwrap();
    assert_eq!(after.players.len(), 18);
    assert_eq!(after.players.last().unwrap().name, "P19");
    assert!(after.standby_players.is_empty());

    // A fresh store over the same directory sees the same roster.
    let reopened = FileSessionStore::new(tmp.path().join("sessions"))
        .await
        .unwrap();
    let loaded = reopened.get(id).await.unwrap().unwrap();
    assert_eq!(loaded, after);
}

#[tokio::test]
async fn test_failed_operation_writes_nothing() {
    let (service, _tmp) = temp_service().await;
    let id = service.create_session(config(1)).await.unwrap().id;
    let before = service.add_player(id, "Alice").await.unwrap().0;

    assert!(matches!(
        service.add_player(id, "ALICE").await,
        Err(CourtbookError::DuplicateName(_))
    ));
    assert_eq!(service.get_session(id).await.unwrap(), before);
}

#[tokio::test]
async fn test_rename_and_promote() {
    let (service, _tmp) = temp_service().await;
    let id = service.create_session(config(1)).await.unwrap().id;
    for name in ["Alice", "Bob", "Cara", "Dev", "Eli", "Fay", "Gus"] {
        service.add_player(id, name).await.unwrap();
    }
    let session = service.get_session(id).await.unwrap();
    let alice = session.players[0].id;
    let gus = session.standby_players[0].id;

    assert!(matches!(
        service.rename_player(id, alice, "bob").await,
        Err(CourtbookError::DuplicateName(_))
    ));
    let renamed = service.rename_player(id, alice, "Alicia").await.unwrap();
    assert_eq!(renamed.players[0].name, "Alicia");

    assert!(matches!(
        service.promote_player(id, alice).await,
        Err(CourtbookError::PlayerNotFound(_))
    ));
    let promoted = service.promote_player(id, gus).await.unwrap();
    assert_eq!(promoted.players.len(), 7);
    assert_eq!(promoted.players.last().unwrap().id, gus);
    assert!(promoted.standby_players.is_empty());
}

#[tokio::test]
async fn test_update_settings_recomputes_capacity() {
    let (service, _tmp) = temp_service().await;
    let id = service.create_session(config(2)).await.unwrap().id;
    service.add_player(id, "Alice").await.unwrap();

    let patch: SessionPatch = serde_json::from_value(serde_json::json!({
        "courts": 5,
        "maxPlayers": 3,
        "location": "  Eastgate Gym ",
        "players": []
    }))
    .unwrap();
    let updated = service.update_settings(id, patch).await.unwrap();
    assert_eq!(updated.courts, 5);
    assert_eq!(updated.max_players, 30);
    assert_eq!(updated.location, "Eastgate Gym");
    assert_eq!(updated.players.len(), 1);
}

#[tokio::test]
async fn test_close_is_idempotent_and_clears_current() {
    let (service, _tmp) = temp_service().await;
    let id = service.create_session(config(1)).await.unwrap().id;
    service.add_player(id, "Alice").await.unwrap();

    let first = service.close_session(id).await.unwrap();
    let second = service.close_session(id).await.unwrap();
    for closed in [&first, &second] {
        assert!(!closed.is_active);
        assert!(closed.players.is_empty());
        assert!(closed.standby_players.is_empty());
    }
    assert!(service.current_session().await.unwrap().is_none());
    assert_eq!(service.list_sessions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_adds_are_serialized() {
    let service = Arc::new(SessionService::new(Arc::new(InMemorySessionStore::new())));
    let mut cfg = config(1);
    cfg.max_standby_players = Some(0);
    let id = service.create_session(cfg).await.unwrap().id;

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.add_player(id, &format!("Racer{i}")).await
        }));
    }
    let mut ok = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(CourtbookError::CapacityExceeded { .. }) => full += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 6);
    assert_eq!(full, 14);
    assert_eq!(service.get_session(id).await.unwrap().players.len(), 6);
}
