use super::*;

fn temp_session_path() -> PathBuf {
    std::env::temp_dir().join(format!("belay-session-{}.json", uuid::Uuid::new_v4()))
}

// =============================================================================
// FileTokenStore
// =============================================================================

#[test]
fn file_store_missing_file_loads_none() {
    let store = FileTokenStore::new(temp_session_path());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn file_store_save_then_load_returns_token() {
    let path = temp_session_path();
    let store = FileTokenStore::new(&path);
    store.save("abc123").unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.load().unwrap().as_deref(), Some("abc123"));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains(TOKEN_KEY));
    store.clear().unwrap();
}

#[test]
fn file_store_clear_removes_token_and_is_idempotent() {
    let path = temp_session_path();
    let store = FileTokenStore::new(&path);
    store.save("abc123").unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
    assert!(!path.exists());
}

#[test]
fn file_store_corrupt_file_is_encode_error() {
    let path = temp_session_path();
    std::fs::write(&path, "not json").unwrap();
    let store = FileTokenStore::new(&path);
    assert!(matches!(store.load(), Err(SessionError::Encode(_))));
    std::fs::remove_file(&path).unwrap();
}

// =============================================================================
// SessionStore
// =============================================================================

#[test]
fn in_memory_store_starts_logged_out() {
    let session = SessionStore::in_memory();
    assert!(session.token().is_none());
    assert!(!session.is_authenticated());
}

#[test]
fn open_reads_persisted_token() {
    let path = temp_session_path();
    FileTokenStore::new(&path).save("persisted").unwrap();

    let session = SessionStore::open(Arc::new(FileTokenStore::new(&path))).unwrap();
    assert_eq!(session.token().as_deref(), Some("persisted"));

    session.clear_token().unwrap();
}

#[test]
fn set_and_clear_survive_reopen() {
    let path = temp_session_path();
    let session = SessionStore::open(Arc::new(FileTokenStore::new(&path))).unwrap();
    session.set_token("tok").unwrap();

    let reopened = SessionStore::open(Arc::new(FileTokenStore::new(&path))).unwrap();
    assert_eq!(reopened.token().as_deref(), Some("tok"));

    reopened.clear_token().unwrap();
    let after_logout = SessionStore::open(Arc::new(FileTokenStore::new(&path))).unwrap();
    assert!(after_logout.token().is_none());
}

#[test]
fn clones_share_token() {
    let session = SessionStore::in_memory();
    let other = session.clone();
    session.set_token("shared").unwrap();
    assert_eq!(other.token().as_deref(), Some("shared"));
    other.clear_token().unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn subscribers_observe_login_and_logout() {
    let session = SessionStore::in_memory();
    let mut rx = session.subscribe();

    session.set_token("tok").unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_deref(), Some("tok"));

    session.clear_token().unwrap();
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_none());
}
