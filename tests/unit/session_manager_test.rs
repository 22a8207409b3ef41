//! Session persistence: encrypted token, auth flags and the single-use
//! session-scoped values.

use std::sync::Arc;

use tempfile::TempDir;
use travelgo::database::connection::Database;
use travelgo::managers::storage_manager::{keys, KeyValueStore, StorageArea, StorageManager};
use travelgo::managers::session_manager::{SessionManager, SessionManagerTrait};
use travelgo::types::listing::{ItemId, Package};
use travelgo::types::session::LoginResponse;

fn store() -> StorageManager {
    StorageManager::new(Arc::new(Database::open_in_memory().unwrap()))
}

fn response() -> LoginResponse {
    LoginResponse {
        access_token: "secret-bearer-token".to_string(),
        token_type: Some("bearer".to_string()),
        user_name: "Ada".to_string(),
        user_email: "ada@example.com".to_string(),
    }
}

fn package() -> Package {
    serde_json::from_str(r#"{"id": 4, "name": "Bali escape", "duration": 10, "price": 1299.0}"#)
        .unwrap()
}

#[test]
fn login_writes_flags_and_encrypted_token() {
    let store = store();
    let manager = SessionManager::new(store.clone());
    let session = manager.login(&response()).unwrap();
    assert_eq!(session.token, "secret-bearer-token");

    assert_eq!(store.get(StorageArea::Local, keys::IS_LOGGED_IN).unwrap().as_deref(), Some("true"));
    assert_eq!(store.get(StorageArea::Local, keys::USER_NAME).unwrap().as_deref(), Some("Ada"));
    let raw_token = store.get(StorageArea::Local, keys::TOKEN).unwrap().unwrap();
    assert!(!raw_token.contains("secret-bearer-token"));
    assert!(store.get(StorageArea::Local, keys::TOKEN_SALT).unwrap().is_some());
}

#[test]
fn current_session_roundtrip() {
    let manager = SessionManager::new(store());
    assert!(manager.current_session().unwrap().is_none());
    assert!(!manager.is_logged_in());

    manager.login(&response()).unwrap();
    let session = manager.current_session().unwrap().unwrap();
    assert_eq!(session.token, "secret-bearer-token");
    assert_eq!(session.user_email, "ada@example.com");
    assert!(manager.is_logged_in());
}

#[test]
fn session_readable_by_a_second_manager() {
    let store = store();
    SessionManager::new(store.clone()).login(&response()).unwrap();
    let other = SessionManager::new(store);
    assert_eq!(other.current_session().unwrap().unwrap().token, "secret-bearer-token");
}

#[test]
fn token_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");
    {
        let store = StorageManager::new(Arc::new(Database::open(&path).unwrap()));
        SessionManager::new(store).login(&response()).unwrap();
    }
    let store = StorageManager::new(Arc::new(Database::open(&path).unwrap()));
    let session = SessionManager::new(store).current_session().unwrap().unwrap();
    assert_eq!(session.token, "secret-bearer-token");
}

#[test]
fn flag_without_true_means_logged_out() {
    let store = store();
    let manager = SessionManager::new(store.clone());
    manager.login(&response()).unwrap();
    store.set(StorageArea::Local, keys::IS_LOGGED_IN, "false").unwrap();
    assert!(manager.current_session().unwrap().is_none());
}

#[test]
fn corrupted_token_is_treated_as_logged_out() {
    let store = store();
    let manager = SessionManager::new(store.clone());
    manager.login(&response()).unwrap();
    store.set(StorageArea::Local, keys::TOKEN, "garbage").unwrap();
    assert!(manager.current_session().unwrap().is_none());
}

#[test]
fn logout_removes_session_keys_only() {
    let store = store();
    let manager = SessionManager::new(store.clone());
    manager.login(&response()).unwrap();
    store.set(StorageArea::Local, keys::FAVORITES, r#"["1"]"#).unwrap();

    manager.logout().unwrap();
    for key in [keys::TOKEN, keys::USER_NAME, keys::USER_EMAIL, keys::IS_LOGGED_IN] {
        assert_eq!(store.get(StorageArea::Local, key).unwrap(), None, "{} kept", key);
    }
    assert!(store.get(StorageArea::Local, keys::FAVORITES).unwrap().is_some());
    assert!(!manager.is_logged_in());
}

#[test]
fn redirect_is_single_use() {
    let manager = SessionManager::new(store());
    manager.remember_redirect("package-detail.html?id=4").unwrap();
    assert_eq!(manager.take_redirect().unwrap().as_deref(), Some("package-detail.html?id=4"));
    assert_eq!(manager.take_redirect().unwrap(), None);
}

#[test]
fn scroll_position_is_single_use() {
    let manager = SessionManager::new(store());
    manager.save_scroll_position(812.5).unwrap();
    assert_eq!(manager.take_scroll_position().unwrap(), Some(812.5));
    assert_eq!(manager.take_scroll_position().unwrap(), None);
}

#[test]
fn booking_stash_roundtrip() {
    let manager = SessionManager::new(store());
    manager.stash_booking(&package()).unwrap();
    let booked = manager.take_booking().unwrap().unwrap();
    assert_eq!(booked.id, ItemId::from(4u64));
    assert_eq!(booked.name, "Bali escape");
    assert!(manager.take_booking().unwrap().is_none());
}
