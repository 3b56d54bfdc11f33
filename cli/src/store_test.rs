use super::*;

use std::rc::Rc;

use session::{SessionStore, User};

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("storaige-store-{}.json", uuid::Uuid::new_v4()))
}

#[test]
fn missing_file_is_empty() {
    let store = FileStore::open(temp_path());
    assert_eq!(store.get("authToken"), None);
}

#[test]
fn writes_survive_reopen() {
    let path = temp_path();
    let store = FileStore::open(&path);
    store.set("authToken", "t-1").unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get("authToken").as_deref(), Some("t-1"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn file_uses_local_storage_key_layout() {
    let path = temp_path();
    let session = SessionStore::new(Rc::new(FileStore::open(&path)));
    session.set_token("t-1").unwrap();
    session
        .set_user(&User {
            id: "u1".to_owned(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            created_at: None,
        })
        .unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["authToken"], "t-1");
    assert!(raw["authUser"].as_str().unwrap().contains("ada@example.com"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn clearing_everything_deletes_the_file() {
    let path = temp_path();
    let session = SessionStore::new(Rc::new(FileStore::open(&path)));
    session.set_token("t-1").unwrap();
    assert!(path.exists());

    session.clear().unwrap();
    assert!(!path.exists());
}

#[test]
fn removing_absent_key_is_ok() {
    let store = FileStore::open(temp_path());
    assert!(store.remove("authToken").is_ok());
}

#[test]
fn malformed_file_reads_as_empty_and_is_replaced() {
    let path = temp_path();
    fs::write(&path, "{not json").unwrap();

    let store = FileStore::open(&path);
    assert_eq!(store.get("authToken"), None);
    store.set("authToken", "t-2").unwrap();
    assert_eq!(FileStore::open(&path).get("authToken").as_deref(), Some("t-2"));
    fs::remove_file(&path).unwrap();
}

#[cfg(unix)]
#[test]
fn file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_path();
    FileStore::open(&path).set("authToken", "t-1").unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    fs::remove_file(&path).unwrap();
}

#[cfg(unix)]
#[test]
fn existing_world_readable_file_is_narrowed() {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_path();
    fs::write(&path, "{}").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    FileStore::open(&path).set("authToken", "t-1").unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(FileStore::open(&path).get("authToken").as_deref(), Some("t-1"));
    fs::remove_file(&path).unwrap();
}
