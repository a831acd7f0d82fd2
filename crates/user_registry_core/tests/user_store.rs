use rusqlite::Connection;
use user_registry_core::db::migrations::latest_version;
use user_registry_core::db::{open_db, open_db_in_memory};
use user_registry_core::{SqliteUserStore, StoreError, UserRecord, UserStore};

fn unsaved(name: &str, email: &str) -> UserRecord {
    UserRecord {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
    }
}

#[test]
fn save_assigns_id_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    let mut record = unsaved("Juan Pérez", "juan@example.com");
    record.phone = Some("555-1234".to_string());
    let saved = store.save(&record).unwrap();

    assert_eq!(saved.id, Some(1));
    let loaded = store.find_by_id(1).unwrap().unwrap();
    assert_eq!(loaded, saved);
    assert_eq!(
        store.find_by_email("juan@example.com").unwrap(),
        Some(saved)
    );
}

#[test]
fn save_with_id_updates_in_place() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    let mut saved = store.save(&unsaved("Draft", "draft@example.com")).unwrap();
    saved.name = "Final".to_string();
    saved.email = "final@example.com".to_string();
    saved.phone = Some("123".to_string());
    let updated = store.save(&saved).unwrap();

    assert_eq!(updated, saved);
    assert_eq!(store.list_all().unwrap(), vec![saved]);
    assert!(!store.exists_by_email("draft@example.com").unwrap());
}

#[test]
fn save_with_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    let mut ghost = unsaved("Ghost", "ghost@example.com");
    ghost.id = Some(77);
    let err = store.save(&ghost).unwrap_err();

    assert!(matches!(err, StoreError::NotFound(77)));
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn unique_index_rejects_duplicate_email() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    store.save(&unsaved("One", "same@example.com")).unwrap();
    let err = store.save(&unsaved("Two", "same@example.com")).unwrap_err();

    assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "same@example.com"));
}

#[test]
fn exists_and_delete_follow_row_presence() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();
    let id = store
        .save(&unsaved("Temp", "temp@example.com"))
        .unwrap()
        .id
        .unwrap();

    assert!(store.exists_by_id(id).unwrap());
    assert!(store.exists_by_email("temp@example.com").unwrap());

    store.delete_by_id(id).unwrap();

    assert!(!store.exists_by_id(id).unwrap());
    assert!(store.find_by_id(id).unwrap().is_none());
    assert!(matches!(
        store.delete_by_id(id).unwrap_err(),
        StoreError::NotFound(found) if found == id
    ));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    let first = store.save(&unsaved("First", "first@example.com")).unwrap();
    store.delete_by_id(first.id.unwrap()).unwrap();
    let second = store.save(&unsaved("Second", "second@example.com")).unwrap();

    assert!(second.id.unwrap() > first.id.unwrap());
}

#[test]
fn list_all_orders_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();
    for (name, email) in [
        ("Carla", "c@example.com"),
        ("Ana", "a@example.com"),
        ("Beto", "b@example.com"),
    ] {
        store.save(&unsaved(name, email)).unwrap();
    }

    let ids: Vec<_> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|user| user.id.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn read_rejects_rows_with_unnormalized_email() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users (name, email) VALUES ('Raw', 'Raw@Example.com');",
        [],
    )
    .unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();

    let err = store.list_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn file_backed_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteUserStore::try_new(&conn).unwrap();
        store.save(&unsaved("Kept", "kept@example.com")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteUserStore::try_new(&conn).unwrap();
    let kept = store.find_by_email("kept@example.com").unwrap().unwrap();
    assert_eq!(kept.name, "Kept");
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteUserStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_users_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteUserStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("users"))
    ));
}

#[test]
fn store_rejects_users_table_missing_phone_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteUserStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "users",
            column: "phone"
        })
    ));
}
