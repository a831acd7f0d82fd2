//! User store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the persistence capability consumed by `UserService`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` assigns an id exactly once, on first insert.
//! - `save` of an already persisted record is a single atomic `UPDATE`.
//! - Read paths reject rows that violate record invariants instead of
//!   masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::user::{normalize_email, UserId, UserRecord};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use thiserror::Error;

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone
FROM users";

const REQUIRED_USER_COLUMNS: &[&str] = &["id", "name", "email", "phone", "updated_at"];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for user persistence and query operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("user not found: {0}")]
    NotFound(UserId),
    #[error("email already stored: {0}")]
    DuplicateEmail(String),
    #[error("invalid persisted user data: {0}")]
    InvalidData(String),
    #[error(
        "connection schema is not initialized: expected version {expected_version}, found {actual_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table is missing: {0}")]
    MissingRequiredTable(&'static str),
    #[error("required column is missing: {table}.{column}")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence capability for user records.
///
/// Implementations own id assignment and must keep `email` unique.
pub trait UserStore {
    /// Inserts a record without id, or replaces the record with matching id.
    ///
    /// Returns the stored record, including its assigned id.
    fn save(&self, record: &UserRecord) -> StoreResult<UserRecord>;
    fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>>;
    /// Looks up by an already normalized email.
    fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;
    /// Checks an already normalized email.
    fn exists_by_email(&self, email: &str) -> StoreResult<bool>;
    fn exists_by_id(&self, id: UserId) -> StoreResult<bool>;
    fn delete_by_id(&self, id: UserId) -> StoreResult<()>;
    fn list_all(&self) -> StoreResult<Vec<UserRecord>>;
}

impl<S: UserStore + ?Sized> UserStore for &S {
    fn save(&self, record: &UserRecord) -> StoreResult<UserRecord> {
        (**self).save(record)
    }

    fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        (**self).find_by_email(email)
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        (**self).exists_by_email(email)
    }

    fn exists_by_id(&self, id: UserId) -> StoreResult<bool> {
        (**self).exists_by_id(id)
    }

    fn delete_by_id(&self, id: UserId) -> StoreResult<()> {
        (**self).delete_by_id(id)
    }

    fn list_all(&self) -> StoreResult<Vec<UserRecord>> {
        (**self).list_all()
    }
}

/// SQLite-backed user store.
#[derive(Debug)]
pub struct SqliteUserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with outside the migration runner.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_users_schema(conn)?;
        Ok(Self { conn })
    }

    fn insert(&self, record: &UserRecord) -> StoreResult<UserRecord> {
        self.conn
            .execute(
                "INSERT INTO users (name, email, phone) VALUES (?1, ?2, ?3);",
                params![
                    record.name.as_str(),
                    record.email.as_str(),
                    record.phone.as_deref()
                ],
            )
            .map_err(|err| map_write_error(err, &record.email))?;

        let mut stored = record.clone();
        stored.id = Some(self.conn.last_insert_rowid());
        Ok(stored)
    }

    fn update(&self, id: UserId, record: &UserRecord) -> StoreResult<UserRecord> {
        let changed = self
            .conn
            .execute(
                "UPDATE users
                 SET
                    name = ?1,
                    email = ?2,
                    phone = ?3,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?4;",
                params![
                    record.name.as_str(),
                    record.email.as_str(),
                    record.phone.as_deref(),
                    id
                ],
            )
            .map_err(|err| map_write_error(err, &record.email))?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(record.clone())
    }
}

impl UserStore for SqliteUserStore<'_> {
    fn save(&self, record: &UserRecord) -> StoreResult<UserRecord> {
        match record.id {
            None => self.insert(record),
            Some(id) => self.update(id, record),
        }
    }

    fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn exists_by_id(&self, id: UserId) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_by_id(&self, id: UserId) -> StoreResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn list_all(&self) -> StoreResult<Vec<UserRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }
}

fn ensure_users_schema(conn: &Connection) -> StoreResult<()> {
    let table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table.is_none() {
        return Err(StoreError::MissingRequiredTable("users"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('users');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_USER_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: "users",
                column,
            });
        }
    }

    Ok(())
}

fn map_write_error(err: rusqlite::Error, email: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::DuplicateEmail(email.to_string())
        }
        _ => err.into(),
    }
}

fn parse_user_row(row: &Row<'_>) -> StoreResult<UserRecord> {
    let id: UserId = row.get("id")?;
    if id <= 0 {
        return Err(StoreError::InvalidData(format!(
            "invalid id value `{id}` in users.id"
        )));
    }

    let email: String = row.get("email")?;
    if email.is_empty() || normalize_email(&email) != email {
        return Err(StoreError::InvalidData(format!(
            "email of user {id} is empty or not normalized"
        )));
    }

    Ok(UserRecord {
        id: Some(id),
        name: row.get("name")?,
        email,
        phone: row.get("phone")?,
    })
}
