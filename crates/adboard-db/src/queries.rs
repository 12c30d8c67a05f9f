use crate::Database;
use crate::models::{AdvertisementRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi, params};

impl Database {
    // -- Users --

    /// Insert a user and return the generated id.
    pub fn create_user(&self, name: &str, password_hash: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (name, password) VALUES (?1, ?2)",
                (name, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, id))
    }

    /// Apply the supplied fields; `None` leaves a column untouched.
    /// Returns `None` if no user has this id.
    pub fn update_user(
        &self,
        id: i64,
        name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            if query_user(&tx, id)?.is_none() {
                return Ok(None);
            }

            tx.execute(
                "UPDATE users SET name = COALESCE(?2, name), password = COALESCE(?3, password)
                 WHERE id = ?1",
                params![id, name, password_hash],
            )?;
            let row = query_user(&tx, id)?;
            tx.commit()?;
            Ok(row)
        })
    }

    /// Returns `false` if no user has this id.
    pub fn delete_user(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // -- Advertisements --

    pub fn create_advertisement(
        &self,
        header: &str,
        description: &str,
        owner_id: i64,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO advertisements (header, description, owner_id) VALUES (?1, ?2, ?3)",
                params![header, description, owner_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_advertisement(&self, id: i64) -> Result<Option<AdvertisementRow>> {
        self.with_conn(|conn| query_advertisement(conn, id))
    }

    pub fn update_advertisement(
        &self,
        id: i64,
        header: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<AdvertisementRow>> {
        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            if query_advertisement(&tx, id)?.is_none() {
                return Ok(None);
            }

            tx.execute(
                "UPDATE advertisements
                 SET header = COALESCE(?2, header), description = COALESCE(?3, description)
                 WHERE id = ?1",
                params![id, header, description],
            )?;
            let row = query_advertisement(&tx, id)?;
            tx.commit()?;
            Ok(row)
        })
    }

    pub fn delete_advertisement(&self, id: i64) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute("DELETE FROM advertisements WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_advertisement(conn: &Connection, id: i64) -> Result<Option<AdvertisementRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, header, description, created_at, owner_id FROM advertisements WHERE id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(AdvertisementRow {
                id: row.get(0)?,
                header: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                owner_id: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

// -- Error classification --

fn extended_code(err: &anyhow::Error) -> Option<std::ffi::c_int> {
    match err.downcast_ref::<rusqlite::Error>()? {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

/// True when `err` came from a UNIQUE constraint (duplicate name/header).
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    extended_code(err) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE)
}
