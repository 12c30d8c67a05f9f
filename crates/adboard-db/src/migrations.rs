use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, advertisements)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL
            );

            CREATE TABLE advertisements (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                header      TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                owner_id    INTEGER
            );

            CREATE INDEX idx_advertisements_owner ON advertisements(owner_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
