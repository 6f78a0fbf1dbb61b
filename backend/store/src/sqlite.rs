//! SQLite-backed durable snapshot storage.
//!
//! Keeps one `users` row per record and its log in `events`, keyed by
//! `(user_id, seq)` where `seq = 0` is the newest entry. A save rewrites both
//! tables inside a single transaction, so a failed save leaves the previous
//! snapshot in place.
use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};
use tracker_core::{Counters, Event, EventKind, TrackerError, UserRecord};

use crate::backend::SnapshotBackend;
use crate::snapshot::Snapshot;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
         position    INTEGER NOT NULL,
         user_id     TEXT PRIMARY KEY,
         invited_by  TEXT NOT NULL,
         created_at  TEXT NOT NULL,
         messages    INTEGER NOT NULL,
         calls       INTEGER NOT NULL
     );
     CREATE TABLE IF NOT EXISTS events (
         user_id     TEXT NOT NULL REFERENCES users(user_id),
         seq         INTEGER NOT NULL,
         kind        TEXT NOT NULL,
         timestamp   TEXT NOT NULL,
         content     TEXT NOT NULL,
         PRIMARY KEY (user_id, seq)
     );
     CREATE INDEX IF NOT EXISTS idx_users_position ON users(position);";

pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

fn db_error(err: impl std::fmt::Display) -> TrackerError {
    TrackerError::Persistence(format!("sqlite: {err}"))
}

impl SqliteBackend {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        let conn = Connection::open(path.as_ref()).map_err(db_error)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(db_error)?;
        conn.execute_batch(SCHEMA).map_err(db_error)?;

        info!("SqliteBackend opened at {:?}", path.as_ref());
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (for tests).
    pub fn in_memory() -> Result<Self, TrackerError> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

#[async_trait]
impl SnapshotBackend for SqliteBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<Snapshot, TrackerError> {
        let conn = self.conn.lock().await;

        let mut users = conn
            .prepare(
                "SELECT user_id, invited_by, created_at, messages, calls
                 FROM users ORDER BY position ASC",
            )
            .map_err(db_error)?;
        let records: Vec<UserRecord> = users
            .query_map([], row_to_record)
            .map_err(db_error)?
            .collect::<Result<_, _>>()
            .map_err(db_error)?;

        let mut events = conn
            .prepare(
                "SELECT kind, timestamp, content FROM events
                 WHERE user_id = ?1 ORDER BY seq ASC",
            )
            .map_err(db_error)?;

        let mut snapshot = Snapshot::new();
        for mut record in records {
            let rows: Vec<(String, String, String)> = events
                .query_map(params![record.user_id], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })
                .map_err(db_error)?
                .collect::<Result<_, _>>()
                .map_err(db_error)?;

            let mut log = VecDeque::with_capacity(rows.len());
            for (kind, timestamp, content) in rows {
                let kind: EventKind = kind.parse().map_err(db_error)?;
                log.push_back(Event::new(kind, timestamp, content));
            }
            record.event_log = log;

            let user_id = record.user_id.clone();
            if !snapshot.insert(record) {
                return Err(db_error(format!("duplicate user '{user_id}'")));
            }
        }

        debug!(records = snapshot.len(), "Loaded snapshot from sqlite");
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(db_error)?;

        tx.execute_batch("DELETE FROM events; DELETE FROM users;")
            .map_err(db_error)?;
        {
            let mut insert_user = tx
                .prepare(
                    "INSERT INTO users (position, user_id, invited_by, created_at, messages, calls)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(db_error)?;
            let mut insert_event = tx
                .prepare(
                    "INSERT INTO events (user_id, seq, kind, timestamp, content)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .map_err(db_error)?;

            for (position, record) in snapshot.records().iter().enumerate() {
                insert_user
                    .execute(params![
                        position as i64,
                        record.user_id,
                        record.invited_by,
                        record.created_at,
                        record.counters.messages as i64,
                        record.counters.calls as i64,
                    ])
                    .map_err(db_error)?;

                for (seq, event) in record.event_log.iter().enumerate() {
                    insert_event
                        .execute(params![
                            record.user_id,
                            seq as i64,
                            event.kind.as_str(),
                            event.timestamp,
                            event.content,
                        ])
                        .map_err(db_error)?;
                }
            }
        }
        tx.commit().map_err(db_error)?;

        debug!(records = snapshot.len(), "Saved snapshot to sqlite");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row deserialization helper
// ---------------------------------------------------------------------------

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
    let user_id: String = row.get(0)?;
    let invited_by: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    let messages: i64 = row.get(3)?;
    let calls: i64 = row.get(4)?;

    let mut record = UserRecord::new(user_id, invited_by, created_at);
    record.counters = Counters {
        messages: messages.max(0) as u64,
        calls: calls.max(0) as u64,
    };
    Ok(record)
}
