//! `tracker-store`: the embedded activity store.
//!
//! A [`RecordStore`] owns an in-memory [`Snapshot`] of every user record and
//! writes the whole snapshot through a [`SnapshotBackend`] after each
//! mutation. Ingestion goes through the upsert protocol in [`upsert`];
//! read-only summaries and rankings live in [`query`].

pub mod backend;
pub mod json_file;
pub mod query;
pub mod snapshot;
pub mod sqlite;
pub mod store;
pub mod upsert;

pub use backend::{MemoryBackend, SnapshotBackend};
pub use json_file::JsonFileBackend;
pub use query::UserSummary;
pub use snapshot::Snapshot;
pub use sqlite::SqliteBackend;
pub use store::RecordStore;
pub use upsert::Recorded;
