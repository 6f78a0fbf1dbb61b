pub mod error;
pub mod event;
pub mod record;

pub use error::TrackerError;
pub use event::{local_timestamp, Event, EventKind, TIMESTAMP_FORMAT};
pub use record::{Counter, Counters, UserRecord, UNKNOWN_INVITER};
