use thiserror::Error;

/// Top-level error type for the activity tracker.
///
/// A lookup that finds nothing is not an error; queries return `Option`.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Malformed inbound event. Nothing was mutated or persisted.
    #[error("validation error: {0}")]
    Validation(String),

    /// The durable write failed. The in-memory store already holds the
    /// mutation but the durable copy does not.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, TrackerError::Persistence(_))
    }
}
