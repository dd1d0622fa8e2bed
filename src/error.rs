//! Error type shared by the store, the storage gateway and the catalog loader.

use thiserror::Error;

/// Everything that can go wrong while mutating or loading tracker state.
///
/// Corrupt persisted data is deliberately absent: the storage gateway recovers
/// from it by falling back to the key's default and never reports it upward.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Required input missing or invalid at creation/edit time.
    #[error("{0}")]
    Validation(String),

    /// A mutation referenced an id that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Habit day slots are numbered 0 (Sat) through 6 (Fri).
    #[error("day index {0} is out of range (expected 0-6)")]
    DayOutOfRange(usize),

    /// Durable storage could not be written or read.
    #[error("storage error: {0}")]
    Persistence(#[from] std::io::Error),

    /// The in-memory state could not be encoded for storage.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The resource catalog could not be fetched or parsed.
    #[error("failed to load resources: {0}")]
    CatalogFetch(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    pub fn task_not_found(id: u64) -> Self {
        TrackerError::NotFound { entity: "Task", id }
    }

    pub fn habit_not_found(id: u64) -> Self {
        TrackerError::NotFound { entity: "Habit", id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(TrackerError::task_not_found(42).to_string(), "Task 42 not found");
        assert_eq!(TrackerError::habit_not_found(7).to_string(), "Habit 7 not found");
    }

    #[test]
    fn io_errors_convert_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: TrackerError = io.into();
        assert!(matches!(err, TrackerError::Persistence(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
