//! Error taxonomy for store operations.
//!
//! Repositories work with [`StoreError`] internally and convert it into an
//! error [`Envelope`] at their public boundary; no variant ever reaches the
//! calling layer as anything but an envelope.

use log::error;
use sea_orm::DbErr;

use crate::constants::ERROR_DATABASE_CONNECTION_FAILED;
use crate::envelope::Envelope;

/// Failure categories reported by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The engine cannot be reached or the liveness check failed.
    #[error("{0}")]
    Connection(String),

    /// Input rejected before any write was attempted.
    #[error("{0}")]
    Validation(String),

    /// No row matches the requested id.
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// The engine rejected a statement after validation passed.
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn connection_failed() -> Self {
        Self::Connection(ERROR_DATABASE_CONNECTION_FAILED.to_string())
    }

    pub fn reminder_not_found(id: i32) -> Self {
        Self::NotFound { entity: "Reminder", id }
    }

    pub fn todo_not_found(id: i32) -> Self {
        Self::NotFound {
            entity: "Todo item",
            id,
        }
    }

    /// Convert into an error envelope.
    ///
    /// `action` names the failed operation ("add reminder") and prefixes
    /// persistence failures, which are also logged.
    pub fn into_envelope(self, action: &str) -> Envelope {
        match self {
            Self::Persistence(err) => {
                error!("Failed to {}: {}", action, err);
                Envelope::error(format!("Failed to {}: {}", action, err))
            }
            Self::Connection(message) => {
                error!("{} while trying to {}", message, action);
                Envelope::error(message)
            }
            other => Envelope::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_entity() {
        assert_eq!(
            StoreError::reminder_not_found(7).to_string(),
            "Reminder with ID 7 not found"
        );
        assert_eq!(
            StoreError::todo_not_found(3).to_string(),
            "Todo item with ID 3 not found"
        );
    }

    #[test]
    fn persistence_envelope_is_prefixed_with_action() {
        let envelope = StoreError::from(DbErr::Custom("disk full".to_string())).into_envelope("add todo");
        assert!(!envelope.is_success());
        assert!(envelope.message().starts_with("Failed to add todo: "));
        assert!(envelope.message().contains("disk full"));
    }

    #[test]
    fn connection_envelope_uses_fixed_message() {
        let envelope = StoreError::connection_failed().into_envelope("list reminders");
        assert_eq!(envelope.message(), ERROR_DATABASE_CONNECTION_FAILED);
    }
}
