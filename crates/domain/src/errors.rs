//! Domain error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the collaborator traits in [`crate::services::store`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Kind of record a batch write was attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Event,
    Match,
    MatchGuests,
    Invites,
    Venue,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Event => write!(f, "event"),
            RecordKind::Match => write!(f, "match"),
            RecordKind::MatchGuests => write!(f, "match_guests"),
            RecordKind::Invites => write!(f, "invites"),
            RecordKind::Venue => write!(f, "venue"),
        }
    }
}

/// One record of a batch that did not commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub record: RecordKind,
    /// Index of the pair group within the batch, if the record belongs to one.
    pub pair_index: Option<usize>,
    pub message: String,
}

impl fmt::Display for PersistenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pair_index {
            Some(index) => write!(f, "{} (pair {}): {}", self.record, index, self.message),
            None => write!(f, "{}: {}", self.record, self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum PairingError {
    #[error("no members; add members before generating pairs")]
    EmptyGroup,

    #[error("only {count} member; need at least 2")]
    InsufficientMembers { count: usize },

    #[error("no venues found in {city}")]
    NoVenuesInCity { city: String },

    #[error("{} record(s) failed to persist", .failures.len())]
    PartialPersistenceFailure { failures: Vec<PersistenceFailure> },

    #[error("{context}: {source}")]
    UpstreamReadFailure {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("could not resolve match: {0}")]
    MatchResolutionError(String),

    #[error("group not found: {0}")]
    GroupNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl PairingError {
    /// Wraps a store error with the name of the read that failed.
    pub fn upstream(context: impl Into<String>) -> impl FnOnce(StoreError) -> PairingError {
        let context = context.into();
        move |source| PairingError::UpstreamReadFailure { context, source }
    }

    /// Returns true for conditions the group owner can fix themselves.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            PairingError::EmptyGroup
                | PairingError::InsufficientMembers { .. }
                | PairingError::NoVenuesInCity { .. }
                | PairingError::Validation(_)
        )
    }
}

impl From<validator::ValidationErrors> for PairingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();

        if messages.is_empty() {
            PairingError::Validation(errors.to_string())
        } else {
            PairingError::Validation(messages.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_error_messages() {
        assert_eq!(
            PairingError::EmptyGroup.to_string(),
            "no members; add members before generating pairs"
        );
        assert_eq!(
            PairingError::InsufficientMembers { count: 1 }.to_string(),
            "only 1 member; need at least 2"
        );
        assert_eq!(
            PairingError::NoVenuesInCity {
                city: "Lisbon".to_string()
            }
            .to_string(),
            "no venues found in Lisbon"
        );
    }

    #[test]
    fn test_upstream_wraps_context() {
        let err = PairingError::upstream("list members")(StoreError::Database(
            "connection reset".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "list members: Database error: connection reset"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_partial_persistence_failure_message() {
        let err = PairingError::PartialPersistenceFailure {
            failures: vec![
                PersistenceFailure {
                    record: RecordKind::Invites,
                    pair_index: Some(1),
                    message: "timeout".to_string(),
                },
                PersistenceFailure {
                    record: RecordKind::Venue,
                    pair_index: None,
                    message: "timeout".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "2 record(s) failed to persist");
    }

    #[test]
    fn test_persistence_failure_display() {
        let failure = PersistenceFailure {
            record: RecordKind::MatchGuests,
            pair_index: Some(0),
            message: "duplicate key".to_string(),
        };
        assert_eq!(failure.to_string(), "match_guests (pair 0): duplicate key");
    }

    #[test]
    fn test_user_correctable() {
        assert!(PairingError::EmptyGroup.is_user_correctable());
        assert!(PairingError::InsufficientMembers { count: 1 }.is_user_correctable());
        assert!(!PairingError::MatchResolutionError("x".to_string()).is_user_correctable());
        assert!(!PairingError::GroupNotFound(Uuid::nil()).is_user_correctable());
    }
}
