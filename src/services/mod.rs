pub mod catalog_service;
pub mod cleanup;
pub mod note_service;

pub use catalog_service::CatalogService;
pub use cleanup::{CascadeError, CascadeReport, CleanupCoordinator, Phase};
pub use note_service::{NoteInput, NoteService};

use thiserror::Error;
use uuid::Uuid;

use crate::database::{Collection, StorageError};

/// Failures shared by every service operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("The `id` is not valid")]
    InvalidIdentifier(String),

    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: Uuid },

    #[error("Missing `{0}` in request body")]
    MissingField(&'static str),

    #[error("The {} name already exists", .0.singular())]
    DuplicateName(Collection),

    #[error(transparent)]
    Cascade(#[from] CascadeError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { collection } => ServiceError::DuplicateName(collection),
            other => ServiceError::Storage(other),
        }
    }
}

/// Parse a path identifier before any storage call is made.
pub fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::InvalidIdentifier(raw.to_string()))
}

/// Required text input: absent or whitespace-only counts as missing.
/// Accepted text is kept exactly as sent.
pub fn require_text(value: Option<&str>, field: &'static str) -> Result<String, ServiceError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ServiceError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_malformed_values() {
        assert!(matches!(parse_id("99-99-99"), Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(parse_id(""), Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(
            parse_id("999999999999999999999999"),
            Err(ServiceError::InvalidIdentifier(_))
        ));

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn require_text_keeps_text_and_rejects_blank() {
        assert_eq!(require_text(Some("  Work "), "name").unwrap(), "  Work ");
        assert!(matches!(require_text(Some("   "), "name"), Err(ServiceError::MissingField("name"))));
        assert!(matches!(require_text(None, "name"), Err(ServiceError::MissingField("name"))));
    }

    #[test]
    fn unique_violation_becomes_duplicate_name() {
        let err: ServiceError = StorageError::UniqueViolation { collection: Collection::Tags }.into();
        assert_eq!(err.to_string(), "The tag name already exists");

        let err: ServiceError = StorageError::Unavailable("down".into()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}
