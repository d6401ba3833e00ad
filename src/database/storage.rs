use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{NamedEntity, NewNote, Note};

/// Errors surfaced by any `Storage` backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Duplicate value for unique key {collection}.name")]
    UniqueViolation { collection: Collection },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl StorageError {
    /// Classify a write failure against `collection`, singling out unique-key conflicts.
    pub fn from_write(err: sqlx::Error, collection: Collection) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                return StorageError::UniqueViolation { collection };
            }
        }
        Self::from_read(err)
    }

    pub fn from_read(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::Unavailable(err.to_string())
            }
            sqlx::Error::Io(io) => StorageError::Unavailable(io.to_string()),
            other => StorageError::Sqlx(other),
        }
    }
}

/// Collections holding `{ id, name }` entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Folders,
    Tags,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Folders => "folders",
            Collection::Tags => "tags",
        }
    }

    /// Singular label used in client-facing messages
    pub fn singular(&self) -> &'static str {
        match self {
            Collection::Folders => "folder",
            Collection::Tags => "tag",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A field holding references to a parent entity, cleaned up when that parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    /// `notes.folder_id`, cleared to null
    NoteFolder,
    /// `notes.tags`, the referenced id is pulled out of the list
    NoteTags,
    /// `tags.tags`, the referenced id is pulled out of the list
    TagTags,
}

impl ReferenceField {
    pub fn describe(&self) -> &'static str {
        match self {
            ReferenceField::NoteFolder => "notes.folder_id",
            ReferenceField::NoteTags => "notes.tags",
            ReferenceField::TagTags => "tags.tags",
        }
    }
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Document-store operations the folder, tag and note handlers are built on.
///
/// Every method is a single write or read with per-document atomicity at best.
/// Nothing here spans more than one collection.
#[async_trait]
pub trait Storage: Send + Sync {
    /// All entities of `collection`, sorted by name ascending
    async fn find(&self, collection: Collection) -> Result<Vec<NamedEntity>, StorageError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError>;

    /// Insert a new entity; fails with `UniqueViolation` when `name` is taken
    async fn create(&self, collection: Collection, name: &str) -> Result<NamedEntity, StorageError>;

    /// Replace `name` and return the updated entity, or `None` if no row matched
    async fn find_by_id_and_update(
        &self,
        collection: Collection,
        id: Uuid,
        name: &str,
    ) -> Result<Option<NamedEntity>, StorageError>;

    /// Remove and return the entity, or `None` if no row matched
    async fn find_by_id_and_remove(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError>;

    /// Drop every reference to `id` held in `field`; returns the number of documents touched
    async fn update_many(&self, field: ReferenceField, id: Uuid) -> Result<u64, StorageError>;

    /// All notes, sorted by title ascending
    async fn find_notes(&self) -> Result<Vec<Note>, StorageError>;

    async fn find_note_by_id(&self, id: Uuid) -> Result<Option<Note>, StorageError>;

    async fn create_note(&self, note: NewNote) -> Result<Note, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;

    /// Release underlying connections on shutdown
    async fn close(&self) {}
}
