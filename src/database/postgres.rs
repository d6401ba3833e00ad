use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{NamedEntity, NewNote, Note};
use crate::database::storage::{Collection, ReferenceField, Storage, StorageError};

/// Table bootstrap. `notes.folder_id` has no foreign key; dangling
/// references are cleared on folder delete.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS folders (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS tags (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        tags UUID[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT,
        folder_id UUID,
        tags UUID[] NOT NULL DEFAULT '{}'
    )",
    "CREATE INDEX IF NOT EXISTS notes_folder_id_idx ON notes (folder_id)",
];

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they are missing. Safe to run on every start.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(StorageError::from_read)?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn find(&self, collection: Collection) -> Result<Vec<NamedEntity>, StorageError> {
        let sql = format!("SELECT id, name FROM {} ORDER BY name COLLATE \"C\" ASC", collection.table());
        sqlx::query_as::<_, NamedEntity>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from_read)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let sql = format!("SELECT id, name FROM {} WHERE id = $1", collection.table());
        sqlx::query_as::<_, NamedEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from_read)
    }

    async fn create(&self, collection: Collection, name: &str) -> Result<NamedEntity, StorageError> {
        let sql = format!(
            "INSERT INTO {} (id, name) VALUES ($1, $2) RETURNING id, name",
            collection.table()
        );
        sqlx::query_as::<_, NamedEntity>(&sql)
            .bind(Uuid::new_v4())
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, collection))
    }

    async fn find_by_id_and_update(
        &self,
        collection: Collection,
        id: Uuid,
        name: &str,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let sql = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            collection.table()
        );
        sqlx::query_as::<_, NamedEntity>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, collection))
    }

    async fn find_by_id_and_remove(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING id, name", collection.table());
        sqlx::query_as::<_, NamedEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from_read)
    }

    async fn update_many(&self, field: ReferenceField, id: Uuid) -> Result<u64, StorageError> {
        let sql = match field {
            ReferenceField::NoteFolder => "UPDATE notes SET folder_id = NULL WHERE folder_id = $1",
            ReferenceField::NoteTags => {
                "UPDATE notes SET tags = array_remove(tags, $1) WHERE $1 = ANY(tags)"
            }
            ReferenceField::TagTags => {
                "UPDATE tags SET tags = array_remove(tags, $1) WHERE $1 = ANY(tags)"
            }
        };
        let result = sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_read)?;
        Ok(result.rows_affected())
    }

    async fn find_notes(&self) -> Result<Vec<Note>, StorageError> {
        sqlx::query_as::<_, Note>(
            "SELECT id, title, content, folder_id, tags FROM notes ORDER BY title COLLATE \"C\" ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_read)
    }

    async fn find_note_by_id(&self, id: Uuid) -> Result<Option<Note>, StorageError> {
        sqlx::query_as::<_, Note>(
            "SELECT id, title, content, folder_id, tags FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from_read)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note, StorageError> {
        sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, title, content, folder_id, tags)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, content, folder_id, tags",
        )
        .bind(Uuid::new_v4())
        .bind(note.title)
        .bind(note.content)
        .bind(note.folder_id)
        .bind(note.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from_read)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_read)?;
        Ok(())
    }

    async fn close(&self) {
        DatabaseManager::close(&self.pool).await;
    }
}
