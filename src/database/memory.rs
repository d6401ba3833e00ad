use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{NamedEntity, NewNote, Note};
use crate::database::storage::{Collection, ReferenceField, Storage, StorageError};

#[derive(Default)]
struct Documents {
    named: HashMap<Collection, HashMap<Uuid, NamedEntity>>,
    /// Per-tag reference list (`tags.tags`)
    tag_references: HashMap<Uuid, Vec<Uuid>>,
    notes: HashMap<Uuid, Note>,
}

impl Documents {
    fn collection(&self, collection: Collection) -> Option<&HashMap<Uuid, NamedEntity>> {
        self.named.get(&collection)
    }

    fn name_taken(&self, collection: Collection, name: &str, except: Option<Uuid>) -> bool {
        self.collection(collection)
            .map(|rows| {
                rows.values()
                    .any(|row| row.name == name && Some(row.id) != except)
            })
            .unwrap_or(false)
    }
}

/// In-process store with the same observable semantics as `PgStorage`.
///
/// Each call takes the lock once, so single operations are atomic and
/// nothing spans two calls.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<Documents>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `referenced` to the reference list of `tag`.
    pub async fn add_tag_reference(&self, tag: Uuid, referenced: Uuid) {
        let mut documents = self.documents.write().await;
        documents.tag_references.entry(tag).or_default().push(referenced);
    }

    pub async fn tag_references(&self, tag: Uuid) -> Vec<Uuid> {
        let documents = self.documents.read().await;
        documents
            .tag_references
            .get(&tag)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn find(&self, collection: Collection) -> Result<Vec<NamedEntity>, StorageError> {
        let documents = self.documents.read().await;
        let mut rows: Vec<NamedEntity> = documents
            .collection(collection)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents
            .collection(collection)
            .and_then(|rows| rows.get(&id))
            .cloned())
    }

    async fn create(&self, collection: Collection, name: &str) -> Result<NamedEntity, StorageError> {
        let mut documents = self.documents.write().await;
        if documents.name_taken(collection, name, None) {
            return Err(StorageError::UniqueViolation { collection });
        }
        let row = NamedEntity::new(name);
        documents
            .named
            .entry(collection)
            .or_default()
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id_and_update(
        &self,
        collection: Collection,
        id: Uuid,
        name: &str,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let mut documents = self.documents.write().await;
        let exists = documents
            .collection(collection)
            .map_or(false, |rows| rows.contains_key(&id));
        if !exists {
            return Ok(None);
        }
        if documents.name_taken(collection, name, Some(id)) {
            return Err(StorageError::UniqueViolation { collection });
        }
        let updated = documents
            .named
            .get_mut(&collection)
            .and_then(|rows| rows.get_mut(&id))
            .map(|row| {
                row.name = name.to_string();
                row.clone()
            });
        Ok(updated)
    }

    async fn find_by_id_and_remove(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<NamedEntity>, StorageError> {
        let mut documents = self.documents.write().await;
        let removed = documents
            .named
            .get_mut(&collection)
            .and_then(|rows| rows.remove(&id));
        if removed.is_some() && collection == Collection::Tags {
            documents.tag_references.remove(&id);
        }
        Ok(removed)
    }

    async fn update_many(&self, field: ReferenceField, id: Uuid) -> Result<u64, StorageError> {
        let mut documents = self.documents.write().await;
        let mut touched = 0u64;
        match field {
            ReferenceField::NoteFolder => {
                for note in documents.notes.values_mut() {
                    if note.folder_id == Some(id) {
                        note.folder_id = None;
                        touched += 1;
                    }
                }
            }
            ReferenceField::NoteTags => {
                for note in documents.notes.values_mut() {
                    if note.tags.contains(&id) {
                        note.tags.retain(|tag| *tag != id);
                        touched += 1;
                    }
                }
            }
            ReferenceField::TagTags => {
                for references in documents.tag_references.values_mut() {
                    if references.contains(&id) {
                        references.retain(|tag| *tag != id);
                        touched += 1;
                    }
                }
            }
        }
        Ok(touched)
    }

    async fn find_notes(&self) -> Result<Vec<Note>, StorageError> {
        let documents = self.documents.read().await;
        let mut notes: Vec<Note> = documents.notes.values().cloned().collect();
        notes.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(notes)
    }

    async fn find_note_by_id(&self, id: Uuid) -> Result<Option<Note>, StorageError> {
        let documents = self.documents.read().await;
        Ok(documents.notes.get(&id).cloned())
    }

    async fn create_note(&self, note: NewNote) -> Result<Note, StorageError> {
        let mut documents = self.documents.write().await;
        let note = note.into_note(Uuid::new_v4());
        documents.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_name_within_collection() {
        let store = MemoryStorage::new();
        store.create(Collection::Folders, "Work").await.unwrap();

        let err = store.create(Collection::Folders, "Work").await.unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation { collection: Collection::Folders }));

        // Same name in a different collection is fine
        store.create(Collection::Tags, "Work").await.unwrap();
    }

    #[tokio::test]
    async fn update_to_own_name_is_not_a_conflict() {
        let store = MemoryStorage::new();
        let folder = store.create(Collection::Folders, "Work").await.unwrap();

        let updated = store
            .find_by_id_and_update(Collection::Folders, folder.id, "Work")
            .await
            .unwrap();
        assert_eq!(updated, Some(folder));
    }

    #[tokio::test]
    async fn update_many_pulls_tag_from_notes_only() {
        let store = MemoryStorage::new();
        let tag = store.create(Collection::Tags, "urgent").await.unwrap();
        let other = store.create(Collection::Tags, "later").await.unwrap();
        store.add_tag_reference(other.id, tag.id).await;
        let note = store
            .create_note(NewNote {
                title: "Groceries".into(),
                tags: vec![tag.id, other.id],
                ..Default::default()
            })
            .await
            .unwrap();

        let touched = store.update_many(ReferenceField::NoteTags, tag.id).await.unwrap();
        assert_eq!(touched, 1);

        let note = store.find_note_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(note.tags, vec![other.id]);
        assert_eq!(store.tag_references(other.id).await, vec![tag.id]);
    }

    #[tokio::test]
    async fn find_sorts_by_byte_order() {
        let store = MemoryStorage::new();
        for name in ["apple", "Banana", "cherry"] {
            store.create(Collection::Tags, name).await.unwrap();
        }

        let names: Vec<String> = store
            .find(Collection::Tags)
            .await
            .unwrap()
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        assert_eq!(names, vec!["Banana", "apple", "cherry"]);
    }

    #[tokio::test]
    async fn update_of_missing_row_ignores_taken_name() {
        let store = MemoryStorage::new();
        store.create(Collection::Folders, "Work").await.unwrap();

        let updated = store
            .find_by_id_and_update(Collection::Folders, Uuid::new_v4(), "Work")
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn remove_missing_row_returns_none() {
        let store = MemoryStorage::new();
        let removed = store
            .find_by_id_and_remove(Collection::Folders, Uuid::new_v4())
            .await
            .unwrap();
        assert!(removed.is_none());
    }
}
