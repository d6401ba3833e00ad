use serde::Deserialize;
use std::sync::Arc;

use crate::database::models::{NewNote, Note};
use crate::database::Storage;

use super::{parse_id, require_text, ServiceError};

/// Raw note payload as posted by clients
#[derive(Debug, Default, Deserialize)]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "folderId")]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Read/create access to notes, the entities folder and tag deletes clean up after.
#[derive(Clone)]
pub struct NoteService {
    storage: Arc<dyn Storage>,
}

impl NoteService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Note>, ServiceError> {
        Ok(self.storage.find_notes().await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Note, ServiceError> {
        let id = parse_id(raw_id)?;
        self.storage
            .find_note_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound { collection: "note", id })
    }

    /// Referenced ids must be well formed; whether they exist is not checked.
    pub async fn create(&self, input: NoteInput) -> Result<Note, ServiceError> {
        let title = require_text(input.title.as_deref(), "title")?;
        let folder_id = match input.folder_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw)?),
        };
        let tags = input
            .tags
            .iter()
            .map(|raw| parse_id(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let note = NewNote {
            title,
            content: input.content,
            folder_id,
            tags,
        };
        Ok(self.storage.create_note(note).await?)
    }
}
