use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    #[serde(rename = "folderId")]
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Uuid>,
}

/// Validated input for a note insert. Referenced ids are not checked for existence.
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Uuid>,
}

impl NewNote {
    pub fn into_note(self, id: Uuid) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            folder_id: self.folder_id,
            tags: self.tags,
        }
    }
}
