use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row shape shared by folders and tags: `{ id, name }` with `name` unique per collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NamedEntity {
    pub id: Uuid,
    pub name: String,
}

pub type Folder = NamedEntity;
pub type Tag = NamedEntity;

impl NamedEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
