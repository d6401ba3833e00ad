use std::sync::Arc;
use tracing::info;

use crate::database::models::NamedEntity;
use crate::database::{Collection, Storage};

use super::{parse_id, require_text, ServiceError};

/// List / get / create / update for one `{ id, name }` collection.
/// Deletes go through `CleanupCoordinator`.
#[derive(Clone)]
pub struct CatalogService {
    storage: Arc<dyn Storage>,
    collection: Collection,
}

impl CatalogService {
    pub fn new(storage: Arc<dyn Storage>, collection: Collection) -> Self {
        Self {
            storage,
            collection,
        }
    }

    pub fn folders(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, Collection::Folders)
    }

    pub fn tags(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, Collection::Tags)
    }

    /// All entities sorted by name ascending
    pub async fn list(&self) -> Result<Vec<NamedEntity>, ServiceError> {
        Ok(self.storage.find(self.collection).await?)
    }

    pub async fn get(&self, raw_id: &str) -> Result<NamedEntity, ServiceError> {
        let id = parse_id(raw_id)?;
        self.storage
            .find_by_id(self.collection, id)
            .await?
            .ok_or(ServiceError::NotFound {
                collection: self.collection.singular(),
                id,
            })
    }

    pub async fn create(&self, name: Option<&str>) -> Result<NamedEntity, ServiceError> {
        let name = require_text(name, "name")?;
        let created = self.storage.create(self.collection, &name).await?;
        info!("Created {} {} ({:?})", self.collection.singular(), created.id, created.name);
        Ok(created)
    }

    /// Name is validated before the id.
    pub async fn update(&self, raw_id: &str, name: Option<&str>) -> Result<NamedEntity, ServiceError> {
        let name = require_text(name, "name")?;
        let id = parse_id(raw_id)?;
        self.storage
            .find_by_id_and_update(self.collection, id, &name)
            .await?
            .ok_or(ServiceError::NotFound {
                collection: self.collection.singular(),
                id,
            })
    }
}
