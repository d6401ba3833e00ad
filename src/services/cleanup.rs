use futures::future::join;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::TagCascadeTarget;
use crate::database::{Collection, ReferenceField, Storage, StorageError};

use super::{parse_id, ServiceError};

/// Outcome of one half of a cascading delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Applied,
    Failed,
}

impl Phase {
    fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Phase::Applied
        } else {
            Phase::Failed
        }
    }
}

/// Both writes of a cascade completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// False when no entity had this id; the delete still counts as done
    pub parent_removed: bool,
    pub references_cleared: u64,
}

/// At least one write of a cascade failed. The other write is not rolled back,
/// so `parent` and `references` describe what is now in storage.
#[derive(Debug, Error)]
#[error("delete of {collection} {id} incomplete (parent: {parent:?}, {field}: {references:?})")]
pub struct CascadeError {
    pub collection: Collection,
    pub id: Uuid,
    pub field: ReferenceField,
    pub parent: Phase,
    pub references: Phase,
    #[source]
    pub source: StorageError,
}

/// Deletes a folder or tag and, concurrently, removes references to it.
///
/// The two writes are submitted together and awaited together. There is no
/// ordering between them and no transaction around them: a reader can observe
/// the parent gone while references remain, or the reverse, until both settle.
#[derive(Clone)]
pub struct CleanupCoordinator {
    storage: Arc<dyn Storage>,
    tag_field: ReferenceField,
}

impl CleanupCoordinator {
    pub fn new(storage: Arc<dyn Storage>, tag_target: TagCascadeTarget) -> Self {
        Self {
            storage,
            tag_field: tag_target.reference_field(),
        }
    }

    /// The reference list cleaned on tag delete
    pub fn tag_field(&self) -> ReferenceField {
        self.tag_field
    }

    /// Remove the folder and clear `folder_id` on every note pointing at it.
    pub async fn delete_folder(&self, raw_id: &str) -> Result<CascadeReport, ServiceError> {
        let id = parse_id(raw_id)?;
        Ok(self
            .cascade(Collection::Folders, id, ReferenceField::NoteFolder)
            .await?)
    }

    /// Remove the tag and pull its id out of the configured reference list.
    pub async fn delete_tag(&self, raw_id: &str) -> Result<CascadeReport, ServiceError> {
        let id = parse_id(raw_id)?;
        Ok(self.cascade(Collection::Tags, id, self.tag_field).await?)
    }

    async fn cascade(
        &self,
        collection: Collection,
        id: Uuid,
        field: ReferenceField,
    ) -> Result<CascadeReport, CascadeError> {
        debug!("Cascading delete of {} {} into {}", collection.singular(), id, field);

        let (removed, cleared) = join(
            self.storage.find_by_id_and_remove(collection, id),
            self.storage.update_many(field, id),
        )
        .await;

        match (removed, cleared) {
            (Ok(removed), Ok(cleared)) => {
                let report = CascadeReport {
                    parent_removed: removed.is_some(),
                    references_cleared: cleared,
                };
                info!(
                    "Deleted {} {} (removed: {}, {} references cleared in {})",
                    collection.singular(),
                    id,
                    report.parent_removed,
                    report.references_cleared,
                    field
                );
                Ok(report)
            }
            (Err(source), cleared) => {
                let references = Phase::of(&cleared);
                if let Err(other) = &cleared {
                    warn!("Reference cleanup in {} for {} also failed: {}", field, id, other);
                }
                Err(self.incomplete(collection, id, field, Phase::Failed, references, source))
            }
            (Ok(_), Err(source)) => {
                Err(self.incomplete(collection, id, field, Phase::Applied, Phase::Failed, source))
            }
        }
    }

    fn incomplete(
        &self,
        collection: Collection,
        id: Uuid,
        field: ReferenceField,
        parent: Phase,
        references: Phase,
        source: StorageError,
    ) -> CascadeError {
        let err = CascadeError {
            collection,
            id,
            field,
            parent,
            references,
            source,
        };
        warn!("{}: {}", err, err.source);
        err
    }
}
