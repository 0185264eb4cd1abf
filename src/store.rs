//! State containers for buildings and weekly plans.
//!
//! Each store owns its list and a [`ListStorage`](crate::storage::ListStorage)
//! collaborator. Mutations are expressed as actions, reduced against a copy of
//! the list, written through the collaborator, and only then committed. A
//! failed write leaves the in-memory list as it was.

mod building;
mod plan;

use uuid::Uuid;

use crate::storage::StorageError;

pub use building::BuildingStore;
pub use plan::PlanStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("building not found: {0}")]
    BuildingNotFound(Uuid),

    #[error("weekly plan not found: {0}")]
    PlanNotFound(Uuid),

    #[error("failed to persist: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// Anything a store keeps, addressed by id.
trait Record {
    fn id(&self) -> Uuid;
}

impl Record for crate::model::Building {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for crate::model::WeeklyPlan {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Replaces the record sharing `record`'s id. Returns whether one was found.
fn replace_by_id<T: Record>(items: &mut [T], record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Removes the record with `id`. Returns whether one was found.
fn remove_by_id<T: Record>(items: &mut Vec<T>, id: Uuid) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
