//! Building store: the project list, newest first.

use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{Building, NewBuilding};
use crate::storage::ListStorage;

use super::{Result, StoreError, remove_by_id, replace_by_id};

/// Everything that can happen to the building list.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildingAction {
    /// Replace the whole list with what was read from storage.
    Load(Vec<Building>),
    Add(Building),
    Update(Building),
    Delete(Uuid),
}

pub struct BuildingStore<P> {
    buildings: Vec<Building>,
    load_error: Option<String>,
    persist: P,
}

impl<P: ListStorage<Building>> BuildingStore<P> {
    /// Opens the store, reading the prior list from `persist`.
    ///
    /// A failed read is not fatal: the store starts empty and the failure is
    /// kept in [`load_error`](Self::load_error).
    pub fn open(persist: P) -> Self {
        let mut store = Self {
            buildings: Vec::new(),
            load_error: None,
            persist,
        };
        match store.persist.load() {
            Ok(buildings) => {
                reduce(&mut store.buildings, BuildingAction::Load(buildings));
            }
            Err(e) => {
                warn!(error = %e, "failed to load buildings, starting empty");
                store.load_error = Some(format!("failed to load buildings: {e}"));
            }
        }
        store
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn get(&self, id: Uuid) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// The read failure from [`open`](Self::open), if there was one.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Adds a building at the front of the list. Returns its new id.
    pub fn add(&mut self, building: NewBuilding) -> Result<Uuid> {
        let building = building.with_id(Uuid::new_v4());
        let id = building.id;
        self.dispatch(BuildingAction::Add(building))?;
        info!(%id, "added building");
        Ok(id)
    }

    /// Replaces the building with the same id.
    pub fn update(&mut self, building: Building) -> Result<()> {
        let id = building.id;
        self.dispatch(BuildingAction::Update(building))?;
        info!(%id, "updated building");
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.dispatch(BuildingAction::Delete(id))?;
        info!(%id, "deleted building");
        Ok(())
    }

    /// Applies an action and persists the resulting list.
    ///
    /// The write happens before the new list is committed. Unknown ids leave
    /// both memory and storage untouched.
    pub fn dispatch(&mut self, action: BuildingAction) -> Result<()> {
        let mut next = self.buildings.clone();
        if let Some(missing) = reduce(&mut next, action) {
            return Err(StoreError::BuildingNotFound(missing));
        }
        self.persist.save(&next)?;
        self.buildings = next;
        Ok(())
    }

    #[cfg(test)]
    pub fn persistence(&self) -> &P {
        &self.persist
    }
}

/// Applies `action` to `buildings`. Returns the id that was not found, if any.
fn reduce(buildings: &mut Vec<Building>, action: BuildingAction) -> Option<Uuid> {
    match action {
        BuildingAction::Load(loaded) => {
            *buildings = loaded;
            None
        }
        BuildingAction::Add(building) => {
            buildings.insert(0, building);
            None
        }
        BuildingAction::Update(building) => {
            let id = building.id;
            (!replace_by_id(buildings, building)).then_some(id)
        }
        BuildingAction::Delete(id) => (!remove_by_id(buildings, id)).then_some(id),
    }
}
