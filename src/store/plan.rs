//! Weekly-plan store: every building's weekly plans, newest first.

use jiff::{Timestamp, Zoned};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dates::IsoWeek;
use crate::model::{NewPlan, WeeklyPlan};
use crate::storage::ListStorage;

use super::{Result, StoreError, remove_by_id, replace_by_id};

/// Everything that can happen to the plan list.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Replace the whole list with what was read from storage.
    Load(Vec<WeeklyPlan>),
    Add(WeeklyPlan),
    Update(WeeklyPlan),
    Delete(Uuid),
}

pub struct PlanStore<P> {
    plans: Vec<WeeklyPlan>,
    load_error: Option<String>,
    persist: P,
}

impl<P: ListStorage<WeeklyPlan>> PlanStore<P> {
    /// Opens the store, reading the prior list from `persist`.
    ///
    /// Read failures leave the store empty with [`load_error`](Self::load_error) set.
    pub fn open(persist: P) -> Self {
        let mut store = Self {
            plans: Vec::new(),
            load_error: None,
            persist,
        };
        match store.persist.load() {
            Ok(plans) => {
                reduce(&mut store.plans, PlanAction::Load(plans));
            }
            Err(e) => {
                warn!(error = %e, "failed to load weekly plans, starting empty");
                store.load_error = Some(format!("failed to load weekly plans: {e}"));
            }
        }
        store
    }

    pub fn plans(&self) -> &[WeeklyPlan] {
        &self.plans
    }

    pub fn get(&self, id: Uuid) -> Option<&WeeklyPlan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Plans belonging to one building, in store order.
    pub fn for_building(&self, building_id: Uuid) -> impl Iterator<Item = &WeeklyPlan> {
        self.plans.iter().filter(move |p| p.building_id == building_id)
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Adds a plan stamped with the ISO week and time of `now`.
    pub fn add_at(&mut self, plan: NewPlan, now: &Zoned) -> Result<Uuid> {
        let week = IsoWeek::of(now.date());
        let stamp = now.timestamp();
        let plan = WeeklyPlan {
            id: Uuid::new_v4(),
            building_id: plan.building_id,
            week_number: week.week,
            year: week.year,
            tasks: plan.tasks,
            ppc: plan.ppc,
            created: stamp,
            updated: stamp,
            report_image: plan.report_image,
        };
        let id = plan.id;
        self.dispatch(PlanAction::Add(plan))?;
        info!(%id, week = week.week, year = week.year, "added weekly plan");
        Ok(id)
    }

    /// Replaces a plan's contents with `updated` set to `now`.
    ///
    /// Week, year, creation time and owning building stay as stored.
    pub fn update_at(&mut self, plan: WeeklyPlan, now: Timestamp) -> Result<()> {
        let stored = self.get(plan.id).ok_or(StoreError::PlanNotFound(plan.id))?;
        let plan = WeeklyPlan {
            building_id: stored.building_id,
            week_number: stored.week_number,
            year: stored.year,
            created: stored.created,
            updated: now,
            ..plan
        };
        let id = plan.id;
        self.dispatch(PlanAction::Update(plan))?;
        info!(%id, "updated weekly plan");
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.dispatch(PlanAction::Delete(id))?;
        info!(%id, "deleted weekly plan");
        Ok(())
    }

    /// Applies an action and writes the resulting list before committing it.
    pub fn dispatch(&mut self, action: PlanAction) -> Result<()> {
        let mut next = self.plans.clone();
        if let Some(missing) = reduce(&mut next, action) {
            return Err(StoreError::PlanNotFound(missing));
        }
        self.persist.save(&next)?;
        self.plans = next;
        Ok(())
    }

    #[cfg(test)]
    pub fn persistence(&self) -> &P {
        &self.persist
    }
}

/// Applies `action` to `plans`. Returns the id that was not found, if any.
fn reduce(plans: &mut Vec<WeeklyPlan>, action: PlanAction) -> Option<Uuid> {
    match action {
        PlanAction::Load(loaded) => {
            *plans = loaded;
            None
        }
        PlanAction::Add(plan) => {
            plans.insert(0, plan);
            None
        }
        PlanAction::Update(plan) => {
            let id = plan.id;
            (!replace_by_id(plans, plan)).then_some(id)
        }
        PlanAction::Delete(id) => (!remove_by_id(plans, id)).then_some(id),
    }
}
