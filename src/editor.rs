//! The weekly plan editor.
//!
//! Holding a [`PlanEditor`] is the editing state; not holding one is idle.
//! The editor buffers activities and images in memory. Nothing reaches the
//! store until [`save`](PlanEditor::save), which consumes the editor.
//! Dropping it (or calling [`cancel`](PlanEditor::cancel)) discards the buffer.
//!
//! Activity ids are always their 1-based position in the buffer. Removing a
//! row renumbers the ones after it.

use jiff::Zoned;
use tracing::debug;
use uuid::Uuid;

use crate::model::{Compliance, DayCode, NewPlan, WeeklyActivity, WeeklyPlan};
use crate::storage::ListStorage;
use crate::store::{PlanStore, StoreError};
use crate::transform::{activities_to_tasks, compute_ppc, plan_images, tasks_to_activities};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no activity #{0} in this plan")]
    NoSuchActivity(u32),

    #[error("no image #{0} attached")]
    NoSuchImage(usize),

    #[error("images are kept on activities: add at least one activity before attaching images")]
    ImagesWithoutActivities,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a save will do.
#[derive(Debug, Clone)]
enum Target {
    /// Add a plan for this building.
    New { building_id: Uuid },

    /// Update this stored plan.
    Existing(WeeklyPlan),
}

#[derive(Debug, Clone)]
pub struct PlanEditor {
    target: Target,
    activities: Vec<WeeklyActivity>,
    images: Vec<String>,
    report_image: Option<String>,
}

impl PlanEditor {
    /// Starts an empty plan for a building.
    pub fn new_plan(building_id: Uuid) -> Self {
        Self {
            target: Target::New { building_id },
            activities: Vec::new(),
            images: Vec::new(),
            report_image: None,
        }
    }

    /// Reopens a stored plan.
    ///
    /// Week-day schedules are not stored, so every row starts unscheduled.
    pub fn edit(plan: &WeeklyPlan) -> Self {
        Self {
            activities: tasks_to_activities(&plan.tasks),
            images: plan_images(&plan.tasks),
            report_image: plan.report_image.clone(),
            target: Target::Existing(plan.clone()),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self.target, Target::New { .. })
    }

    pub fn activities(&self) -> &[WeeklyActivity] {
        &self.activities
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Live PPC of the buffer.
    pub fn ppc(&self) -> u8 {
        compute_ppc(&self.activities)
    }

    /// Appends a blank row and returns it for filling in.
    pub fn add_activity(&mut self) -> &mut WeeklyActivity {
        self.push_activity(WeeklyActivity::default())
    }

    /// Appends `activity`, assigning it the next position as id.
    pub fn push_activity(&mut self, mut activity: WeeklyActivity) -> &mut WeeklyActivity {
        activity.id = self.next_id();
        let index = self.activities.len();
        self.activities.push(activity);
        &mut self.activities[index]
    }

    /// Replaces the whole buffer, renumbering the rows.
    pub fn replace_activities(&mut self, activities: Vec<WeeklyActivity>) {
        self.activities = activities;
        self.renumber();
    }

    pub fn activity_mut(&mut self, id: u32) -> Result<&mut WeeklyActivity, EditorError> {
        self.activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(EditorError::NoSuchActivity(id))
    }

    /// Marks an activity's outcome for the week.
    ///
    /// A reason, when given, becomes the non-conformity reason.
    pub fn set_compliance(
        &mut self,
        id: u32,
        ppc: Compliance,
        reason: Option<&str>,
    ) -> Result<(), EditorError> {
        let activity = self.activity_mut(id)?;
        activity.ppc = ppc;
        if let Some(reason) = reason {
            activity.non_conformity_reason = reason.to_string();
        }
        Ok(())
    }

    #[allow(dead_code)] // Day schedules are not persisted, so the CLI never sets them.
    pub fn toggle_day(&mut self, id: u32, day: DayCode) -> Result<(), EditorError> {
        self.activity_mut(id)?.week_days.toggle(day);
        Ok(())
    }

    pub fn remove_activity(&mut self, id: u32) -> Result<WeeklyActivity, EditorError> {
        let index = self
            .activities
            .iter()
            .position(|a| a.id == id)
            .ok_or(EditorError::NoSuchActivity(id))?;
        let removed = self.activities.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Attaches embedded image data to every task of the plan.
    pub fn attach_image(&mut self, data: String) {
        self.images.push(data);
    }

    /// Detaches the image at 1-based `number`.
    pub fn remove_image(&mut self, number: usize) -> Result<String, EditorError> {
        if number == 0 || number > self.images.len() {
            return Err(EditorError::NoSuchImage(number));
        }
        Ok(self.images.remove(number - 1))
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    pub fn set_report_image(&mut self, data: Option<String>) {
        self.report_image = data;
    }

    /// Commits the buffer to the store. Returns the plan id.
    pub fn save<P: ListStorage<WeeklyPlan>>(
        self,
        plans: &mut PlanStore<P>,
    ) -> Result<Uuid, EditorError> {
        self.save_at(plans, &Zoned::now())
    }

    /// Commits the buffer as of `now`: task dates, new-plan week, `updated`.
    ///
    /// Images live on tasks, so a buffer with images and no activities is
    /// refused rather than saved without them.
    pub fn save_at<P: ListStorage<WeeklyPlan>>(
        self,
        plans: &mut PlanStore<P>,
        now: &Zoned,
    ) -> Result<Uuid, EditorError> {
        if self.activities.is_empty() && !self.images.is_empty() {
            return Err(EditorError::ImagesWithoutActivities);
        }

        let tasks = activities_to_tasks(&self.activities, &self.images, now.timestamp());
        let ppc = compute_ppc(&self.activities);
        debug!(activities = self.activities.len(), ppc, "saving plan editor");

        match self.target {
            Target::New { building_id } => Ok(plans.add_at(
                NewPlan {
                    building_id,
                    tasks,
                    ppc,
                    report_image: self.report_image,
                },
                now,
            )?),
            Target::Existing(plan) => {
                let id = plan.id;
                plans.update_at(
                    WeeklyPlan {
                        tasks,
                        ppc,
                        report_image: self.report_image,
                        ..plan
                    },
                    now.timestamp(),
                )?;
                Ok(id)
            }
        }
    }

    /// Leaves editing without touching the store.
    pub fn cancel(self) {
        debug!(activities = self.activities.len(), "discarded plan editor");
    }

    fn next_id(&self) -> u32 {
        u32::try_from(self.activities.len()).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    fn renumber(&mut self) {
        for (activity, position) in self.activities.iter_mut().zip(1..) {
            activity.id = position;
        }
    }
}
