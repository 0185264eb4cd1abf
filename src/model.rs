//! Core data model for Obra.
//!
//! Buildings own weekly plans; plans carry tasks. Weekly activities are the
//! transient, editable view of those tasks.

mod activity;
mod building;
mod plan;

pub use activity::{Compliance, DayCode, WeekDays, WeeklyActivity};
pub use building::{Building, BuildingStatus, NewBuilding};
pub use plan::{NewPlan, Task, TaskStatus, WeeklyPlan};
