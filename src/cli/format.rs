//! Output formatting for CLI display.

use uuid::Uuid;

use crate::dates;
use crate::model::{Building, Compliance, WeeklyActivity, WeeklyPlan};

/// First eight hex digits of an id.
pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// One line per building for `building list`.
pub(super) fn format_building(building: &Building) -> String {
    format!(
        "{}  [{}] {:>3}%  {} — {} ({} → {})",
        short_id(building.id),
        building.status.label(),
        building.progress,
        building.name,
        building.location,
        building.start_date,
        building.expected_end_date,
    )
}

/// One line per plan for `plan list`.
pub(super) fn format_plan(plan: &WeeklyPlan) -> String {
    format!(
        "{}  Week {}, {}  PPC {:>3}%  {} task(s)  created {}",
        short_id(plan.id),
        plan.week_number,
        plan.year,
        plan.ppc,
        plan.tasks.len(),
        dates::format_date_short(dates::local_date(plan.created)),
    )
}

/// One table row per activity for `plan show`.
pub(super) fn format_activity(activity: &WeeklyActivity) -> String {
    let mark = match activity.ppc {
        Compliance::Compliant => "✓",
        Compliance::NonCompliant => "✗",
        Compliance::Pending => "·",
    };
    let mut line = format!(
        "{:>3}  {mark}  {}  [{}] {}",
        activity.id, activity.description, activity.zone, activity.company
    );
    if !activity.week_days.is_empty() {
        line.push_str(&format!("  {}", activity.week_days.render()));
    }
    if !activity.non_conformity_reason.is_empty() {
        line.push_str(&format!("  — {}", activity.non_conformity_reason));
    }
    line
}
