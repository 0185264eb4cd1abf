//! Weekly plans and the tasks they carry.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One week of planned work on a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: Uuid,
    pub building_id: Uuid,

    /// ISO week of the creation moment. Fixed once created.
    pub week_number: i8,

    /// ISO week-numbering year of the creation moment.
    pub year: i16,

    pub tasks: Vec<Task>,

    /// Percent Plan Complete, 0 to 100.
    pub ppc: u8,

    pub created: Timestamp,
    pub updated: Timestamp,

    /// Embedded image data (`data:` URL) for the week's report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_image: Option<String>,
}

/// A weekly plan before the store has stamped it.
///
/// The store fills in id, week, year and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub building_id: Uuid,
    pub tasks: Vec<Task>,
    pub ppc: u8,
    pub report_image: Option<String>,
}

/// A unit of planned work as it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub area: String,
    pub team: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: TaskStatus,

    #[serde(default)]
    pub constraints: Vec<String>,

    #[serde(default)]
    pub assigned_to: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<Timestamp>,

    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_json_uses_camel_case_and_omits_absent_report() {
        let now = Timestamp::new(1_700_000_000, 0).unwrap();
        let plan = WeeklyPlan {
            id: Uuid::nil(),
            building_id: Uuid::nil(),
            week_number: 46,
            year: 2023,
            tasks: vec![],
            ppc: 0,
            created: now,
            updated: now,
            report_image: None,
        };

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["weekNumber"], 46);
        assert_eq!(json["buildingId"], Uuid::nil().to_string());
        assert!(json.get("reportImage").is_none());
    }

    #[test]
    fn task_tolerates_missing_collections() {
        let json = r#"{
            "id": "1",
            "description": "Pour slab",
            "area": "PASTILLA 5",
            "team": "DIM",
            "startDate": "2024-01-08T09:00:00Z",
            "endDate": "2024-01-08T09:00:00Z",
            "status": "blocked"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Blocked);
        assert!(task.constraints.is_empty());
        assert!(task.assigned_to.is_empty());
        assert!(task.images.is_empty());
        assert!(task.completed_date.is_none());
    }
}
