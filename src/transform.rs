//! Mapping between editable activity rows and persisted tasks, plus PPC.
//!
//! The mapping is lossy in both directions. Tasks carry no day schedule, so
//! activities come back with every week day unset. Activities carry no dates
//! or ids, so saved tasks get the save moment and their position instead.

use std::collections::BTreeSet;

use jiff::Timestamp;

use crate::model::{Compliance, Task, TaskStatus, WeekDays, WeeklyActivity};

/// Rebuilds editor rows from a plan's tasks.
///
/// Each activity's id is its 1-based position, not the task's stored id.
pub fn tasks_to_activities(tasks: &[Task]) -> Vec<WeeklyActivity> {
    tasks
        .iter()
        .zip(1..)
        .map(|(task, position)| WeeklyActivity {
            id: position,
            description: task.description.clone(),
            zone: task.area.clone(),
            sub_zone: String::new(),
            company: task.team.clone(),
            week_days: WeekDays::default(),
            ppc: compliance_of(task.status),
            non_conformity_id: String::new(),
            non_conformity_reason: task.constraints.join(", "),
        })
        .collect()
}

/// Turns editor rows into tasks stamped at `now`.
///
/// Every task gets the plan's `images`. Task ids are the 1-based position.
pub fn activities_to_tasks(
    activities: &[WeeklyActivity],
    images: &[String],
    now: Timestamp,
) -> Vec<Task> {
    activities
        .iter()
        .zip(1..)
        .map(|(activity, position): (&WeeklyActivity, u32)| {
            let status = status_of(activity.ppc);
            Task {
                id: position.to_string(),
                description: activity.description.clone(),
                area: activity.zone.clone(),
                team: activity.company.clone(),
                start_date: now,
                end_date: now,
                status,
                constraints: if activity.non_conformity_reason.is_empty() {
                    Vec::new()
                } else {
                    vec![activity.non_conformity_reason.clone()]
                },
                assigned_to: BTreeSet::new(),
                completed_date: (status == TaskStatus::Completed).then_some(now),
                images: images.to_vec(),
            }
        })
        .collect()
}

/// Percent Plan Complete: compliant activities over all activities, rounded.
///
/// Zero when there are no activities.
pub fn compute_ppc(activities: &[WeeklyActivity]) -> u8 {
    let total = activities.len();
    if total == 0 {
        return 0;
    }
    let compliant = activities
        .iter()
        .filter(|a| a.ppc == Compliance::Compliant)
        .count();
    // Integer round-half-up of 100 * compliant / total.
    let percent = (200 * compliant + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}

/// Images carried by a plan's tasks, first-seen order, without repeats.
pub fn plan_images(tasks: &[Task]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tasks
        .iter()
        .flat_map(|t| &t.images)
        .filter(|image| seen.insert(*image))
        .cloned()
        .collect()
}

fn status_of(ppc: Compliance) -> TaskStatus {
    match ppc {
        Compliance::Compliant => TaskStatus::Completed,
        Compliance::NonCompliant => TaskStatus::Blocked,
        Compliance::Pending => TaskStatus::Pending,
    }
}

fn compliance_of(status: TaskStatus) -> Compliance {
    match status {
        TaskStatus::Completed => Compliance::Compliant,
        TaskStatus::Blocked => Compliance::NonCompliant,
        TaskStatus::Pending | TaskStatus::InProgress => Compliance::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::DayCode;

    fn activity(description: &str, ppc: Compliance) -> WeeklyActivity {
        WeeklyActivity {
            description: description.into(),
            zone: "PASTILLA 5".into(),
            company: "DIM".into(),
            ppc,
            ..WeeklyActivity::default()
        }
    }

    fn task(id: &str, status: TaskStatus, constraints: &[&str]) -> Task {
        let then = Timestamp::new(1_600_000_000, 0).unwrap();
        Task {
            id: id.into(),
            description: format!("task {id}"),
            area: "BAJO RASANTE -1".into(),
            team: "TIMPER".into(),
            start_date: then,
            end_date: then,
            status,
            constraints: constraints.iter().map(ToString::to_string).collect(),
            assigned_to: BTreeSet::new(),
            completed_date: None,
            images: vec![],
        }
    }

    #[test]
    fn ppc_of_nothing_is_zero() {
        assert_eq!(compute_ppc(&[]), 0);
    }

    #[test]
    fn ppc_rounds_half_up() {
        let two_of_three = [
            activity("a", Compliance::Compliant),
            activity("b", Compliance::Compliant),
            activity("c", Compliance::Pending),
        ];
        assert_eq!(compute_ppc(&two_of_three), 67);

        let one_of_eight: Vec<_> = (0..8)
            .map(|i| {
                let ppc = if i == 0 { Compliance::Compliant } else { Compliance::Pending };
                activity("x", ppc)
            })
            .collect();
        // 12.5 rounds up.
        assert_eq!(compute_ppc(&one_of_eight), 13);
    }

    #[test]
    fn ppc_counts_only_compliant() {
        let rows = [
            activity("a", Compliance::Compliant),
            activity("b", Compliance::Compliant),
            activity("c", Compliance::Compliant),
            activity("d", Compliance::NonCompliant),
        ];
        assert_eq!(compute_ppc(&rows), 75);
    }

    #[test]
    fn activities_map_to_tasks() {
        let now = Timestamp::new(1_700_000_000, 0).unwrap();
        let mut blocked = activity("Pour slab", Compliance::NonCompliant);
        blocked.non_conformity_reason = "Concrete late".into();
        let rows = [
            activity("Formwork", Compliance::Compliant),
            blocked,
            activity("Rebar", Compliance::Pending),
        ];
        let images = vec!["data:image/png;base64,AAAA".to_string()];

        let tasks = activities_to_tasks(&rows, &images, now);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[0].completed_date, Some(now));
        assert_eq!(tasks[0].area, "PASTILLA 5");
        assert_eq!(tasks[0].team, "DIM");
        assert!(tasks[0].constraints.is_empty());

        assert_eq!(tasks[1].id, "2");
        assert_eq!(tasks[1].status, TaskStatus::Blocked);
        assert_eq!(tasks[1].constraints, vec!["Concrete late"]);
        assert!(tasks[1].completed_date.is_none());

        assert_eq!(tasks[2].status, TaskStatus::Pending);
        assert!(tasks.iter().all(|t| t.start_date == now && t.end_date == now));
        assert!(tasks.iter().all(|t| t.images == images));
    }

    #[test]
    fn tasks_map_to_activities_by_position() {
        let tasks = [
            task("t-17", TaskStatus::Completed, &[]),
            task("t-4", TaskStatus::Blocked, &["Crane down", "Rain"]),
            task("t-9", TaskStatus::InProgress, &[]),
        ];

        let rows = tasks_to_activities(&tasks);

        assert_eq!(rows.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[0].ppc, Compliance::Compliant);
        assert_eq!(rows[1].ppc, Compliance::NonCompliant);
        assert_eq!(rows[1].non_conformity_reason, "Crane down, Rain");
        assert_eq!(rows[2].ppc, Compliance::Pending);
        assert_eq!(rows[0].zone, "BAJO RASANTE -1");
        assert_eq!(rows[0].company, "TIMPER");
    }

    #[test]
    fn reopening_resets_the_day_schedule() {
        let now = Timestamp::new(1_700_000_000, 0).unwrap();
        let mut row = activity("Formwork", Compliance::Pending);
        row.week_days.toggle(DayCode::Monday);
        row.week_days.toggle(DayCode::Friday);
        row.sub_zone = "ZONA B".into();

        let back = tasks_to_activities(&activities_to_tasks(&[row], &[], now));
        assert!(back[0].week_days.is_empty());
        assert!(back[0].sub_zone.is_empty());
    }

    #[test]
    fn round_trip_keeps_content_but_not_dates_or_ids() {
        let tasks = vec![
            task("t-17", TaskStatus::Completed, &[]),
            task("t-4", TaskStatus::Blocked, &["Crane down"]),
            task("t-9", TaskStatus::Pending, &[]),
        ];
        let now = Timestamp::new(1_700_000_000, 0).unwrap();

        let again = activities_to_tasks(&tasks_to_activities(&tasks), &[], now);

        for (before, after) in tasks.iter().zip(&again) {
            assert_eq!(after.description, before.description);
            assert_eq!(after.area, before.area);
            assert_eq!(after.team, before.team);
            assert_eq!(after.status, before.status);
            assert_eq!(after.constraints, before.constraints);

            assert_ne!(after.id, before.id);
            assert_ne!(after.start_date, before.start_date);
            assert_ne!(after.end_date, before.end_date);
        }
        assert_eq!(again[0].id, "1");
    }

    #[test]
    fn in_progress_round_trips_as_pending() {
        let now = Timestamp::new(1_700_000_000, 0).unwrap();
        let tasks = [task("1", TaskStatus::InProgress, &[])];
        let again = activities_to_tasks(&tasks_to_activities(&tasks), &[], now);
        assert_eq!(again[0].status, TaskStatus::Pending);
    }

    #[test]
    fn plan_images_collapses_repeats() {
        let mut a = task("1", TaskStatus::Pending, &[]);
        a.images = vec!["img-1".into(), "img-2".into()];
        let mut b = task("2", TaskStatus::Pending, &[]);
        b.images = vec!["img-1".into(), "img-2".into(), "img-3".into()];

        assert_eq!(plan_images(&[a, b]), vec!["img-1", "img-2", "img-3"]);
    }
}
