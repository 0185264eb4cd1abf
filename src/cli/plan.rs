//! Weekly plan commands: list, new, show, export, edit, mark, delete.
//!
//! `new`, `edit` and `mark` all go through a [`PlanEditor`]: open it, apply
//! the arguments, save. Any error before the save leaves the store as it was.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::config::Config;
use crate::dates;
use crate::editor::PlanEditor;
use crate::filter::{paginate, search_activities};
use crate::image::load_image;
use crate::model::{Compliance, WeeklyActivity};
use crate::storage::Storage;

use super::format::{format_activity, format_plan, short_id};
use super::{Plans, confirm, open_buildings, open_plans, open_plans_mut, resolve};

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// List a building's weekly plans, newest first.
    List {
        /// Building ID: full UUID or unambiguous prefix.
        #[arg(long)]
        building: String,
    },

    /// Create this week's plan for a building. Prints the plan ID.
    New {
        /// Building ID: full UUID or unambiguous prefix.
        #[arg(long)]
        building: String,

        /// JSON file with an array of activity rows.
        #[arg(long)]
        activities: Option<PathBuf>,

        /// Image to attach to every task. Can be specified multiple times.
        #[arg(long)]
        image: Vec<PathBuf>,

        /// Image for the week's report.
        #[arg(long)]
        report_image: Option<PathBuf>,
    },

    /// Show a plan's activities.
    Show {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,

        /// Only activities whose description, zone or company contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Page of activities to show, 10 per page.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Print a plan's activities as JSON, ready for `plan edit --activities`.
    Export {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,
    },

    /// Replace a plan's activities or images.
    Edit {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,

        /// JSON file with the new array of activity rows.
        #[arg(long)]
        activities: Option<PathBuf>,

        /// Image to attach. Can be specified multiple times.
        #[arg(long)]
        image: Vec<PathBuf>,

        /// Detach the image at this 1-based position. Can be specified multiple times.
        #[arg(long)]
        remove_image: Vec<usize>,

        /// Detach every image before attaching new ones.
        #[arg(long, conflicts_with = "remove_image")]
        clear_images: bool,

        /// Remove the activity with this number. Can be specified multiple times.
        #[arg(long)]
        remove_activity: Vec<u32>,

        /// Replace the week's report image.
        #[arg(long)]
        report_image: Option<PathBuf>,

        /// Show the resulting PPC without saving.
        #[arg(long)]
        dry_run: bool,
    },

    /// Append one activity to a plan.
    AddActivity {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,

        #[arg(long)]
        description: String,

        #[arg(long, default_value = "")]
        zone: String,

        #[arg(long, default_value = "")]
        sub_zone: String,

        #[arg(long, default_value = "")]
        company: String,
    },

    /// Record an activity's outcome for the week.
    Mark {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,

        /// Activity number as shown by `plan show`.
        activity: u32,

        #[arg(value_enum)]
        outcome: OutcomeArg,

        /// Non-conformity reason.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Delete a weekly plan.
    Delete {
        /// Plan ID: full UUID or unambiguous prefix.
        plan: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// CLI-facing outcome, mapped to the domain `Compliance`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutcomeArg {
    Compliant,
    NonCompliant,
    Pending,
}

impl OutcomeArg {
    fn to_domain(self) -> Compliance {
        match self {
            Self::Compliant => Compliance::Compliant,
            Self::NonCompliant => Compliance::NonCompliant,
            Self::Pending => Compliance::Pending,
        }
    }
}

pub(super) fn run(config: &Config, storage: &Storage, command: PlanCommand) -> Result<(), String> {
    match command {
        PlanCommand::List { building } => cmd_list(storage, &building),
        PlanCommand::New {
            building,
            activities,
            image,
            report_image,
        } => cmd_new(
            config,
            storage,
            &building,
            activities.as_deref(),
            &image,
            report_image.as_deref(),
        ),
        PlanCommand::Show { plan, search, page } => {
            cmd_show(storage, &plan, search.as_deref().unwrap_or(""), page)
        }
        PlanCommand::Export { plan } => cmd_export(storage, &plan),
        PlanCommand::Edit {
            plan,
            activities,
            image,
            remove_image,
            clear_images,
            remove_activity,
            report_image,
            dry_run,
        } => cmd_edit(
            config,
            storage,
            &plan,
            EditArgs {
                activities: activities.as_deref(),
                images: &image,
                remove_images: &remove_image,
                clear_images,
                remove_activities: &remove_activity,
                report_image: report_image.as_deref(),
                dry_run,
            },
        ),
        PlanCommand::AddActivity {
            plan,
            description,
            zone,
            sub_zone,
            company,
        } => cmd_add_activity(
            storage,
            &plan,
            WeeklyActivity {
                description,
                zone,
                sub_zone,
                company,
                ..WeeklyActivity::default()
            },
        ),
        PlanCommand::Mark {
            plan,
            activity,
            outcome,
            reason,
        } => cmd_mark(storage, &plan, activity, outcome.to_domain(), reason.as_deref()),
        PlanCommand::Delete { plan, yes } => cmd_delete(storage, &plan, yes),
    }
}

fn cmd_list(storage: &Storage, building_ref: &str) -> Result<(), String> {
    let buildings = open_buildings(storage);
    let building = resolve(buildings.buildings(), |b| b.id, "building", building_ref)?;
    let plans = open_plans(storage);

    let mut any = false;
    for plan in plans.for_building(building.id) {
        println!("{}", format_plan(plan));
        any = true;
    }
    if !any {
        println!("No weekly plans for {}", building.name);
    }
    Ok(())
}

fn cmd_new(
    config: &Config,
    storage: &Storage,
    building_ref: &str,
    activities: Option<&Path>,
    images: &[PathBuf],
    report_image: Option<&Path>,
) -> Result<(), String> {
    let buildings = open_buildings(storage);
    let building = resolve(buildings.buildings(), |b| b.id, "building", building_ref)?;

    let mut editor = PlanEditor::new_plan(building.id);
    if let Some(path) = activities {
        editor.replace_activities(read_activities(path)?);
    }
    attach_images(config, &mut editor, images)?;
    if let Some(path) = report_image {
        editor.set_report_image(Some(embed(config, path)?));
    }

    let mut plans = open_plans_mut(storage)?;
    let id = save(editor, &mut plans)?;

    println!("{id}");
    Ok(())
}

fn cmd_show(storage: &Storage, plan_ref: &str, search: &str, page: usize) -> Result<(), String> {
    let plans = open_plans(storage);
    let plan = resolve(plans.plans(), |p| p.id, "plan", plan_ref)?;
    let buildings = open_buildings(storage);
    let building_name = buildings
        .get(plan.building_id)
        .map_or("(unknown building)", |b| b.name.as_str());

    let editor = PlanEditor::edit(plan);
    println!(
        "Week {}, {} · {building_name} · PPC {}%",
        plan.week_number, plan.year, plan.ppc
    );
    println!(
        "Created {} · Updated {}",
        dates::format_date_short(dates::local_date(plan.created)),
        dates::format_date_short(dates::local_date(plan.updated)),
    );
    if !editor.images().is_empty() {
        println!("Images: {}", editor.images().len());
    }
    if plan.report_image.is_some() {
        println!("Report image attached");
    }

    let matching = search_activities(editor.activities(), search);
    if matching.is_empty() {
        println!("No activities");
        return Ok(());
    }

    let page = paginate(&matching, page);
    println!();
    for activity in page.items {
        println!("{}", format_activity(activity));
    }
    if page.total_pages > 1 {
        println!();
        println!("Page {} of {}", page.number, page.total_pages);
    }
    Ok(())
}

fn cmd_export(storage: &Storage, plan_ref: &str) -> Result<(), String> {
    let plans = open_plans(storage);
    let plan = resolve(plans.plans(), |p| p.id, "plan", plan_ref)?;

    let editor = PlanEditor::edit(plan);
    let json = serde_json::to_string_pretty(editor.activities())
        .map_err(|e| format!("failed to serialize activities: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Everything `plan edit` can change in one go.
struct EditArgs<'a> {
    activities: Option<&'a Path>,
    images: &'a [PathBuf],
    remove_images: &'a [usize],
    clear_images: bool,
    remove_activities: &'a [u32],
    report_image: Option<&'a Path>,
    dry_run: bool,
}

fn cmd_edit(
    config: &Config,
    storage: &Storage,
    plan_ref: &str,
    args: EditArgs<'_>,
) -> Result<(), String> {
    let mut plans = open_plans_mut(storage)?;
    let mut editor = open_editor(&plans, plan_ref)?;

    if let Some(path) = args.activities {
        editor.replace_activities(read_activities(path)?);
    }
    // Positions shift on removal, so remove from the highest down.
    for id in descending(args.remove_activities) {
        editor.remove_activity(id).map_err(|e| e.to_string())?;
    }
    if args.clear_images {
        editor.clear_images();
    }
    for number in descending(args.remove_images) {
        editor.remove_image(number).map_err(|e| e.to_string())?;
    }
    attach_images(config, &mut editor, args.images)?;
    if let Some(path) = args.report_image {
        editor.set_report_image(Some(embed(config, path)?));
    }

    let ppc = editor.ppc();
    if args.dry_run {
        for activity in editor.activities() {
            println!("{}", format_activity(activity));
        }
        println!(
            "{} activities, {} image(s) · PPC {ppc}% (not saved)",
            editor.activities().len(),
            editor.images().len()
        );
        editor.cancel();
        return Ok(());
    }

    save(editor, &mut plans)?;
    Ok(())
}

fn cmd_add_activity(
    storage: &Storage,
    plan_ref: &str,
    activity: WeeklyActivity,
) -> Result<(), String> {
    let mut plans = open_plans_mut(storage)?;
    let mut editor = open_editor(&plans, plan_ref)?;

    let id = editor.push_activity(activity).id;
    save(editor, &mut plans)?;

    eprintln!("Activity #{id} added");
    Ok(())
}

fn cmd_mark(
    storage: &Storage,
    plan_ref: &str,
    activity: u32,
    outcome: Compliance,
    reason: Option<&str>,
) -> Result<(), String> {
    let mut plans = open_plans_mut(storage)?;
    let mut editor = open_editor(&plans, plan_ref)?;

    editor
        .set_compliance(activity, outcome, reason)
        .map_err(|e| e.to_string())?;
    save(editor, &mut plans)?;

    eprintln!("Activity #{activity} marked {}", outcome.label());
    Ok(())
}

fn cmd_delete(storage: &Storage, plan_ref: &str, yes: bool) -> Result<(), String> {
    let mut plans = open_plans_mut(storage)?;
    let plan = resolve(plans.plans(), |p| p.id, "plan", plan_ref)?.clone();

    let prompt = format!("Delete the plan for week {}, {}?", plan.week_number, plan.year);
    if !yes && !confirm(&prompt)? {
        eprintln!("Cancelled");
        return Ok(());
    }

    plans
        .delete(plan.id)
        .map_err(|e| format!("failed to delete weekly plan: {e}"))?;

    eprintln!("Plan {} deleted", short_id(plan.id));
    Ok(())
}

/// Saves the editor, reporting the plan's new PPC on stderr.
fn save(editor: PlanEditor, plans: &mut Plans) -> Result<uuid::Uuid, String> {
    let created = editor.is_new();
    let ppc = editor.ppc();
    let id = editor
        .save(plans)
        .map_err(|e| format!("failed to save weekly plan: {e}"))?;

    let verb = if created { "created" } else { "saved" };
    eprintln!("Plan {} {verb} · PPC {ppc}%", short_id(id));
    Ok(id)
}

fn descending<T: Ord + Copy>(items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_unstable_by(|a, b| b.cmp(a));
    items.dedup();
    items
}

fn open_editor(plans: &Plans, plan_ref: &str) -> Result<PlanEditor, String> {
    let plan = resolve(plans.plans(), |p| p.id, "plan", plan_ref)?;
    Ok(PlanEditor::edit(plan))
}

fn read_activities(path: &Path) -> Result<Vec<WeeklyActivity>, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("invalid activities in {}: {e}", path.display()))
}

fn attach_images(config: &Config, editor: &mut PlanEditor, paths: &[PathBuf]) -> Result<(), String> {
    for path in paths {
        editor.attach_image(embed(config, path)?);
    }
    Ok(())
}

fn embed(config: &Config, path: &Path) -> Result<String, String> {
    load_image(path, config.max_image_bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;
    use tempfile::TempDir;

    use crate::cli::{Cli, Command};
    use crate::model::{BuildingStatus, NewBuilding, TaskStatus};

    struct Fixture {
        dir: TempDir,
        storage: Storage,
        config: Config,
        building: uuid::Uuid,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        let building = open_buildings(&storage)
            .add(NewBuilding {
                name: "Tower A".into(),
                location: "Site 1".into(),
                start_date: jiff::civil::date(2024, 1, 1),
                expected_end_date: jiff::civil::date(2024, 12, 31),
                status: BuildingStatus::InProgress,
                progress: 10,
                image_url: String::new(),
            })
            .unwrap();
        Fixture {
            dir,
            storage,
            config: Config::default(),
            building,
        }
    }

    fn parse(args: &[&str]) -> PlanCommand {
        let mut argv = vec!["obra", "plan"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Plan { command } => command,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn write_activities(f: &Fixture, json: &str) -> String {
        let path = f.dir.path().join("week.json");
        fs::write(&path, json).unwrap();
        path.display().to_string()
    }

    const FOUR_ROWS: &str = r#"[
        {"description": "Formwork", "zone": "PASTILLA 5", "company": "DIM", "ppc": "compliant"},
        {"description": "Rebar", "zone": "PASTILLA 5", "company": "DIM", "ppc": "compliant"},
        {"description": "Pour", "zone": "PASTILLA 4", "company": "TIMPER", "ppc": "non-compliant",
         "nonConformityReason": "Concrete late"},
        {"description": "Cure", "zone": "PASTILLA 4", "company": "TIMPER", "ppc": "compliant"}
    ]"#;

    fn new_plan(f: &Fixture) -> uuid::Uuid {
        let file = write_activities(f, FOUR_ROWS);
        let building = f.building.to_string();
        run(
            &f.config,
            &f.storage,
            parse(&["new", "--building", &building, "--activities", &file]),
        )
        .unwrap();
        open_plans(&f.storage).plans()[0].id
    }

    #[test]
    fn new_plan_from_file_stores_ppc() {
        let f = fixture();
        let id = new_plan(&f);

        let plans = open_plans(&f.storage);
        let plan = plans.get(id).unwrap();
        assert_eq!(plan.ppc, 75);
        assert_eq!(plan.building_id, f.building);
        assert_eq!(plan.tasks.len(), 4);
        assert_eq!(plan.tasks[2].constraints, vec!["Concrete late"]);
    }

    #[test]
    fn mark_updates_status_and_ppc() {
        let f = fixture();
        let id = new_plan(&f);

        run(
            &f.config,
            &f.storage,
            parse(&["mark", &id.to_string()[..8], "3", "compliant"]),
        )
        .unwrap();

        let plans = open_plans(&f.storage);
        let plan = plans.get(id).unwrap();
        assert_eq!(plan.ppc, 100);
        assert_eq!(plan.tasks[2].status, TaskStatus::Completed);
    }

    #[test]
    fn mark_unknown_activity_leaves_plan_alone() {
        let f = fixture();
        let id = new_plan(&f);
        let before = open_plans(&f.storage).get(id).unwrap().clone();

        let err = run(
            &f.config,
            &f.storage,
            parse(&["mark", &id.to_string(), "9", "compliant"]),
        )
        .unwrap_err();

        assert_eq!(err, "no activity #9 in this plan");
        assert_eq!(open_plans(&f.storage).get(id).unwrap(), &before);
    }

    #[test]
    fn edit_attaches_images_to_every_task() {
        let f = fixture();
        let id = new_plan(&f);
        let image = f.dir.path().join("slab.png");
        fs::write(&image, b"png").unwrap();

        run(
            &f.config,
            &f.storage,
            parse(&["edit", &id.to_string(), "--image", &image.display().to_string()]),
        )
        .unwrap();

        let plans = open_plans(&f.storage);
        let plan = plans.get(id).unwrap();
        assert!(
            plan.tasks
                .iter()
                .all(|t| t.images == vec!["data:image/png;base64,cG5n".to_string()])
        );
    }

    #[test]
    fn oversized_image_is_refused() {
        let mut f = fixture();
        f.config.max_image_bytes = 2;
        let image = f.dir.path().join("big.png");
        fs::write(&image, b"too big").unwrap();
        let building = f.building.to_string();

        let err = run(
            &f.config,
            &f.storage,
            parse(&["new", "--building", &building, "--image", &image.display().to_string()]),
        )
        .unwrap_err();

        assert!(err.contains("larger than"), "{err}");
        assert!(open_plans(&f.storage).plans().is_empty());
    }

    #[test]
    fn invalid_activities_file_is_reported() {
        let f = fixture();
        let file = write_activities(&f, "{\"not\": \"a list\"}");
        let building = f.building.to_string();

        let err = run(
            &f.config,
            &f.storage,
            parse(&["new", "--building", &building, "--activities", &file]),
        )
        .unwrap_err();

        assert!(err.starts_with("invalid activities"), "{err}");
    }

    #[test]
    fn edit_removes_activities_and_renumbers() {
        let f = fixture();
        let id = new_plan(&f);

        run(
            &f.config,
            &f.storage,
            parse(&[
                "edit",
                &id.to_string(),
                "--remove-activity",
                "1",
                "--remove-activity",
                "3",
            ]),
        )
        .unwrap();

        let plans = open_plans(&f.storage);
        let plan = plans.get(id).unwrap();
        let descriptions: Vec<&str> = plan.tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Rebar", "Cure"]);
        assert_eq!(plan.tasks[1].id, "2");
        assert_eq!(plan.ppc, 100);
    }

    #[test]
    fn dry_run_does_not_save() {
        let f = fixture();
        let id = new_plan(&f);
        let before = open_plans(&f.storage).get(id).unwrap().clone();

        run(
            &f.config,
            &f.storage,
            parse(&["edit", &id.to_string(), "--remove-activity", "3", "--dry-run"]),
        )
        .unwrap();

        assert_eq!(open_plans(&f.storage).get(id).unwrap(), &before);
    }

    #[test]
    fn add_activity_appends_a_pending_row() {
        let f = fixture();
        let id = new_plan(&f);

        run(
            &f.config,
            &f.storage,
            parse(&[
                "add-activity",
                &id.to_string(),
                "--description",
                "Strip formwork",
                "--company",
                "DIM",
            ]),
        )
        .unwrap();

        let plans = open_plans(&f.storage);
        let plan = plans.get(id).unwrap();
        assert_eq!(plan.tasks.len(), 5);
        assert_eq!(plan.tasks[4].description, "Strip formwork");
        assert_eq!(plan.tasks[4].status, TaskStatus::Pending);
        assert_eq!(plan.ppc, 60);
    }

    #[test]
    fn add_activity_has_no_day_schedule_flag() {
        let argv = ["obra", "plan", "add-activity", "7c1", "--description", "x", "--days", "L"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn new_plan_with_images_but_no_activities_is_refused() {
        let f = fixture();
        let image = f.dir.path().join("slab.png");
        fs::write(&image, b"png").unwrap();
        let building = f.building.to_string();

        let err = run(
            &f.config,
            &f.storage,
            parse(&["new", "--building", &building, "--image", &image.display().to_string()]),
        )
        .unwrap_err();

        assert!(err.contains("add at least one activity"), "{err}");
        assert!(open_plans(&f.storage).plans().is_empty());
    }

    #[test]
    fn unreadable_plans_are_not_overwritten() {
        let f = fixture();
        let id = new_plan(&f);
        f.storage.set(crate::storage::PLANS_KEY, "[{").unwrap();

        let err = run(
            &f.config,
            &f.storage,
            parse(&["mark", &id.to_string(), "3", "compliant"]),
        )
        .unwrap_err();

        assert!(err.contains("failed to load weekly plans"), "{err}");
        assert_eq!(
            f.storage.get(crate::storage::PLANS_KEY).unwrap().as_deref(),
            Some("[{")
        );
    }

    #[test]
    fn delete_with_yes_removes_the_plan() {
        let f = fixture();
        let id = new_plan(&f);

        run(&f.config, &f.storage, parse(&["delete", &id.to_string(), "--yes"])).unwrap();

        assert!(open_plans(&f.storage).plans().is_empty());
    }
}
