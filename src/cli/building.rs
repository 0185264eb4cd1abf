//! Building commands: add, list, show, update, delete.

use clap::{Subcommand, ValueEnum};

use crate::filter::filter_buildings;
use crate::model::BuildingStatus;
use crate::storage::Storage;
use crate::validate::BuildingDraft;

use super::format::{format_building, format_plan, short_id};
use super::{confirm, open_buildings, open_buildings_mut, open_plans, open_plans_mut, resolve};

#[derive(Debug, Subcommand)]
pub enum BuildingCommand {
    /// Add a building project. Prints the building ID.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,

        /// Start date, e.g. 2024-01-31.
        #[arg(long)]
        start: String,

        /// Expected end date, e.g. 2024-12-20.
        #[arg(long)]
        end: String,

        #[arg(long, value_enum, default_value = "planning")]
        status: StatusArg,

        /// Completion percentage, 0 to 100.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        progress: i64,

        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// List buildings, newest first.
    List {
        /// Only buildings whose name or location contains this text.
        #[arg(long)]
        search: Option<String>,

        /// Only buildings with this status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Show one building and its weekly plans.
    Show {
        /// Building ID: full UUID or unambiguous prefix.
        building: String,
    },

    /// Change fields of a building. Unspecified fields keep their value.
    Update {
        /// Building ID: full UUID or unambiguous prefix.
        building: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        #[arg(long, allow_negative_numbers = true)]
        progress: Option<i64>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a building and its weekly plans.
    Delete {
        /// Building ID: full UUID or unambiguous prefix.
        building: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// CLI-facing building status, mapped to the domain `BuildingStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl StatusArg {
    fn to_domain(self) -> BuildingStatus {
        match self {
            Self::Planning => BuildingStatus::Planning,
            Self::InProgress => BuildingStatus::InProgress,
            Self::Completed => BuildingStatus::Completed,
            Self::OnHold => BuildingStatus::OnHold,
        }
    }
}

pub(super) fn run(storage: &Storage, command: BuildingCommand) -> Result<(), String> {
    match command {
        BuildingCommand::Add {
            name,
            location,
            start,
            end,
            status,
            progress,
            image_url,
        } => cmd_add(
            storage,
            BuildingDraft {
                name,
                location,
                start_date: start,
                expected_end_date: end,
                status: status.to_domain(),
                progress,
                image_url,
            },
        ),
        BuildingCommand::List { search, status } => cmd_list(
            storage,
            search.as_deref().unwrap_or(""),
            status.map(StatusArg::to_domain),
        ),
        BuildingCommand::Show { building } => cmd_show(storage, &building),
        BuildingCommand::Update {
            building,
            name,
            location,
            start,
            end,
            status,
            progress,
            image_url,
        } => cmd_update(storage, &building, |draft| {
            if let Some(v) = name {
                draft.name = v;
            }
            if let Some(v) = location {
                draft.location = v;
            }
            if let Some(v) = start {
                draft.start_date = v;
            }
            if let Some(v) = end {
                draft.expected_end_date = v;
            }
            if let Some(v) = status {
                draft.status = v.to_domain();
            }
            if let Some(v) = progress {
                draft.progress = v;
            }
            if let Some(v) = image_url {
                draft.image_url = v;
            }
        }),
        BuildingCommand::Delete { building, yes } => cmd_delete(storage, &building, yes),
    }
}

fn cmd_add(storage: &Storage, draft: BuildingDraft) -> Result<(), String> {
    let building = draft
        .validate()
        .map_err(|e| format!("invalid building: {e}"))?;

    let mut buildings = open_buildings_mut(storage)?;
    let id = buildings
        .add(building)
        .map_err(|e| format!("failed to add building: {e}"))?;

    println!("{id}");
    Ok(())
}

fn cmd_list(
    storage: &Storage,
    search: &str,
    status: Option<BuildingStatus>,
) -> Result<(), String> {
    let buildings = open_buildings(storage);
    let shown = filter_buildings(buildings.buildings(), search, status);

    if shown.is_empty() {
        println!("No buildings");
        return Ok(());
    }

    for building in shown {
        println!("{}", format_building(building));
    }
    Ok(())
}

fn cmd_show(storage: &Storage, reference: &str) -> Result<(), String> {
    let buildings = open_buildings(storage);
    let building = resolve(buildings.buildings(), |b| b.id, "building", reference)?;
    let plans = open_plans(storage);

    println!("{}", format_building(building));
    if !building.image_url.is_empty() {
        println!("Image: {}", building.image_url);
    }

    let mut any = false;
    for plan in plans.for_building(building.id) {
        if !any {
            println!();
            println!("Weekly plans:");
            any = true;
        }
        println!("  {}", format_plan(plan));
    }
    if !any {
        println!("No weekly plans");
    }
    Ok(())
}

fn cmd_update(
    storage: &Storage,
    reference: &str,
    apply: impl FnOnce(&mut BuildingDraft),
) -> Result<(), String> {
    let mut buildings = open_buildings_mut(storage)?;
    let current = resolve(buildings.buildings(), |b| b.id, "building", reference)?.clone();

    let mut draft = BuildingDraft::from_building(&current);
    apply(&mut draft);
    let updated = draft
        .validate()
        .map_err(|e| format!("invalid building: {e}"))?
        .with_id(current.id);

    buildings
        .update(updated)
        .map_err(|e| format!("failed to update building: {e}"))?;

    eprintln!("Building {} updated", short_id(current.id));
    Ok(())
}

fn cmd_delete(storage: &Storage, reference: &str, yes: bool) -> Result<(), String> {
    let mut buildings = open_buildings_mut(storage)?;
    let mut plans = open_plans_mut(storage)?;
    let building = resolve(buildings.buildings(), |b| b.id, "building", reference)?.clone();

    if !yes && !confirm(&format!("Delete building '{}' and its weekly plans?", building.name))? {
        eprintln!("Cancelled");
        return Ok(());
    }

    buildings
        .delete(building.id)
        .map_err(|e| format!("failed to delete building: {e}"))?;

    let orphaned: Vec<_> = plans.for_building(building.id).map(|p| p.id).collect();
    for id in &orphaned {
        plans
            .delete(*id)
            .map_err(|e| format!("failed to delete weekly plan: {e}"))?;
    }

    eprintln!(
        "Building {} deleted ({} weekly plan(s) removed)",
        short_id(building.id),
        orphaned.len()
    );
    Ok(())
}
