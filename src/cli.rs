//! CLI interface for Obra.
//!
//! Each subcommand is non-interactive apart from delete confirmations:
//! arguments in, human-readable output out.
//!
//! - `obra login|logout`: the session flag.
//! - `obra week`: the current ISO week.
//! - `obra building ...`: project list management.
//! - `obra plan ...`: weekly plans for one building.
//!
//! Record references take a full UUID or an unambiguous prefix.

mod building;
mod format;
mod plan;

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use jiff::civil::Date;
use uuid::Uuid;

use crate::config::Config;
use crate::model::{Building, WeeklyPlan};
use crate::storage::{BUILDINGS_KEY, JsonList, PLANS_KEY, Storage};
use crate::store::{BuildingStore, PlanStore};
use crate::{auth, dates};

use building::BuildingCommand;
use plan::PlanCommand;

type Buildings = BuildingStore<JsonList<Building>>;
type Plans = PlanStore<JsonList<WeeklyPlan>>;

/// Obra: track building projects and their weekly plans.
#[derive(Debug, Parser)]
#[command(name = "obra", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: planning a week
  1. obra login --user site@example.com --password x
  2. obra building add --name "Tower A" --location "Site 1" --start 2024-01-01 --end 2024-12-20
     → prints a building ID (e.g. a3b0fc12)
  3. obra plan new --building a3b --activities week.json --image slab.jpg
  4. obra plan mark 7c1 3 non-compliant --reason "Concrete delivery late"
  5. obra plan show 7c1

Activities files are JSON arrays of rows:
  [{"description": "Formwork", "zone": "PASTILLA 5", "company": "DIM", "ppc": "compliant"}]"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in. Any non-empty user and password are accepted.
    Login {
        #[arg(long)]
        user: String,

        #[arg(long)]
        password: String,
    },

    /// Log out.
    Logout,

    /// Show the ISO week number and its Monday.
    Week {
        /// Date to look up (defaults to today).
        #[arg(long)]
        date: Option<Date>,
    },

    /// Manage building projects.
    Building {
        #[command(subcommand)]
        command: BuildingCommand,
    },

    /// Manage weekly plans.
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Login { user, password } => {
            auth::login(storage, &user, &password).map_err(|e| format!("login failed: {e}"))?;
            eprintln!("Logged in as {user}");
            Ok(())
        }
        Command::Logout => {
            auth::logout(storage).map_err(|e| format!("logout failed: {e}"))?;
            eprintln!("Logged out");
            Ok(())
        }
        Command::Week { date } => {
            cmd_week(date.unwrap_or_else(dates::today));
            Ok(())
        }
        Command::Building { command } => {
            auth::require_login(storage).map_err(|e| e.to_string())?;
            building::run(storage, command)
        }
        Command::Plan { command } => {
            auth::require_login(storage).map_err(|e| e.to_string())?;
            plan::run(config, storage, command)
        }
    }
}

fn cmd_week(date: Date) {
    let week = dates::IsoWeek::of(date);
    if dates::is_week_start(date) {
        println!(
            "Week {}, {} · starts today, {}",
            week.week,
            week.year,
            dates::format_date(date)
        );
        return;
    }
    println!(
        "Week {}, {} · starts {}",
        week.week,
        week.year,
        dates::format_date(dates::week_start(date))
    );
}

fn open_buildings(storage: &Storage) -> Buildings {
    let store = BuildingStore::open(storage.list(BUILDINGS_KEY));
    if let Some(e) = store.load_error() {
        eprintln!("Warning: {e}");
    }
    store
}

fn open_plans(storage: &Storage) -> Plans {
    let store = PlanStore::open(storage.list(PLANS_KEY));
    if let Some(e) = store.load_error() {
        eprintln!("Warning: {e}");
    }
    store
}

/// Opens the building store for a change.
///
/// Refuses while the stored list is unreadable, so a write cannot replace it.
fn open_buildings_mut(storage: &Storage) -> Result<Buildings, String> {
    let store = BuildingStore::open(storage.list(BUILDINGS_KEY));
    refuse_on_load_error(store.load_error())?;
    Ok(store)
}

/// Opens the plan store for a change. See [`open_buildings_mut`].
fn open_plans_mut(storage: &Storage) -> Result<Plans, String> {
    let store = PlanStore::open(storage.list(PLANS_KEY));
    refuse_on_load_error(store.load_error())?;
    Ok(store)
}

fn refuse_on_load_error(load_error: Option<&str>) -> Result<(), String> {
    match load_error {
        Some(e) => Err(format!("{e}; fix or remove the file before making changes")),
        None => Ok(()),
    }
}

/// Resolve a reference (full UUID or unambiguous prefix) against `items`.
fn resolve<'a, T>(
    items: &'a [T],
    id_of: impl Fn(&T) -> Uuid,
    kind: &str,
    reference: &str,
) -> Result<&'a T, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return items
            .iter()
            .find(|item| id_of(*item) == id)
            .ok_or_else(|| format!("{kind} not found: {id}"));
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id_of(*item).to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {kind} matching '{reference}'")),
        [only] => Ok(*only),
        many => {
            let ids: Vec<String> = many
                .iter()
                .map(|item| format::short_id(id_of(*item)))
                .collect();
            Err(format!(
                "'{reference}' is ambiguous — matches {} {kind}s: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

/// Ask for a yes/no on stderr/stdin. Anything but `y` or `yes` is a no.
fn confirm(prompt: &str) -> Result<bool, String> {
    eprint!("{prompt} [y/N] ");
    io::stderr()
        .flush()
        .map_err(|e| format!("failed to prompt: {e}"))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| format!("failed to read answer: {e}"))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
