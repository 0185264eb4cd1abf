//! Weekly activities: the editable row shape of a planned task.
//!
//! Activities only live inside the plan editor. On save they are turned into
//! [`Task`](super::Task)s; on reopen the tasks are turned back into activities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the weekly planning sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeeklyActivity {
    /// Local sequence number, 1-based position in the sheet.
    pub id: u32,
    pub description: String,
    pub zone: String,
    pub sub_zone: String,
    pub company: String,
    pub week_days: WeekDays,
    pub ppc: Compliance,
    pub non_conformity_id: String,
    pub non_conformity_reason: String,
}

/// Whether an activity met its plan for the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compliance {
    Compliant,
    NonCompliant,
    #[default]
    Pending,
}

impl Compliance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non-compliant",
            Self::Pending => "pending",
        }
    }
}

/// Working days of the planning sheet, Monday through Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayCode {
    #[serde(rename = "L")]
    Monday,
    #[serde(rename = "M")]
    Tuesday,
    #[serde(rename = "X")]
    Wednesday,
    #[serde(rename = "J")]
    Thursday,
    #[serde(rename = "V")]
    Friday,
    #[serde(rename = "S")]
    Saturday,
}

impl DayCode {
    pub const ALL: [Self; 6] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Single-letter column header.
    pub fn code(self) -> char {
        match self {
            Self::Monday => 'L',
            Self::Tuesday => 'M',
            Self::Wednesday => 'X',
            Self::Thursday => 'J',
            Self::Friday => 'V',
            Self::Saturday => 'S',
        }
    }
}

/// Which days an activity is scheduled on.
///
/// Always carries an entry for every [`DayCode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekDays(BTreeMap<DayCode, bool>);

impl Default for WeekDays {
    fn default() -> Self {
        Self(DayCode::ALL.into_iter().map(|d| (d, false)).collect())
    }
}

impl WeekDays {
    pub fn is_set(&self, day: DayCode) -> bool {
        self.0.get(&day).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, day: DayCode) {
        let slot = self.0.entry(day).or_insert(false);
        *slot = !*slot;
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|set| !set)
    }

    /// Compact rendering like `L·X··S`.
    pub fn render(&self) -> String {
        DayCode::ALL
            .into_iter()
            .map(|d| if self.is_set(d) { d.code() } else { '·' })
            .collect()
    }
}
