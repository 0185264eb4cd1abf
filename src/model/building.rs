//! Building projects: the top-level records users manage.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A construction project tracked from planning to handover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub status: BuildingStatus,

    /// Completion percentage, 0 to 100.
    pub progress: u8,

    /// Cover image shown on the building card. May be empty.
    #[serde(default)]
    pub image_url: String,
}

/// A building before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuilding {
    pub name: String,
    pub location: String,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub status: BuildingStatus,
    pub progress: u8,
    pub image_url: String,
}

impl NewBuilding {
    /// Attaches an id, producing a storable building.
    pub fn with_id(self, id: Uuid) -> Building {
        Building {
            id,
            name: self.name,
            location: self.location,
            start_date: self.start_date,
            expected_end_date: self.expected_end_date,
            status: self.status,
            progress: self.progress,
            image_url: self.image_url,
        }
    }
}

/// Where a building stands in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl BuildingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }
}
