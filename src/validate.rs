//! Building form validation.
//!
//! A draft holds raw form input. Validation either yields a storable
//! [`NewBuilding`] or every field error at once; nothing reaches the store
//! until the whole draft is clean.

use std::{collections::BTreeMap, fmt};

use jiff::civil::Date;

use crate::model::{Building, BuildingStatus, NewBuilding};

/// Raw building form input.
#[derive(Debug, Clone, Default)]
pub struct BuildingDraft {
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub expected_end_date: String,
    pub status: BuildingStatus,
    pub progress: i64,
    pub image_url: String,
}

impl BuildingDraft {
    /// A draft pre-filled from an existing building, for editing.
    pub fn from_building(building: &Building) -> Self {
        Self {
            name: building.name.clone(),
            location: building.location.clone(),
            start_date: building.start_date.to_string(),
            expected_end_date: building.expected_end_date.to_string(),
            status: building.status,
            progress: i64::from(building.progress),
            image_url: building.image_url.clone(),
        }
    }

    pub fn validate(&self) -> Result<NewBuilding, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.name.trim().is_empty() {
            errors.insert(Field::Name, "project name is required");
        }
        if self.location.trim().is_empty() {
            errors.insert(Field::Location, "location is required");
        }
        let start = parse_date(&self.start_date, Field::StartDate, &mut errors);
        let end = parse_date(&self.expected_end_date, Field::ExpectedEndDate, &mut errors);
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            errors.insert(
                Field::ExpectedEndDate,
                "expected end date must not be before the start date",
            );
        }
        let progress = u8::try_from(self.progress).ok().filter(|p| *p <= 100);
        if progress.is_none() {
            errors.insert(Field::Progress, "progress must be between 0 and 100");
        }

        match (start, end, progress) {
            (Some(start_date), Some(expected_end_date), Some(progress)) if errors.is_empty() => {
                Ok(NewBuilding {
                    name: self.name.trim().to_string(),
                    location: self.location.trim().to_string(),
                    start_date,
                    expected_end_date,
                    status: self.status,
                    progress,
                    image_url: self.image_url.trim().to_string(),
                })
            }
            _ => Err(errors),
        }
    }
}

fn parse_date(raw: &str, field: Field, errors: &mut FieldErrors) -> Option<Date> {
    let label = field.label();
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, format!("{label} is required"));
        return None;
    }
    match raw.parse::<Date>() {
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(field, format!("{label} must be a date like 2024-01-31"));
            None
        }
    }
}

/// A building form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Location,
    StartDate,
    ExpectedEndDate,
    Progress,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::StartDate => "start date",
            Self::ExpectedEndDate => "expected end date",
            Self::Progress => "progress",
        }
    }
}

/// Per-field validation messages. Later messages for a field replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.iter().map(|(_, message)| message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}
