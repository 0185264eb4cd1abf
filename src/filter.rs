//! Search and paging over store lists.

use crate::model::{Building, BuildingStatus, WeeklyActivity};

/// Activities shown per page.
pub const PAGE_SIZE: usize = 10;

/// Buildings whose name or location contains `search` (case-insensitive),
/// optionally restricted to one status.
pub fn filter_buildings<'a>(
    buildings: &'a [Building],
    search: &str,
    status: Option<BuildingStatus>,
) -> Vec<&'a Building> {
    let needle = search.to_lowercase();
    buildings
        .iter()
        .filter(|b| {
            b.name.to_lowercase().contains(&needle) || b.location.to_lowercase().contains(&needle)
        })
        .filter(|b| status.is_none_or(|s| b.status == s))
        .collect()
}

/// Activities whose description, zone, or company contains `search`.
pub fn search_activities<'a>(
    activities: &'a [WeeklyActivity],
    search: &str,
) -> Vec<&'a WeeklyActivity> {
    let needle = search.to_lowercase();
    activities
        .iter()
        .filter(|a| {
            [&a.description, &a.zone, &a.company]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// One page of results.
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],

    /// 1-based, clamped into range.
    pub number: usize,

    /// At least 1, even when there is nothing to show.
    pub total_pages: usize,
}

/// Slices `items` into the 1-based page `number` of [`PAGE_SIZE`].
pub fn paginate<T>(items: &[T], number: usize) -> Page<'_, T> {
    let total_pages = items.len().div_ceil(PAGE_SIZE).max(1);
    let number = number.clamp(1, total_pages);
    let start = (number - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());
    Page {
        items: &items[start..end],
        number,
        total_pages,
    }
}
