//! Derived view computation.
//!
//! `project` turns the stored task sequence plus transient view criteria
//! into a filtered, sorted display sequence. It is a pure function: the
//! stored order is never touched, and the result owns its elements.

use serde::Serialize;

use crate::error::Error;
use crate::task::Task;

/// Completion filter for the projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Active,
    Completed,
}

impl std::str::FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status filter '{}': must be all, active, or completed",
                s
            ))),
        }
    }
}

/// Sort key for the projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Date,
    Priority,
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "priority" => Ok(SortKey::Priority),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort key '{}': must be date or priority",
                s
            ))),
        }
    }
}

/// Sort direction for the projected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort direction '{}': must be asc or desc",
                s
            ))),
        }
    }
}

/// Transient filter/sort selection for one session.
///
/// Never persisted alongside tasks; defaults are (all, date, desc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewCriteria {
    pub status: StatusFilter,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl Default for ViewCriteria {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            sort: SortKey::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// Compute the display sequence for the given criteria.
///
/// The sort is stable: tasks with equal keys keep their stored relative
/// order in both directions.
pub fn project(tasks: &[Task], criteria: &ViewCriteria) -> Vec<Task> {
    let mut result: Vec<Task> = tasks
        .iter()
        .filter(|task| match criteria.status {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        })
        .cloned()
        .collect();

    match (criteria.sort, criteria.direction) {
        (SortKey::Date, SortDirection::Asc) => {
            result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        (SortKey::Date, SortDirection::Desc) => {
            result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        (SortKey::Priority, SortDirection::Asc) => {
            result.sort_by(|a, b| a.priority.rank().cmp(&b.priority.rank()));
        }
        (SortKey::Priority, SortDirection::Desc) => {
            result.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        }
    }

    result
}
