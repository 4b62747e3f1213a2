//! Task data model for tm.
//!
//! A task is a short text item with a completion flag, a priority, and a
//! creation timestamp. Tasks live in an ordered collection whose order is
//! user-controlled; new tasks append at the end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Task priority. Variant order defines the sort ordinal (Low < Medium < High).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Numeric rank used for priority sorting (Low=1, Medium=2, High=3).
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task record.
///
/// Field names serialize in camelCase to match the durable slot format:
/// `{"id", "text", "completed", "createdAt", "priority"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    /// Build a new task with a fresh id, the given (already validated) text,
    /// and creation-time defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
            priority: Priority::default(),
        }
    }
}

/// Partial update applied to an existing task.
///
/// Only `text` and `priority` are reachable through updates; `id`,
/// `created_at`, and `completed` are not.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.priority.is_none()
    }
}

/// The ordered task collection.
///
/// Invariants: ids are unique; sequence order is significant and only
/// changes through explicit reorder operations. Construction from
/// untrusted data goes through `from_vec`, which enforces id uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sequence, rejecting duplicate ids.
    pub fn from_vec(tasks: Vec<Task>) -> Result<Self> {
        let list = Self { tasks };
        list.validate()?;
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Append a task, rejecting a duplicate id.
    pub fn push(&mut self, task: Task) -> Result<()> {
        if self.position(&task.id).is_some() {
            return Err(Error::InvalidArgument(format!(
                "duplicate task id: {}",
                task.id
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove the task with the given id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.position(id).map(|idx| self.tasks.remove(idx))
    }

    /// Splice-move the element at `from` to `to`, shifting the elements in
    /// between and preserving all other relative order.
    pub fn move_to(&mut self, from: usize, to: usize) {
        if from == to || from >= self.tasks.len() || to >= self.tasks.len() {
            return;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
    }

    /// Check the unique-id invariant.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate task id: {}",
                    task.id
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
