//! Task store: the single owner of the task collection.
//!
//! Every mutation runs to completion, then persists write-through. A
//! failed persist never rolls back the in-memory change; it degrades to a
//! `persist_failed` notice and the session keeps the in-memory state as
//! the source of truth.

use tracing::debug;

use crate::error::{Error, Result};
use crate::notify::Notice;
use crate::storage::Storage;
use crate::task::{Task, TaskList, TaskPatch};

/// Owner of the ordered task collection.
#[derive(Debug)]
pub struct TaskStore {
    storage: Storage,
    tasks: TaskList,
}

/// Result of a successful create.
#[derive(Debug)]
pub struct CreateOutcome {
    pub task: Task,
    pub notices: Vec<Notice>,
}

/// Result of a successful update.
#[derive(Debug)]
pub struct UpdateOutcome {
    pub task: Task,
    pub notices: Vec<Notice>,
}

/// Result of a successful delete; carries the removed task.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub task: Task,
    pub notices: Vec<Notice>,
}

/// Result of a completion toggle. Toggles are silent: `notices` only ever
/// carries a persist failure.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub task: Task,
    pub notices: Vec<Notice>,
}

/// Result of a reorder. `moved` is false when source and target positions
/// already coincided (nothing persisted, nothing emitted).
#[derive(Debug)]
pub struct ReorderOutcome {
    pub task_id: String,
    pub from: usize,
    pub to: usize,
    pub moved: bool,
    pub notices: Vec<Notice>,
}

impl TaskStore {
    /// Open the store, loading the collection from storage (fail-open).
    pub fn open(storage: Storage) -> Self {
        let tasks = storage.load_tasks();
        Self { storage, tasks }
    }

    /// Build a store over an already-loaded collection. Used by tests.
    pub fn with_tasks(storage: Storage, tasks: TaskList) -> Self {
        Self { storage, tasks }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Resolve user input to a full task id.
    ///
    /// Accepts a full id or any unique prefix of one. Ambiguous prefixes
    /// are rejected rather than guessed.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }

        if let Some(task) = self.tasks.find(trimmed) {
            return Ok(task.id.clone());
        }

        let matches: Vec<&str> = self
            .tasks
            .iter()
            .filter(|task| task.id.starts_with(trimmed))
            .map(|task| task.id.as_str())
            .collect();

        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(trimmed.to_string())),
            [only] => Ok((*only).to_string()),
            many => Err(Error::InvalidArgument(format!(
                "ambiguous task id '{}': {}",
                trimmed,
                many.join(", ")
            ))),
        }
    }

    /// Create a task from user text. Rejects empty/whitespace-only text
    /// before any state change.
    pub fn create(&mut self, text: &str) -> Result<CreateOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyText);
        }

        let task = Task::new(trimmed);
        self.tasks.push(task.clone())?;
        debug!(id = %task.id, "task created");

        let mut notices = vec![Notice::task_added()];
        notices.extend(self.persist());
        Ok(CreateOutcome { task, notices })
    }

    /// Apply a partial update (text and/or priority) to an existing task.
    ///
    /// Validation happens before any field is touched, so a rejected update
    /// leaves no partial state change.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<UpdateOutcome> {
        if patch.is_empty() {
            return Err(Error::InvalidArgument(
                "nothing to update: provide text and/or priority".to_string(),
            ));
        }

        let new_text = match patch.text.as_deref() {
            Some(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(Error::EmptyText);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let task = self
            .tasks
            .find_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        if let Some(text) = new_text {
            task.text = text;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        let task = task.clone();
        debug!(id = %task.id, "task updated");

        let mut notices = vec![Notice::task_updated()];
        notices.extend(self.persist());
        Ok(UpdateOutcome { task, notices })
    }

    /// Remove a task by id.
    pub fn delete(&mut self, id: &str) -> Result<DeleteOutcome> {
        let task = self
            .tasks
            .remove(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        debug!(id = %task.id, "task deleted");

        let mut notices = vec![Notice::task_deleted()];
        notices.extend(self.persist());
        Ok(DeleteOutcome { task, notices })
    }

    /// Flip the completed flag. Deliberately silent: no user-facing notice
    /// for this mutation, unlike add/delete/update/reorder.
    pub fn toggle_completion(&mut self, id: &str) -> Result<ToggleOutcome> {
        let task = self
            .tasks
            .find_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        task.completed = !task.completed;
        let task = task.clone();
        debug!(id = %task.id, completed = task.completed, "task toggled");

        let notices: Vec<Notice> = self.persist().into_iter().collect();
        Ok(ToggleOutcome { task, notices })
    }

    /// Move `active_id` to the absolute position currently occupied by
    /// `over_id` in the full stored sequence, shifting the tasks in
    /// between. Positions are store positions, never view positions, so
    /// the result is well-defined even when a filtered view initiated the
    /// move.
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> Result<ReorderOutcome> {
        let from = self
            .tasks
            .position(active_id)
            .ok_or_else(|| Error::TaskNotFound(active_id.to_string()))?;
        let to = self
            .tasks
            .position(over_id)
            .ok_or_else(|| Error::TaskNotFound(over_id.to_string()))?;

        self.finish_reorder(active_id, from, to)
    }

    /// Index variant of reorder for direct CLI use. The target is an
    /// absolute index into the stored sequence.
    pub fn reorder_to_index(&mut self, id: &str, target_index: usize) -> Result<ReorderOutcome> {
        let from = self
            .tasks
            .position(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        if target_index >= self.tasks.len() {
            return Err(Error::IndexOutOfBounds {
                index: target_index,
                len: self.tasks.len(),
            });
        }

        self.finish_reorder(id, from, target_index)
    }

    fn finish_reorder(&mut self, id: &str, from: usize, to: usize) -> Result<ReorderOutcome> {
        if from == to {
            return Ok(ReorderOutcome {
                task_id: id.to_string(),
                from,
                to,
                moved: false,
                notices: Vec::new(),
            });
        }

        self.tasks.move_to(from, to);
        debug!(%id, from, to, "task reordered");

        let mut notices = vec![Notice::task_reordered()];
        notices.extend(self.persist());
        Ok(ReorderOutcome {
            task_id: id.to_string(),
            from,
            to,
            moved: true,
            notices,
        })
    }

    /// Write-through persist. Failures degrade to a notice; the in-memory
    /// collection stays authoritative.
    fn persist(&self) -> Option<Notice> {
        match self.storage.save_tasks(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(%err, "write-through persist failed, keeping in-memory state");
                Some(Notice::persist_failed(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, Severity};
    use crate::task::Priority;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, TaskStore) {
        let dir = TempDir::new().expect("tempdir");
        let storage = Storage::new(dir.path().to_path_buf());
        (dir, TaskStore::open(storage))
    }

    #[test]
    fn create_appends_with_defaults() {
        let (_dir, mut store) = open_store();
        let first = store.create("first").expect("create").task;
        let second = store.create("second").expect("create").task;

        assert_eq!(store.tasks().len(), 2);
        assert_ne!(first.id, second.id);
        assert!(!second.completed);
        assert_eq!(second.priority, Priority::Medium);
        assert_eq!(store.tasks().as_slice()[1].id, second.id);
    }

    #[test]
    fn create_trims_text() {
        let (_dir, mut store) = open_store();
        let task = store.create("  padded  ").expect("create").task;
        assert_eq!(task.text, "padded");
    }

    #[test]
    fn create_rejects_blank_text() {
        let (_dir, mut store) = open_store();
        assert!(matches!(store.create(""), Err(Error::EmptyText)));
        assert!(matches!(store.create("   \t"), Err(Error::EmptyText)));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn create_emits_success_notice() {
        let (_dir, mut store) = open_store();
        let outcome = store.create("notify me").expect("create");
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].kind, NoticeKind::TaskAdded);
        assert_eq!(outcome.notices[0].severity, Severity::Success);
    }

    #[test]
    fn update_patches_text_and_priority() {
        let (_dir, mut store) = open_store();
        let id = store.create("original").expect("create").task.id;

        let updated = store
            .update(
                &id,
                TaskPatch {
                    text: Some("revised".to_string()),
                    priority: Some(Priority::High),
                },
            )
            .expect("update")
            .task;
        assert_eq!(updated.text, "revised");
        assert_eq!(updated.priority, Priority::High);

        // Priority-only patch leaves text alone.
        let updated = store
            .update(
                &id,
                TaskPatch {
                    text: None,
                    priority: Some(Priority::Low),
                },
            )
            .expect("update")
            .task;
        assert_eq!(updated.text, "revised");
        assert_eq!(updated.priority, Priority::Low);
    }

    #[test]
    fn update_preserves_immutable_fields() {
        let (_dir, mut store) = open_store();
        let created = store.create("keep my identity").expect("create").task;

        let updated = store
            .update(
                &created.id,
                TaskPatch {
                    text: Some("new words".to_string()),
                    priority: None,
                },
            )
            .expect("update")
            .task;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.completed, created.completed);
    }

    #[test]
    fn update_rejects_blank_text_without_mutating() {
        let (_dir, mut store) = open_store();
        let id = store.create("intact").expect("create").task.id;

        let err = store
            .update(
                &id,
                TaskPatch {
                    text: Some("   ".to_string()),
                    priority: Some(Priority::High),
                },
            )
            .expect_err("blank text");
        assert!(matches!(err, Error::EmptyText));

        let task = store.tasks().find(&id).expect("task");
        assert_eq!(task.text, "intact");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn update_unknown_id_fails() {
        let (_dir, mut store) = open_store();
        let err = store
            .update(
                "missing",
                TaskPatch {
                    text: Some("x".to_string()),
                    priority: None,
                },
            )
            .expect_err("not found");
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (_dir, mut store) = open_store();
        let id = store.create("flip me").expect("create").task.id;

        let once = store.toggle_completion(&id).expect("toggle").task;
        assert!(once.completed);
        let twice = store.toggle_completion(&id).expect("toggle").task;
        assert!(!twice.completed);
    }

    #[test]
    fn toggle_is_silent() {
        let (_dir, mut store) = open_store();
        let id = store.create("quiet").expect("create").task.id;
        let outcome = store.toggle_completion(&id).expect("toggle");
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn delete_twice_reports_not_found_second_time() {
        let (_dir, mut store) = open_store();
        let id = store.create("ephemeral").expect("create").task.id;

        store.delete(&id).expect("first delete");
        assert!(store.tasks().is_empty());

        let err = store.delete(&id).expect_err("second delete");
        assert!(matches!(err, Error::TaskNotFound(_)));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn reorder_swaps_two_element_list() {
        let (_dir, mut store) = open_store();
        let a = store.create("a").expect("create").task.id;
        let b = store.create("b").expect("create").task.id;

        let outcome = store.reorder(&a, &b).expect("reorder");
        assert!(outcome.moved);
        assert_eq!(outcome.from, 0);
        assert_eq!(outcome.to, 1);

        let order: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec![b.as_str(), a.as_str()]);
    }

    #[test]
    fn reorder_onto_self_is_noop() {
        let (_dir, mut store) = open_store();
        let a = store.create("a").expect("create").task.id;
        store.create("b").expect("create");

        let outcome = store.reorder(&a, &a).expect("reorder");
        assert!(!outcome.moved);
        assert!(outcome.notices.is_empty());
        assert_eq!(store.tasks().as_slice()[0].id, a);
    }

    #[test]
    fn reorder_unknown_target_fails() {
        let (_dir, mut store) = open_store();
        let a = store.create("a").expect("create").task.id;
        let err = store.reorder(&a, "ghost").expect_err("unknown target");
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn reorder_to_index_bounds_checked() {
        let (_dir, mut store) = open_store();
        let a = store.create("a").expect("create").task.id;
        store.create("b").expect("create");

        let err = store.reorder_to_index(&a, 2).expect_err("out of bounds");
        assert!(matches!(err, Error::IndexOutOfBounds { index: 2, len: 2 }));

        let outcome = store.reorder_to_index(&a, 1).expect("reorder");
        assert!(outcome.moved);
        assert_eq!(store.tasks().as_slice()[1].id, a);
    }

    #[test]
    fn mutations_write_through() {
        let (dir, mut store) = open_store();
        let id = store.create("durable").expect("create").task.id;
        store.toggle_completion(&id).expect("toggle");

        // A fresh store over the same directory sees the persisted state.
        let reopened = TaskStore::open(Storage::new(dir.path().to_path_buf()));
        assert_eq!(reopened.tasks().len(), 1);
        assert!(reopened.tasks().find(&id).expect("task").completed);
    }

    #[test]
    fn persist_failure_degrades_to_notice() {
        let dir = TempDir::new().expect("tempdir");
        // Parent is a file, so slot writes cannot create the data dir.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "occupied").expect("write blocker");
        let storage = Storage::new(blocker.join("data"));
        let mut store = TaskStore::open(storage);

        let outcome = store.create("kept in memory").expect("create");
        assert_eq!(store.tasks().len(), 1);
        assert!(outcome
            .notices
            .iter()
            .any(|n| n.kind == NoticeKind::PersistFailed && n.severity == Severity::Error));
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let (_dir, mut store) = open_store();
        let id = store.create("findable").expect("create").task.id;

        assert_eq!(store.resolve_id(&id).expect("full id"), id);
        assert_eq!(store.resolve_id(&id[..8]).expect("prefix"), id);
        assert!(matches!(
            store.resolve_id("zzzz"),
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            store.resolve_id("  "),
            Err(Error::InvalidArgument(_))
        ));
    }
}
