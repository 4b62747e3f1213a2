//! tm task command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::notify::{Notice, NoticeDestination, NoticeSink, Severity};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::task::{Priority, Task, TaskPatch};
use crate::view::{project, SortDirection, SortKey, StatusFilter, ViewCriteria};

pub struct AddOptions {
    pub text: String,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub text: Option<String>,
    pub priority: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct MoveOptions {
    pub id: String,
    pub over: Option<String>,
    pub index: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub events: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub(crate) struct TaskContext {
    pub store: TaskStore,
    pub config: Config,
}

/// Resolve config and storage, then open the store.
///
/// Precedence for the data directory: CLI flag/env, then config file, then
/// the platform default.
pub(crate) fn load_context(
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<TaskContext> {
    let config = match config_path {
        Some(path) => Config::load(&path)?,
        None => match default_config_path() {
            Some(path) => Config::load_or_default(&path),
            None => Config::default(),
        },
    };

    let storage = Storage::resolve(data_dir.or_else(|| config.data_dir.clone()))?;
    storage.init()?;
    let store = TaskStore::open(storage);
    Ok(TaskContext { store, config })
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tm").map(|dirs| dirs.config_dir().join("tm.toml"))
}

/// Open the notice sink if a destination was configured. Returns the sink
/// and whether notices go to stdout (which suppresses the JSON envelope).
pub(crate) fn open_notice_sink(events: Option<&str>) -> Result<(Option<NoticeSink>, bool)> {
    match NoticeDestination::parse(events) {
        Some(destination) => {
            let to_stdout = matches!(destination, NoticeDestination::Stdout);
            Ok((Some(destination.open()?), to_stdout))
        }
        None => Ok((None, false)),
    }
}

/// Forward notices to the sink and into human output: sink failures and
/// error-severity notices both become warnings, never hard errors. The
/// configured auto-dismiss hint is stamped onto each emitted notice.
pub(crate) fn forward_notices(
    sink: &mut Option<NoticeSink>,
    notices: &[Notice],
    display_ms: u64,
    human: &mut HumanOutput,
) {
    for notice in notices {
        if notice.severity == Severity::Error {
            human.push_warning(notice.message.clone());
        }
        if let Some(sink) = sink.as_mut() {
            let mut notice = notice.clone();
            notice.display_ms = display_ms;
            if let Err(err) = sink.emit(&notice) {
                human.push_warning(format!("notice emission failed: {err}"));
            }
        }
    }
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

#[derive(serde::Serialize)]
struct TaskAddedOutput {
    id: String,
    text: String,
    priority: Priority,
    created_at: DateTime<Utc>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.config)?;
    let (mut sink, events_to_stdout) = open_notice_sink(options.events.as_deref())?;

    let outcome = ctx.store.create(&options.text)?;
    let task = outcome.task;

    let mut human = HumanOutput::new("Task added");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Text", task.text.clone());
    human.push_summary("Priority", task.priority.to_string());
    forward_notices(&mut sink, &outcome.notices, ctx.config.notify.display_ms, &mut human);

    let output = TaskAddedOutput {
        id: task.id.clone(),
        text: task.text.clone(),
        priority: task.priority,
        created_at: task.created_at,
    };

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "add",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    criteria: ViewCriteria,
    tasks: Vec<Task>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.config)?;

    let defaults = ctx.config.view.criteria()?;
    let criteria = ViewCriteria {
        status: options
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()?
            .unwrap_or(defaults.status),
        sort: options
            .sort
            .as_deref()
            .map(str::parse::<SortKey>)
            .transpose()?
            .unwrap_or(defaults.sort),
        direction: options
            .direction
            .as_deref()
            .map(str::parse::<SortDirection>)
            .transpose()?
            .unwrap_or(defaults.direction),
    };

    let view = project(ctx.store.tasks().as_slice(), &criteria);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", view.len().to_string());
    for task in &view {
        human.push_detail(format!(
            "[{}][{}] {} {} ({})",
            if task.completed { "x" } else { " " },
            task.priority,
            short_id(&task.id),
            task.text,
            task.created_at.format("%Y-%m-%d")
        ));
    }
    if view.is_empty() {
        human.push_detail("no tasks match".to_string());
        human.push_next_step("tm add \"task text\"");
    }

    let output = TaskListOutput {
        total: view.len(),
        criteria,
        tasks: view,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskEditedOutput {
    id: String,
    text: String,
    priority: Priority,
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.config)?;
    let (mut sink, events_to_stdout) = open_notice_sink(options.events.as_deref())?;

    let priority = options
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let patch = TaskPatch {
        text: options.text,
        priority,
    };

    let id = ctx.store.resolve_id(&options.id)?;
    let outcome = ctx.store.update(&id, patch)?;
    let task = outcome.task;

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Text", task.text.clone());
    human.push_summary("Priority", task.priority.to_string());
    forward_notices(&mut sink, &outcome.notices, ctx.config.notify.display_ms, &mut human);

    let output = TaskEditedOutput {
        id: task.id.clone(),
        text: task.text.clone(),
        priority: task.priority,
    };

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "edit",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskToggledOutput {
    id: String,
    completed: bool,
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.config)?;
    let (mut sink, events_to_stdout) = open_notice_sink(options.events.as_deref())?;

    let id = ctx.store.resolve_id(&options.id)?;
    let outcome = ctx.store.toggle_completion(&id)?;
    let task = outcome.task;

    let mut human = HumanOutput::new(if task.completed {
        "Task completed"
    } else {
        "Task reopened"
    });
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Text", task.text.clone());
    // Toggles are silent by contract: notices here can only be persist
    // failures, which forward_notices surfaces as warnings.
    forward_notices(&mut sink, &outcome.notices, ctx.config.notify.display_ms, &mut human);

    let output = TaskToggledOutput {
        id: task.id.clone(),
        completed: task.completed,
    };

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "toggle",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskRemovedOutput {
    id: String,
    text: String,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.config)?;
    let (mut sink, events_to_stdout) = open_notice_sink(options.events.as_deref())?;

    let id = ctx.store.resolve_id(&options.id)?;
    let outcome = ctx.store.delete(&id)?;
    let task = outcome.task;

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", short_id(&task.id));
    human.push_summary("Text", task.text.clone());
    forward_notices(&mut sink, &outcome.notices, ctx.config.notify.display_ms, &mut human);

    let output = TaskRemovedOutput {
        id: task.id.clone(),
        text: task.text,
    };

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "rm",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskMovedOutput {
    id: String,
    from: usize,
    to: usize,
    moved: bool,
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.config)?;
    let (mut sink, events_to_stdout) = open_notice_sink(options.events.as_deref())?;

    let id = ctx.store.resolve_id(&options.id)?;
    let outcome = match (options.over, options.index) {
        (Some(over), None) => {
            let over_id = ctx.store.resolve_id(&over)?;
            ctx.store.reorder(&id, &over_id)?
        }
        (None, Some(index)) => ctx.store.reorder_to_index(&id, index)?,
        (None, None) => {
            return Err(Error::InvalidArgument(
                "provide a target task id or --index".to_string(),
            ));
        }
        (Some(_), Some(_)) => {
            // clap's conflicts_with already rejects this; keep the guard for
            // library callers.
            return Err(Error::InvalidArgument(
                "target task id and --index are mutually exclusive".to_string(),
            ));
        }
    };

    let mut human = HumanOutput::new(if outcome.moved {
        "Task moved"
    } else {
        "Task already in place"
    });
    human.push_summary("ID", short_id(&outcome.task_id));
    human.push_summary("From", outcome.from.to_string());
    human.push_summary("To", outcome.to.to_string());
    forward_notices(&mut sink, &outcome.notices, ctx.config.notify.display_ms, &mut human);

    let output = TaskMovedOutput {
        id: outcome.task_id.clone(),
        from: outcome.from,
        to: outcome.to,
        moved: outcome.moved,
    };

    emit_success(
        OutputOptions {
            json: options.json && !events_to_stdout,
            quiet: options.quiet || events_to_stdout,
        },
        "move",
        &output,
        Some(&human),
    )
}
