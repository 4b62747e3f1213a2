//! Command-line interface for tm
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in submodules.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;
mod theme;

/// tm - Task Master
///
/// A personal task list for the terminal: add, edit, complete, delete,
/// reorder, filter, and sort short text tasks, persisted across sessions.
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TM_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Config file path (defaults to the platform config dir)
    #[arg(long, global = true, env = "TM_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Notice destination: "-" for stdout, otherwise a JSONL file path
    #[arg(long, global = true, env = "TM_EVENTS")]
    pub events: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task text
        text: String,
    },

    /// List tasks with optional filter and sort
    List {
        /// Completion filter: all, active, completed
        #[arg(long)]
        status: Option<String>,

        /// Sort key: date, priority
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction: asc, desc
        #[arg(long)]
        direction: Option<String>,
    },

    /// Edit a task's text and/or priority
    Edit {
        /// Task id (full id or unique prefix)
        id: String,

        /// New task text
        #[arg(long)]
        text: Option<String>,

        /// New priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,
    },

    /// Toggle a task's completion state
    Toggle {
        /// Task id (full id or unique prefix)
        id: String,
    },

    /// Delete a task
    Rm {
        /// Task id (full id or unique prefix)
        id: String,
    },

    /// Move a task to another task's position in the stored order
    Move {
        /// Task id to move (full id or unique prefix)
        id: String,

        /// Target task id; the moved task lands at its position
        over: Option<String>,

        /// Absolute target position in the stored order (0-based)
        #[arg(long, conflicts_with = "over")]
        index: Option<usize>,
    },

    /// Show or set the theme preference
    Theme {
        /// Theme mode: dark or light (omit to show the current mode)
        mode: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add { text } => task::run_add(task::AddOptions {
                text,
                data_dir: self.data_dir,
                config: self.config,
                events: self.events,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List {
                status,
                sort,
                direction,
            } => task::run_list(task::ListOptions {
                status,
                sort,
                direction,
                data_dir: self.data_dir,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit { id, text, priority } => task::run_edit(task::EditOptions {
                id,
                text,
                priority,
                data_dir: self.data_dir,
                config: self.config,
                events: self.events,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Toggle { id } => task::run_toggle(task::ToggleOptions {
                id,
                data_dir: self.data_dir,
                config: self.config,
                events: self.events,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Rm { id } => task::run_rm(task::RmOptions {
                id,
                data_dir: self.data_dir,
                config: self.config,
                events: self.events,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Move { id, over, index } => task::run_move(task::MoveOptions {
                id,
                over,
                index,
                data_dir: self.data_dir,
                config: self.config,
                events: self.events,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Theme { mode } => theme::run(theme::ThemeOptions {
                mode,
                data_dir: self.data_dir,
                config: self.config,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
