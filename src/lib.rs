//! tm - Task Master Library
//!
//! This library provides the core functionality for the tm CLI tool,
//! a personal task-list manager with durable local state.
//!
//! # Core Concepts
//!
//! - **Task Store**: sole owner of the ordered task collection; every
//!   mutation persists write-through
//! - **View Projection**: pure filter+sort over the stored sequence,
//!   never mutating it
//! - **Durable Slots**: `tasks.json` and `darkMode` files under one data
//!   directory, written atomically under a file lock
//! - **Notices**: semantic events (added/deleted/updated/reordered) for an
//!   external notification layer
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tm.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `notify`: Outbound notice contract and JSONL sink
//! - `output`: Shared CLI output formatting
//! - `storage`: Durable slot persistence
//! - `store`: Task store mutations
//! - `task`: Task data model and ordered collection
//! - `view`: View criteria and projection

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod notify;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use error::{Error, Result};
