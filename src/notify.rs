//! Outbound notices for the notification layer.
//!
//! The engine emits semantic notices on mutations; an external layer (a
//! snackbar, a desktop notifier, a log collector) renders them. Notices are
//! written as JSON lines to stdout or a configured file.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

use crate::error::{Error, Result};

pub const NOTICE_SCHEMA_VERSION: &str = "tm.notice.v1";

/// How long a renderer should keep a notice visible before auto-dismissing.
pub const NOTICE_DISPLAY_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub enum NoticeDestination {
    Stdout,
    File(PathBuf),
}

impl NoticeDestination {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed == "-" {
                return Some(NoticeDestination::Stdout);
            }
            Some(NoticeDestination::File(PathBuf::from(trimmed)))
        })
    }

    pub fn open(&self) -> Result<NoticeSink> {
        match self {
            NoticeDestination::Stdout => Ok(NoticeSink::stdout()),
            NoticeDestination::File(path) => NoticeSink::file(path),
        }
    }
}

/// Display severity for a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Semantic notice kinds emitted by the store.
///
/// Completion toggles are deliberately silent and have no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    TaskAdded,
    TaskDeleted,
    TaskUpdated,
    TaskReordered,
    PersistFailed,
}

/// A structured notice with a renderer-facing message.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub schema_version: &'static str,
    pub notice_id: String,
    pub kind: NoticeKind,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub display_ms: u64,
}

impl Notice {
    pub fn new(kind: NoticeKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            schema_version: NOTICE_SCHEMA_VERSION,
            notice_id: Ulid::new().to_string(),
            kind,
            severity,
            message: message.into(),
            timestamp: Utc::now(),
            display_ms: NOTICE_DISPLAY_MS,
        }
    }

    pub fn task_added() -> Self {
        Self::new(
            NoticeKind::TaskAdded,
            Severity::Success,
            "Task added successfully",
        )
    }

    pub fn task_deleted() -> Self {
        Self::new(NoticeKind::TaskDeleted, Severity::Info, "Task deleted")
    }

    pub fn task_updated() -> Self {
        Self::new(
            NoticeKind::TaskUpdated,
            Severity::Success,
            "Task updated successfully",
        )
    }

    pub fn task_reordered() -> Self {
        Self::new(NoticeKind::TaskReordered, Severity::Info, "Task order updated")
    }

    pub fn persist_failed(err: &Error) -> Self {
        Self::new(
            NoticeKind::PersistFailed,
            Severity::Error,
            format!("Failed to save tasks: {err}"),
        )
    }
}

/// Notice sink that writes JSONL output to a destination.
pub struct NoticeSink {
    writer: Box<dyn Write + Send>,
}

impl NoticeSink {
    /// Emit notices to stdout.
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(std::io::stdout()),
        }
    }

    /// Emit notices to a file, creating it if necessary.
    pub fn file(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: Box::new(file),
        })
    }

    /// Write a single notice as JSONL.
    pub fn emit(&mut self, notice: &Notice) -> Result<()> {
        let serialized = serde_json::to_vec(notice)?;
        self.writer.write_all(&serialized)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush().map_err(Error::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_parsing() {
        assert!(NoticeDestination::parse(None).is_none());
        assert!(NoticeDestination::parse(Some("  ")).is_none());
        assert!(matches!(
            NoticeDestination::parse(Some("-")),
            Some(NoticeDestination::Stdout)
        ));
        assert!(matches!(
            NoticeDestination::parse(Some("/tmp/notices.jsonl")),
            Some(NoticeDestination::File(_))
        ));
    }

    #[test]
    fn notice_payload_shape() {
        let notice = Notice::task_added();
        let json = serde_json::to_value(&notice).expect("serialize");
        assert_eq!(json["schema_version"], NOTICE_SCHEMA_VERSION);
        assert_eq!(json["kind"], "task_added");
        assert_eq!(json["severity"], "success");
        assert_eq!(json["message"], "Task added successfully");
        assert_eq!(json["display_ms"], 3000);
    }

    #[test]
    fn reorder_notice_is_info() {
        let notice = Notice::task_reordered();
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.message, "Task order updated");
    }

    #[test]
    fn sink_writes_jsonl() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notices.jsonl");
        let mut sink = NoticeSink::file(&path).expect("sink");
        sink.emit(&Notice::task_deleted()).expect("emit");
        sink.emit(&Notice::task_reordered()).expect("emit");

        let content = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).expect("parse line");
            assert!(value.get("notice_id").is_some());
        }
    }
}
