//! JSON snapshot dump format.
//!
//! Dumps carry the flat task list of one monitoring cycle. Loading a dump
//! validates the leader/thread layout before a [`Snapshot`] is handed out.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::task::{Snapshot, SnapshotError, TaskRecord};

/// Current dump format version.
pub const DUMP_VERSION: &str = "1.0";

/// Errors raised while reading or writing a dump.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("snapshot dump not found: {0}")]
    NotFound(String),

    #[error("failed to read or write snapshot dump: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse snapshot dump JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid snapshot layout: {0}")]
    Layout(#[from] SnapshotError),
}

/// Root structure of a dump file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDump {
    pub version: String,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u64>,
    pub tasks: Vec<TaskRecord>,
}

impl SnapshotDump {
    /// Wraps task records with the current version and timestamp.
    pub fn from_tasks(tasks: Vec<TaskRecord>) -> Self {
        Self {
            version: DUMP_VERSION.to_string(),
            generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            interval_seconds: None,
            tasks,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_tasks(snapshot.tasks().to_vec())
    }

    /// Validates the layout and builds a snapshot.
    pub fn into_snapshot(self) -> Result<Snapshot, SnapshotError> {
        Snapshot::new(self.tasks)
    }
}

/// Parses a dump from a JSON string.
pub fn parse_dump(content: &str) -> Result<Snapshot, DumpError> {
    let dump: SnapshotDump = serde_json::from_str(content)?;
    debug!(
        "Parsed dump version {} generated at {} with {} tasks",
        dump.version,
        dump.generated_at,
        dump.tasks.len()
    );
    Ok(dump.into_snapshot()?)
}

/// Loads and validates a dump file. `-` reads from stdin.
pub fn load_dump(path: &Path) -> Result<Snapshot, DumpError> {
    let content = if path.as_os_str() == "-" {
        io::read_to_string(io::stdin())?
    } else {
        if !path.exists() {
            return Err(DumpError::NotFound(path.display().to_string()));
        }
        fs::read_to_string(path)?
    };

    let snapshot = parse_dump(&content)?;
    info!(
        "Loaded snapshot with {} processes ({} tasks) from {}",
        snapshot.process_count(),
        snapshot.task_count(),
        path.display()
    );
    Ok(snapshot)
}

/// Serializes a snapshot as a dump document.
pub fn render_dump(snapshot: &Snapshot, pretty: bool) -> Result<String, DumpError> {
    let dump = SnapshotDump::from_snapshot(snapshot);
    let content = if pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    Ok(content)
}

/// Writes a snapshot as a dump file. `-` writes to stdout.
pub fn save_dump(path: &Path, snapshot: &Snapshot, pretty: bool) -> Result<(), DumpError> {
    let content = render_dump(snapshot, pretty)?;
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        fs::write(path, content)?;
        debug!("Wrote {} tasks to {}", snapshot.task_count(), path.display());
    }
    Ok(())
}
