//! Append-only audit log of scheduling events.
//!
//! One timestamped line per successful mutation, appended to a plain
//! text file with exclusive file locking. The core never reads the log
//! back.

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink for audit events
pub trait EventSink {
    fn append(&mut self, event: &str) -> Result<()>;
}

/// File-backed audit log writing `[YYYY-MM-DD HH:MM:SS] <event>` lines
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    /// Create a new audit log for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EventSink for FileAuditLog {
    fn append(&mut self, event: &str) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::Io)?;

        file.lock_exclusive()?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut writer = std::io::BufWriter::new(&file);
        writeln!(writer, "[{}] {}", timestamp, event)?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended audit event: {}", event);
        Ok(())
    }
}
