//! In-memory session log and its append-only file writer.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// File name used for saved session logs, placed under the temp directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "nirisetup.log";

/// Ordered status lines for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    lines: Vec<String>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Owned copy of the lines, handed to runners at dispatch time.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.clone()
    }
}

/// Why saving the session log failed.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to open log file {} for writing: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write to log file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append `lines` to `path`, one newline-terminated line each.
///
/// The file is created with mode 0644 when missing. Lines written before a
/// failing write stay on disk. The handle is dropped before returning on
/// every path.
pub async fn append_lines(path: &Path, lines: &[String]) -> Result<(), SaveError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(path).await.map_err(|source| SaveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let write_error = |source: io::Error| SaveError::Write {
        path: path.to_path_buf(),
        source,
    };

    for line in lines {
        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(write_error)?;
    }
    file.flush().await.map_err(write_error)?;

    log::info!("Appended {} log lines to {}", lines.len(), path.display());
    Ok(())
}
