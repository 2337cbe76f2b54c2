//! Download state tracking.

use std::path::PathBuf;

/// Result of one attempted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written {
        filename: String,
        path: PathBuf,
        bytes: u64,
    },
    Failed {
        filename: String,
        cause: String,
    },
}

impl FileOutcome {
    pub fn filename(&self) -> &str {
        match self {
            FileOutcome::Written { filename, .. } | FileOutcome::Failed { filename, .. } => {
                filename
            }
        }
    }
}

/// Run-level verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    AllSucceeded { console_name: String, files: usize },
    FailedAt { filename: String, cause: String },
}

/// Per-run download state.
#[derive(Debug, Default)]
pub struct DownloadState {
    pub console_name: Option<String>,
    pub files_listed: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl DownloadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the album index once it has been resolved.
    pub fn set_manifest(&mut self, console_name: &str, files_listed: usize) {
        self.console_name = Some(console_name.to_string());
        self.files_listed = files_listed;
    }

    pub fn record_written(&mut self, filename: &str, path: PathBuf, bytes: u64) {
        self.outcomes.push(FileOutcome::Written {
            filename: filename.to_string(),
            path,
            bytes,
        });
    }

    pub fn record_failed(&mut self, filename: &str, cause: impl ToString) {
        self.outcomes.push(FileOutcome::Failed {
            filename: filename.to_string(),
            cause: cause.to_string(),
        });
    }

    /// Number of files written to disk.
    pub fn files_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Written { .. }))
            .count()
    }

    /// Total bytes written to disk.
    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Written { bytes, .. } => *bytes,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// Verdict for the run so far, `None` while files remain.
    pub fn outcome(&self) -> Option<RunOutcome> {
        if let Some(FileOutcome::Failed { filename, cause }) = self.outcomes.last() {
            return Some(RunOutcome::FailedAt {
                filename: filename.clone(),
                cause: cause.clone(),
            });
        }

        let console_name = self.console_name.clone()?;
        if self.files_written() == self.files_listed {
            Some(RunOutcome::AllSucceeded {
                console_name,
                files: self.files_listed,
            })
        } else {
            None
        }
    }
}
