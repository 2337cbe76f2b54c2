//! Output directory handling.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Fail unless `dir` is an existing directory.
pub fn check_output_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::OutputDirMissing(dir.to_path_buf()))
    }
}

/// Path a validated console filename is written to.
pub fn target_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(filename)
}

/// Write `bytes` to `path`, replacing any existing file.
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}
