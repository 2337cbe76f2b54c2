//! Filesystem module.
//!
//! Provides:
//! - Console filename validation
//! - Output directory checks and file writes

pub mod naming;
pub mod paths;

pub use naming::{FilenameRule, CONSOLE_FILENAME_PATTERN};
pub use paths::{check_output_dir, target_path, write_file};
