//! Switch Album Import - pull screenshots and videos off a game console.
//!
//! The console shares its album over a short-lived WiFi hotspot with an
//! unauthenticated HTTP server. This library joins that hotspot, fetches the
//! album index, downloads every listed file, and puts the host's WiFi back
//! the way the OS would have it.
//!
//! # Features
//!
//! - Double scan and radio power-cycle workarounds isolated in the WiFi session
//! - Session release on success, error and termination signals
//! - Single transparent retry when the hotspot drops the link mid-request
//! - Whole-request timeout for abandoned transfers
//! - Strict filename checks on names supplied by the device
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use switch_album_import::{download, Config, DownloadState, NmcliBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.hotspot.ssid = "switch_4F2A00".into();
//!     config.hotspot.password = "abcd1234".into();
//!     config.hotspot.output_dir = Some(PathBuf::from("album"));
//!
//!     let mut state = DownloadState::new();
//!     download::run(&config, NmcliBackend::new(), &mut state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod wifi;

// Re-exports for convenience
pub use api::{Manifest, ResilientFetcher};
pub use config::{Config, RestoreMode};
pub use download::{DownloadState, RunOutcome};
pub use error::{Error, Result};
pub use wifi::{NmcliBackend, SessionManager, WifiBackend};
