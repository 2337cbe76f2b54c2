//! Error types for the switch-album-import application.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::TransportError;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required parameter: {0}")]
    MissingConfig(String),

    #[error("No such directory: {}", .0.display())]
    OutputDirMissing(PathBuf),

    // WiFi errors
    #[error("No usable WiFi interface found on this host")]
    WifiUnavailable,

    #[error("Hotspot not found: {0}")]
    HotspotNotFound(String),

    #[error("Failed to connect to '{ssid}': {reason}")]
    AssociationFailed { ssid: String, reason: String },

    #[error("WiFi command failed: {0}")]
    WifiCommand(String),

    // Transfer errors
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Malformed index file ({reason}): {raw}")]
    MalformedManifest { raw: String, reason: String },

    #[error("Bad filename from console: {0:?}")]
    BadFilename(String),

    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted by signal")]
    Interrupted,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether this error should be answered with the usage text.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::MissingConfig(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
}
