//! Configuration structures and loading logic.

use crate::config::modes::RestoreMode;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Address the console serves its album from while the hotspot is up.
pub const DEFAULT_GATEWAY: &str = "http://192.168.0.1/";

/// Whole-request budget for a single fetch.
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 60;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Per-invocation hotspot parameters. Only ever filled from the CLI.
    #[serde(skip)]
    pub hotspot: HotspotConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Hotspot credentials and output target for one run.
#[derive(Debug, Clone, Default)]
pub struct HotspotConfig {
    /// SSID the console advertises.
    pub ssid: String,

    /// WPA passphrase shown on the console screen.
    pub password: String,

    /// Existing directory the album files are written into.
    pub output_dir: Option<PathBuf>,
}

/// Transfer and network options.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    /// Base URL of the console's HTTP server.
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// WiFi interface to use; first wireless device when unset.
    #[serde(default)]
    pub interface: Option<String>,

    /// Seconds a single fetch (connect + transfer) may take.
    #[serde(default = "default_resource_timeout")]
    pub resource_timeout_secs: u64,

    /// Milliseconds between connection attempts while the link is down.
    #[serde(default = "default_connectivity_poll")]
    pub connectivity_poll_ms: u64,

    /// How the host network is restored afterwards.
    #[serde(default)]
    pub restore_mode: RestoreMode,

    /// Whether to show the per-file progress bar.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            interface: None,
            resource_timeout_secs: DEFAULT_RESOURCE_TIMEOUT_SECS,
            connectivity_poll_ms: default_connectivity_poll(),
            restore_mode: RestoreMode::default(),
            show_progress: true,
        }
    }
}

fn default_gateway() -> String {
    DEFAULT_GATEWAY.to_string()
}

fn default_resource_timeout() -> u64 {
    DEFAULT_RESOURCE_TIMEOUT_SECS
}

fn default_connectivity_poll() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

/// Location of the per-user configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "switch-album-import").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicitly named file, or the default file when it exists.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Gateway base URL, always ending in a slash so joins stay below it.
    pub fn gateway_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.options.gateway)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// URL of the album index.
    pub fn manifest_url(&self) -> Result<Url> {
        Ok(self.gateway_url()?.join("data.json")?)
    }

    /// URL of a single album file. `filename` must already be validated.
    pub fn file_url(&self, filename: &str) -> Result<Url> {
        Ok(self.gateway_url()?.join("img/")?.join(filename)?)
    }

    /// Budget for one fetch including connection setup.
    pub fn resource_timeout(&self) -> Duration {
        Duration::from_secs(self.options.resource_timeout_secs)
    }

    /// Delay between connection attempts while waiting for the link.
    pub fn connectivity_poll(&self) -> Duration {
        Duration::from_millis(self.options.connectivity_poll_ms)
    }

    /// The output directory, or an error naming the missing parameter.
    pub fn output_dir(&self) -> Result<&Path> {
        self.hotspot
            .output_dir
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("output_dir".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_console_gateway() {
        let config = Config::default();
        assert_eq!(
            config.manifest_url().unwrap().as_str(),
            "http://192.168.0.1/data.json"
        );
        assert_eq!(
            config.file_url("2024_shot.jpg").unwrap().as_str(),
            "http://192.168.0.1/img/2024_shot.jpg"
        );
        assert_eq!(config.resource_timeout(), Duration::from_secs(60));
        assert_eq!(config.options.restore_mode, RestoreMode::PowerCycle);
    }

    #[test]
    fn test_gateway_without_trailing_slash_keeps_path() {
        let mut config = Config::default();
        config.options.gateway = "http://127.0.0.1:8080/console".to_string();
        assert_eq!(
            config.manifest_url().unwrap().as_str(),
            "http://127.0.0.1:8080/console/data.json"
        );
    }

    #[test]
    fn test_load_options_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[options]\ninterface = \"wlan1\"\nresource_timeout_secs = 5\nrestore_mode = \"disassociate\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.options.interface.as_deref(), Some("wlan1"));
        assert_eq!(config.options.resource_timeout_secs, 5);
        assert_eq!(config.options.restore_mode, RestoreMode::Disassociate);
        assert_eq!(config.options.gateway, DEFAULT_GATEWAY);
        assert!(config.options.show_progress);
    }

    #[test]
    fn test_password_never_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hotspot]\nssid = \"x\"\npassword = \"secret\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.hotspot.password.is_empty());
        assert!(config.hotspot.ssid.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load_or_default(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
