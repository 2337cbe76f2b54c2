//! Command-line argument definitions using clap.

use clap::{CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{Config, RestoreMode};

/// Usage text shown for `-h` and for missing parameters.
pub const USAGE: &str = "switch-album-import -h|-help|--help
       switch-album-import -ssid <ssid> -password <password> -output_dir <dir> [OPTIONS]";

/// Album importer CLI.
#[derive(Parser, Debug)]
#[command(
    name = "switch-album-import",
    version,
    about = "Import album screenshots and videos from a game console's WiFi hotspot",
    long_about = "Joins the console's temporary WiFi hotspot, downloads every file it lists \
                  into an existing directory, then restores the host's WiFi.\n\n\
                  Start the transfer on the console first; it shows the SSID and password.",
    override_usage = USAGE
)]
pub struct Args {
    /// SSID of the console's hotspot.
    #[arg(long, env = "SWITCH_SSID")]
    pub ssid: Option<String>,

    /// Hotspot password shown on the console.
    #[arg(long, env = "SWITCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Existing directory the files are written into.
    #[arg(long = "output_dir", env = "SWITCH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to a configuration file with extra options.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the console's web server.
    #[arg(long)]
    pub gateway: Option<String>,

    /// WiFi interface to use (default: first wireless interface).
    #[arg(long)]
    pub interface: Option<String>,

    /// Seconds a single file may take, connection included.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// How to restore the host network afterwards.
    #[arg(long, value_enum)]
    pub restore: Option<RestoreModeArg>,

    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI restore mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RestoreModeArg {
    /// Disconnect, then toggle the radio so the OS rejoins its usual network.
    PowerCycle,
    /// Disconnect only.
    Disassociate,
}

impl From<RestoreModeArg> for RestoreMode {
    fn from(arg: RestoreModeArg) -> Self {
        match arg {
            RestoreModeArg::PowerCycle => RestoreMode::PowerCycle,
            RestoreModeArg::Disassociate => RestoreMode::Disassociate,
        }
    }
}

impl Args {
    /// Parse arguments, accepting single-dash long flags such as `-ssid`.
    pub fn try_parse_normalized<I, T>(raw: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(raw))
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(ssid) = self.ssid {
            config.hotspot.ssid = ssid;
        }

        if let Some(password) = self.password {
            config.hotspot.password = password;
        }

        if let Some(dir) = self.output_dir {
            config.hotspot.output_dir = Some(dir);
        }

        if let Some(gateway) = self.gateway {
            config.options.gateway = gateway;
        }

        if let Some(interface) = self.interface {
            config.options.interface = Some(interface);
        }

        if let Some(timeout) = self.timeout {
            config.options.resource_timeout_secs = timeout;
        }

        if let Some(restore) = self.restore {
            config.options.restore_mode = restore.into();
        }

        if self.quiet {
            config.options.show_progress = false;
        }
    }
}

/// Rewrite `-name` to `--name` for every long flag the parser knows.
///
/// Everything after a bare `--` is passed through untouched.
pub fn normalize_args<I, T>(raw: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let mut longs: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .collect();
    longs.extend(["help", "version"]);

    let mut passthrough = false;
    raw.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            let text = arg.to_str().unwrap_or_default();
            if text == "--" {
                passthrough = true;
            } else if is_single_dash_long(text, &longs) {
                return OsString::from(format!("-{}", text));
            }
            arg
        })
        .collect()
}

/// `-name` or `-name=value` where `name` is a known long flag.
fn is_single_dash_long(text: &str, longs: &[&str]) -> bool {
    match text.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') && rest.len() > 1 => {
            let name = rest.split('=').next().unwrap_or(rest);
            longs.contains(&name)
        }
        _ => false,
    }
}
