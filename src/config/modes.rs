//! Network restore strategies.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How the host network is put back after leaving the console's hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreMode {
    /// Disassociate, then switch the radio off and on again so the OS
    /// re-runs auto-join for the user's regular network (default).
    #[default]
    PowerCycle,
    /// Disassociate only and leave reconnection to the OS.
    Disassociate,
}

impl RestoreMode {
    /// Whether the radio is toggled after disassociating.
    pub fn power_cycles(self) -> bool {
        matches!(self, RestoreMode::PowerCycle)
    }
}

impl fmt::Display for RestoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreMode::PowerCycle => write!(f, "power-cycle"),
            RestoreMode::Disassociate => write!(f, "disassociate"),
        }
    }
}

impl FromStr for RestoreMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "power-cycle" | "power_cycle" | "powercycle" => Ok(RestoreMode::PowerCycle),
            "disassociate" => Ok(RestoreMode::Disassociate),
            _ => Err(format!("Unknown restore mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_mode_round_trips_through_display() {
        for mode in [RestoreMode::PowerCycle, RestoreMode::Disassociate] {
            assert_eq!(mode.to_string().parse::<RestoreMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_restore_mode_rejects_unknown() {
        assert!("reboot".parse::<RestoreMode>().is_err());
    }

    #[test]
    fn test_restore_mode_reads_kebab_case_from_toml() {
        #[derive(Deserialize)]
        struct Options {
            restore_mode: RestoreMode,
        }

        let options: Options = toml::from_str("restore_mode = \"power-cycle\"").unwrap();
        assert_eq!(options.restore_mode, RestoreMode::PowerCycle);
        assert!(toml::from_str::<Options>("restore_mode = \"power_cycle\"").is_err());
    }
}
