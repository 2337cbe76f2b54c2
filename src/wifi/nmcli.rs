//! NetworkManager backend driven through `nmcli`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::wifi::backend::{NetworkHandle, WifiBackend};

/// `nmcli` executable name.
const NMCLI: &str = "nmcli";

/// Secret flag value for "never store this secret".
const PSK_NOT_SAVED: &str = "2";

/// Setting key for the WPA pre-shared key in a `passwd-file`.
const PSK_SETTING: &str = "802-11-wireless-security.psk";

/// WiFi backend for Linux hosts running NetworkManager.
#[derive(Debug, Clone)]
pub struct NmcliBackend {
    program: String,
}

impl Default for NmcliBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NmcliBackend {
    pub fn new() -> Self {
        Self {
            program: NMCLI.to_string(),
        }
    }

    /// Use a different `nmcli` binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run nmcli and return its stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        self.run_with_input(args, None).await
    }

    /// Run nmcli with `input` written to its stdin.
    async fn run_with_input(&self, args: &[&str], input: Option<&str>) -> Result<String> {
        let shown = args.join(" ");
        tracing::debug!("Running {} {}", self.program, shown);

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::WifiCommand(format!(
                        "{} not found. Please install NetworkManager and ensure it's in your PATH.",
                        self.program
                    ))
                } else {
                    Error::WifiCommand(format!("Failed to run {}: {}", self.program, e))
                }
            })?;

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await.map_err(|e| {
                Error::WifiCommand(format!("Failed to feed {} {}: {}", self.program, shown, e))
            })?;
            // Dropping stdin closes the pipe so nmcli sees end of input.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::WifiCommand(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::WifiCommand(format!(
                "{} {} exited with {}: {}",
                self.program,
                shown,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Remove the saved profile named after `ssid`, if there is one.
    async fn delete_profile(&self, ssid: &str) {
        if let Err(e) = self.run(&["connection", "delete", "id", ssid]).await {
            tracing::debug!("No profile {} to delete: {}", ssid, e);
        }
    }
}

#[async_trait]
impl WifiBackend for NmcliBackend {
    async fn wifi_interface(&self, preferred: Option<&str>) -> Result<Option<String>> {
        let listing = self.run(&["-t", "-f", "DEVICE,TYPE", "device"]).await?;
        Ok(pick_wifi_device(&listing, preferred))
    }

    async fn scan(&self, interface: &str, ssid: &str) -> Result<Option<NetworkHandle>> {
        let listing = self
            .run(&[
                "-t",
                "-f",
                "SSID,BSSID",
                "device",
                "wifi",
                "list",
                "ifname",
                interface,
                "--rescan",
                "yes",
            ])
            .await?;
        Ok(find_network(&listing, ssid))
    }

    /// Join through a throwaway profile. The key is handed to nmcli on
    /// stdin and never saved, so it does not show up in the process table
    /// or in the profile on disk. The profile never auto-connects.
    async fn associate(
        &self,
        interface: &str,
        network: &NetworkHandle,
        password: &str,
    ) -> Result<()> {
        let ssid = network.ssid.as_str();
        let association_failed = |e: Error| Error::AssociationFailed {
            ssid: network.ssid.clone(),
            reason: e.to_string(),
        };

        self.delete_profile(ssid).await;

        let mut add = vec![
            "connection",
            "add",
            "type",
            "wifi",
            "ifname",
            interface,
            "con-name",
            ssid,
            "ssid",
            ssid,
            "wifi-sec.key-mgmt",
            "wpa-psk",
            "wifi-sec.psk-flags",
            PSK_NOT_SAVED,
            "connection.autoconnect",
            "no",
        ];
        if let Some(bssid) = network.bssid.as_deref() {
            add.extend(["802-11-wireless.bssid", bssid]);
        }
        self.run(&add).await.map_err(association_failed)?;

        let secrets = format!("{}:{}\n", PSK_SETTING, password);
        if let Err(e) = self
            .run_with_input(
                &["connection", "up", "id", ssid, "passwd-file", "/dev/stdin"],
                Some(&secrets),
            )
            .await
        {
            self.delete_profile(ssid).await;
            return Err(association_failed(e));
        }

        Ok(())
    }

    /// Bring the hotspot's profile down so the device stays free for
    /// auto-join. Falls back to disconnecting the device.
    async fn disassociate(&self, interface: &str, network: &NetworkHandle) -> Result<()> {
        let ssid = network.ssid.as_str();
        if let Err(e) = self.run(&["connection", "down", "id", ssid]).await {
            tracing::warn!(
                "Could not bring down {}, disconnecting {} instead: {}",
                ssid,
                interface,
                e
            );
            self.run(&["device", "disconnect", interface]).await?;
        }

        self.delete_profile(ssid).await;
        Ok(())
    }

    async fn set_power(&self, _interface: &str, on: bool) -> Result<()> {
        self.run(&["radio", "wifi", if on { "on" } else { "off" }])
            .await?;
        Ok(())
    }
}

/// Split one line of `nmcli -t` output into fields.
///
/// Terse mode separates fields with `:` and escapes literal `:` and `\`
/// inside values with a backslash.
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Choose the wireless device from a `DEVICE,TYPE` listing.
fn pick_wifi_device(listing: &str, preferred: Option<&str>) -> Option<String> {
    let mut devices = listing
        .lines()
        .map(split_terse)
        .filter(|fields| fields.len() >= 2 && fields[1] == "wifi")
        .map(|mut fields| fields.swap_remove(0));

    match preferred {
        Some(name) => devices.find(|device| device == name),
        None => devices.next(),
    }
}

/// Find `ssid` in an `SSID,BSSID` scan listing.
fn find_network(listing: &str, ssid: &str) -> Option<NetworkHandle> {
    listing
        .lines()
        .map(split_terse)
        .find(|fields| fields.first().map(String::as_str) == Some(ssid))
        .map(|fields| NetworkHandle {
            ssid: ssid.to_string(),
            bssid: fields.get(1).filter(|b| !b.is_empty()).cloned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_terse_unescapes_colons() {
        assert_eq!(
            split_terse(r"switch_4F2A00:AA\:BB\:CC\:DD\:EE\:FF"),
            vec!["switch_4F2A00", "AA:BB:CC:DD:EE:FF"]
        );
        assert_eq!(split_terse(r"a\\b:"), vec![r"a\b", ""]);
    }

    #[test]
    fn test_pick_wifi_device() {
        let listing = "enp3s0:ethernet\nwlp2s0:wifi\nwlan1:wifi\nlo:loopback\n";
        assert_eq!(pick_wifi_device(listing, None).as_deref(), Some("wlp2s0"));
        assert_eq!(
            pick_wifi_device(listing, Some("wlan1")).as_deref(),
            Some("wlan1")
        );
        assert_eq!(pick_wifi_device(listing, Some("enp3s0")), None);
        assert_eq!(pick_wifi_device("enp3s0:ethernet\n", None), None);
    }

    #[test]
    fn test_find_network() {
        let listing = "HomeNet:11\\:22\\:33\\:44\\:55\\:66\nswitch_4F2A00:AA\\:BB\\:CC\\:DD\\:EE\\:FF\n";
        let handle = find_network(listing, "switch_4F2A00").unwrap();
        assert_eq!(handle.ssid, "switch_4F2A00");
        assert_eq!(handle.bssid.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert!(find_network(listing, "switch_000000").is_none());
    }

    #[test]
    fn test_find_network_is_exact_match() {
        let listing = "switch_4F2A00_5G:AA\\:BB\\:CC\\:DD\\:EE\\:FF\n";
        assert!(find_network(listing, "switch_4F2A00").is_none());
    }

    #[tokio::test]
    async fn test_missing_program_is_reported() {
        let backend = NmcliBackend::with_program("nmcli-does-not-exist");
        let err = backend.wifi_interface(None).await.unwrap_err();
        assert!(matches!(err, Error::WifiCommand(msg) if msg.contains("not found")));
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};

        /// A stand-in `nmcli` that appends its arguments to `calls.log` and
        /// saves whatever it receives on stdin for `passwd-file` calls.
        fn fake_nmcli(dir: &Path, fail_connection_down: bool) -> NmcliBackend {
            let calls = dir.join("calls.log");
            let stdin = dir.join("stdin.log");
            let script = format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$*\" >> '{calls}'\n\
                 case \"$*\" in *passwd-file*) cat > '{stdin}' ;; esac\n\
                 case \"$*\" in 'connection down'*) exit {down} ;; esac\n\
                 exit 0\n",
                calls = calls.display(),
                stdin = stdin.display(),
                down = if fail_connection_down { 10 } else { 0 },
            );

            let program: PathBuf = dir.join("nmcli");
            std::fs::write(&program, script).unwrap();
            std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
            NmcliBackend::with_program(program.to_string_lossy())
        }

        fn logged_calls(dir: &Path) -> Vec<String> {
            std::fs::read_to_string(dir.join("calls.log"))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn hotspot() -> NetworkHandle {
            NetworkHandle {
                ssid: "switch_4F2A00".to_string(),
                bssid: Some("AA:BB:CC:DD:EE:FF".to_string()),
            }
        }

        #[tokio::test]
        async fn test_associate_passes_key_on_stdin_only() {
            let dir = tempfile::tempdir().unwrap();
            let backend = fake_nmcli(dir.path(), false);

            backend
                .associate("wlan0", &hotspot(), "hunter22")
                .await
                .unwrap();

            let calls = logged_calls(dir.path());
            assert!(calls.iter().all(|call| !call.contains("hunter22")), "{:?}", calls);
            assert!(calls.iter().any(|call| call.starts_with(
                "connection add type wifi ifname wlan0 con-name switch_4F2A00 ssid switch_4F2A00"
            ) && call.contains("wifi-sec.psk-flags 2")
                && call.contains("connection.autoconnect no")
                && call.contains("802-11-wireless.bssid AA:BB:CC:DD:EE:FF")));
            assert_eq!(
                calls.last().map(String::as_str),
                Some("connection up id switch_4F2A00 passwd-file /dev/stdin")
            );

            let secrets = std::fs::read_to_string(dir.path().join("stdin.log")).unwrap();
            assert_eq!(secrets, "802-11-wireless-security.psk:hunter22\n");
        }

        #[tokio::test]
        async fn test_disassociate_brings_profile_down() {
            let dir = tempfile::tempdir().unwrap();
            let backend = fake_nmcli(dir.path(), false);

            backend.disassociate("wlan0", &hotspot()).await.unwrap();

            let calls = logged_calls(dir.path());
            assert_eq!(calls[0], "connection down id switch_4F2A00");
            assert!(calls.iter().all(|call| !call.starts_with("device disconnect")));
        }

        #[tokio::test]
        async fn test_disassociate_falls_back_to_device_disconnect() {
            let dir = tempfile::tempdir().unwrap();
            let backend = fake_nmcli(dir.path(), true);

            backend.disassociate("wlan0", &hotspot()).await.unwrap();

            let calls = logged_calls(dir.path());
            assert_eq!(calls[0], "connection down id switch_4F2A00");
            assert_eq!(calls[1], "device disconnect wlan0");
        }
    }
}
