use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use switch_album_import::error::{Error, Result};
use switch_album_import::wifi::{NetworkHandle, WifiBackend};
use switch_album_import::Config;

pub const SSID: &str = "switch_4F2A00";

/// WiFi backend that records every call instead of touching the host.
#[derive(Clone, Default)]
pub struct FakeBackend {
    calls: Arc<Mutex<Vec<String>>>,
    scans: Arc<Mutex<VecDeque<Option<NetworkHandle>>>>,
    reject_password: bool,
}

impl FakeBackend {
    /// Hotspot visible on both scans.
    pub fn with_hotspot() -> Self {
        let backend = Self::default();
        backend
            .scans
            .lock()
            .unwrap()
            .extend([Some(handle(SSID)), Some(handle(SSID))]);
        backend
    }

    /// Hotspot never shows up.
    pub fn without_hotspot() -> Self {
        Self::default()
    }

    pub fn rejecting_password() -> Self {
        Self {
            reject_password: true,
            ..Self::with_hotspot()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn handle(ssid: &str) -> NetworkHandle {
    NetworkHandle {
        ssid: ssid.to_string(),
        bssid: Some("AA:BB:CC:DD:EE:FF".to_string()),
    }
}

#[async_trait]
impl WifiBackend for FakeBackend {
    async fn wifi_interface(&self, _preferred: Option<&str>) -> Result<Option<String>> {
        self.record("interface");
        Ok(Some("wlan0".to_string()))
    }

    async fn scan(&self, _interface: &str, _ssid: &str) -> Result<Option<NetworkHandle>> {
        self.record("scan");
        Ok(self.scans.lock().unwrap().pop_front().flatten())
    }

    async fn associate(&self, _interface: &str, network: &NetworkHandle, _password: &str) -> Result<()> {
        self.record("associate");
        if self.reject_password {
            return Err(Error::AssociationFailed {
                ssid: network.ssid.clone(),
                reason: "Secrets were required, but not provided".to_string(),
            });
        }
        Ok(())
    }

    async fn disassociate(&self, _interface: &str, _network: &NetworkHandle) -> Result<()> {
        self.record("disassociate");
        Ok(())
    }

    async fn set_power(&self, _interface: &str, on: bool) -> Result<()> {
        self.record(if on { "power on" } else { "power off" });
        Ok(())
    }
}

/// Config pointing at a mock gateway and writing into `output_dir`.
pub fn test_config(gateway: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.hotspot.ssid = SSID.to_string();
    config.hotspot.password = "abcd1234".to_string();
    config.hotspot.output_dir = Some(output_dir.to_path_buf());
    config.options.gateway = gateway.to_string();
    config.options.show_progress = false;
    config.options.connectivity_poll_ms = 20;
    config
}
