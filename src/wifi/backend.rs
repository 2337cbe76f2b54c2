//! Platform seam for WiFi control.

use async_trait::async_trait;

use crate::error::Result;

/// An access point found by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHandle {
    pub ssid: String,
    /// Hardware address, when the platform reports one.
    pub bssid: Option<String>,
}

impl NetworkHandle {
    /// Some platforms answer the first scan with an entry that has no
    /// identity; such a handle cannot be joined.
    pub fn is_usable(&self) -> bool {
        !self.ssid.is_empty()
    }
}

/// Operations the session manager needs from the host's WiFi stack.
#[async_trait]
pub trait WifiBackend: Send + Sync {
    /// Name of the wireless interface to use. `preferred` must exist when
    /// given; otherwise the first wireless interface is returned.
    async fn wifi_interface(&self, preferred: Option<&str>) -> Result<Option<String>>;

    /// Scan for `ssid` on `interface`.
    async fn scan(&self, interface: &str, ssid: &str) -> Result<Option<NetworkHandle>>;

    /// Join `network`, returning once the OS reports success or failure.
    async fn associate(&self, interface: &str, network: &NetworkHandle, password: &str)
        -> Result<()>;

    /// Leave `network` on `interface` without blocking the OS from
    /// auto-joining other networks afterwards.
    async fn disassociate(&self, interface: &str, network: &NetworkHandle) -> Result<()>;

    /// Switch the radio on or off.
    async fn set_power(&self, interface: &str, on: bool) -> Result<()>;
}
