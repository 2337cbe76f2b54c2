//! WiFi session lifecycle against the console's hotspot.
//!
//! A [`WifiSession`] exists only while the host is joined to the hotspot.
//! Releasing it disassociates and, depending on [`RestoreMode`], toggles
//! the radio so the OS rejoins the user's regular network. Restore
//! failures are logged, never returned.

use std::fmt;

use crate::config::RestoreMode;
use crate::error::{Error, Result};
use crate::wifi::backend::{NetworkHandle, WifiBackend};

/// Scans issued before a missing hotspot is reported.
const SCAN_PASSES: u32 = 2;

/// Where the host stands relative to the hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Disconnected,
    Associating,
    Associated,
    Restoring,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Associating => write!(f, "associating"),
            SessionState::Associated => write!(f, "associated"),
            SessionState::Restoring => write!(f, "restoring"),
        }
    }
}

/// Owns the wireless interface for the duration of a run.
pub struct SessionManager<B> {
    backend: B,
    interface: String,
    restore_mode: RestoreMode,
    state: SessionState,
}

impl<B: WifiBackend> SessionManager<B> {
    /// Bind to the host's wireless interface.
    pub async fn open(
        backend: B,
        preferred_interface: Option<&str>,
        restore_mode: RestoreMode,
    ) -> Result<Self> {
        let interface = backend
            .wifi_interface(preferred_interface)
            .await?
            .ok_or(Error::WifiUnavailable)?;
        tracing::debug!("Using WiFi interface {}", interface);

        Ok(Self {
            backend,
            interface,
            restore_mode,
            state: SessionState::Disconnected,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up `ssid`, scanning twice and trusting only the second pass.
    ///
    /// The first scan after process start can return a handle without an
    /// identity.
    pub async fn scan(&self, ssid: &str) -> Result<NetworkHandle> {
        let mut found = None;
        for pass in 1..=SCAN_PASSES {
            found = self.backend.scan(&self.interface, ssid).await?;
            tracing::debug!("Scan pass {} for {}: {:?}", pass, ssid, found);
        }

        found
            .filter(NetworkHandle::is_usable)
            .ok_or_else(|| Error::HotspotNotFound(ssid.to_string()))
    }

    /// Join `network`. On failure nothing was joined and nothing needs
    /// restoring.
    pub async fn associate(
        &mut self,
        network: NetworkHandle,
        password: &str,
    ) -> Result<WifiSession<'_, B>> {
        self.transition(SessionState::Associating);
        if let Err(e) = self
            .backend
            .associate(&self.interface, &network, password)
            .await
        {
            self.transition(SessionState::Disconnected);
            return Err(e);
        }
        self.transition(SessionState::Associated);

        Ok(WifiSession {
            manager: self,
            network,
            released: false,
        })
    }

    fn transition(&mut self, next: SessionState) {
        let allowed = matches!(
            (self.state, next),
            (SessionState::Disconnected, SessionState::Associating)
                | (SessionState::Associating, SessionState::Associated)
                | (SessionState::Associating, SessionState::Disconnected)
                | (SessionState::Associated, SessionState::Restoring)
                | (SessionState::Restoring, SessionState::Disconnected)
        );
        debug_assert!(allowed, "invalid session transition {} -> {}", self.state, next);
        tracing::debug!("WiFi session {} -> {}", self.state, next);
        self.state = next;
    }

    /// Disassociate, then optionally power-cycle the radio.
    async fn restore(&mut self, network: &NetworkHandle) {
        self.transition(SessionState::Restoring);

        if let Err(e) = self.backend.disassociate(&self.interface, network).await {
            tracing::warn!("Failed to disconnect {}: {}", self.interface, e);
        }

        if self.restore_mode.power_cycles() {
            self.power_cycle().await;
        }

        self.transition(SessionState::Disconnected);
    }

    /// Toggling the radio is what makes the OS run auto-join again; there
    /// is no call to rejoin "the previous network" directly.
    async fn power_cycle(&self) {
        if let Err(e) = self.backend.set_power(&self.interface, false).await {
            tracing::warn!("Failed to power off {}: {}", self.interface, e);
        }
        if let Err(e) = self.backend.set_power(&self.interface, true).await {
            tracing::warn!("Failed to power on {}: {}", self.interface, e);
        }
    }
}

/// Proof of association. Must be released with [`WifiSession::release`].
pub struct WifiSession<'a, B: WifiBackend> {
    manager: &'a mut SessionManager<B>,
    network: NetworkHandle,
    released: bool,
}

impl<B: WifiBackend> WifiSession<'_, B> {
    pub fn ssid(&self) -> &str {
        &self.network.ssid
    }

    pub fn interface(&self) -> &str {
        &self.manager.interface
    }

    /// Leave the hotspot and restore host networking.
    pub async fn release(mut self) {
        tracing::debug!("Leaving {}", self.network.ssid);
        self.manager.restore(&self.network).await;
        self.released = true;
    }
}

impl<B: WifiBackend> Drop for WifiSession<'_, B> {
    fn drop(&mut self) {
        if !self.released {
            tracing::error!(
                "WiFi session for {} dropped without release; {} may still be joined to it",
                self.network.ssid,
                self.manager.interface
            );
        }
    }
}
