//! WiFi module.
//!
//! This module provides:
//! - The platform backend trait
//! - A NetworkManager (`nmcli`) backend
//! - Session management with guaranteed network restore

pub mod backend;
pub mod nmcli;
pub mod session;

pub use backend::{NetworkHandle, WifiBackend};
pub use nmcli::NmcliBackend;
pub use session::{SessionManager, SessionState, WifiSession};
