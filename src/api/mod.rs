//! Console HTTP module.
//!
//! This module provides:
//! - HTTP transport with connectivity waiting and a resource timeout
//! - Fetcher with a single retry on a lost connection
//! - Album index resolution
//! - Payload types

pub mod fetcher;
pub mod manifest;
pub mod transport;
pub mod types;

pub use fetcher::ResilientFetcher;
pub use manifest::{parse_manifest, resolve_manifest};
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{FetchResult, Manifest};
