//! Fetcher that absorbs the hotspot's single link drop.
//!
//! The console's access point renews its DHCP lease shortly after a client
//! joins, dropping the link once and bringing it straight back. A request
//! caught in that window fails with a lost connection and is repeated once.
//! Any other failure, or a second lost connection, is returned.

use url::Url;

use crate::api::transport::{Transport, TransportError};
use crate::api::types::FetchResult;
use crate::error::{Error, Result};

/// Attempts made for one logical fetch.
const MAX_ATTEMPTS: u32 = 2;

/// Blocking-style GET with one retry on a lost connection.
pub struct ResilientFetcher<T> {
    transport: T,
}

impl<T: Transport> ResilientFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch `url`, retrying once if the link dropped mid-request.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResult> {
        let mut attempt = 1;
        loop {
            match self.transport.get(url).await {
                Ok(bytes) => {
                    tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
                    return Ok(FetchResult {
                        url: url.clone(),
                        bytes,
                    });
                }
                Err(e) if e.is_connection_lost() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!("Connection lost while fetching {}, retrying: {}", url, e);
                    attempt += 1;
                }
                Err(e) => return Err(fetch_failed(url, e)),
            }
        }
    }
}

fn fetch_failed(url: &Url, source: TransportError) -> Error {
    Error::FetchFailed {
        url: url.to_string(),
        source,
    }
}
