//! HTTP transport for the console's web server.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use url::Url;

/// Largest buffer reserved up front from a response's Content-Length.
const MAX_PREALLOC: usize = 8 * 1024 * 1024;

/// Failure of a single GET attempt.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The link dropped while the request was in flight.
    #[error("network connection lost: {0}")]
    ConnectionLost(String),

    #[error("request timed out after {} seconds", .0.as_secs())]
    TimedOut(Duration),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether this is the drop-and-reconnect condition the fetcher retries.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, TransportError::ConnectionLost(_))
    }
}

/// A single GET against the console.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> std::result::Result<Vec<u8>, TransportError>;
}

/// reqwest-backed transport that waits for connectivity and bounds every
/// request by a resource timeout.
pub struct HttpTransport {
    client: Client,
    resource_timeout: Duration,
    connectivity_poll: Duration,
}

impl HttpTransport {
    /// Create a transport with the given whole-request budget and the delay
    /// between connection attempts while the link is down.
    pub fn new(resource_timeout: Duration, connectivity_poll: Duration) -> crate::Result<Self> {
        // The hotspot is a fresh network on every run: never reuse sockets
        // from a previous association.
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            resource_timeout,
            connectivity_poll,
        })
    }

    /// Retry the connection phase until it succeeds; failures after that
    /// are returned to the caller.
    async fn get_when_connected(&self, url: &Url) -> std::result::Result<Vec<u8>, TransportError> {
        let mut attempts: u32 = 0;
        let response = loop {
            attempts += 1;
            match self.client.get(url.clone()).send().await {
                Ok(response) => break response,
                Err(e) if e.is_connect() => {
                    tracing::debug!(
                        "Waiting for connectivity to {} (attempt {}): {}",
                        url,
                        attempts,
                        e
                    );
                    sleep(self.connectivity_poll).await;
                }
                Err(e) => return Err(classify(&e)),
            }
        };

        read_body(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> std::result::Result<Vec<u8>, TransportError> {
        tracing::debug!("GET {}", url);
        match timeout(self.resource_timeout, self.get_when_connected(url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::TimedOut(self.resource_timeout)),
        }
    }
}

/// Drain a response body, failing on non-success statuses.
async fn read_body(response: Response) -> std::result::Result<Vec<u8>, TransportError> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }

    // Content-Length comes from the console; only trust it up to a point.
    let announced = response.content_length().unwrap_or(0);
    let prealloc = usize::try_from(announced).map_or(MAX_PREALLOC, |len| len.min(MAX_PREALLOC));
    let mut body = Vec::with_capacity(prealloc);
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| classify(&e))?;
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Map a reqwest error onto the transport taxonomy.
///
/// Only a connection that closed or reset under an exchange counts as lost.
/// Protocol errors from a server that answered are not retried.
fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Other(format!("timed out: {}", err));
    }

    if err.is_body() || has_dropped_link_cause(err) {
        return TransportError::ConnectionLost(err.to_string());
    }

    TransportError::Other(err.to_string())
}

/// Walk the source chain looking for a closed connection or an I/O error of
/// a dropped link.
fn has_dropped_link_cause(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return true;
            }
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if is_dropped_link(io_err.kind()) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn is_dropped_link(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::NotConnected
    )
}
