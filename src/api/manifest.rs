//! Album index retrieval.

use serde_json::Value;
use url::Url;

use crate::api::fetcher::ResilientFetcher;
use crate::api::transport::Transport;
use crate::api::types::{Manifest, ManifestDocument};
use crate::error::{Error, Result};

/// Longest raw body echoed back in a malformed-index error.
const MAX_RAW_PREVIEW: usize = 2048;

/// Fetch and decode the album index at `url`.
pub async fn resolve_manifest<T: Transport>(
    fetcher: &ResilientFetcher<T>,
    url: &Url,
) -> Result<Manifest> {
    let fetched = fetcher.fetch(url).await?;
    let manifest = parse_manifest(&fetched.bytes)?;
    tracing::debug!(
        "Index from {} lists {} file(s)",
        manifest.console_name,
        manifest.filenames.len()
    );
    Ok(manifest)
}

/// Decode an album index body.
///
/// Either every field is present with the right type or the whole document
/// is rejected; partial results are never returned.
pub fn parse_manifest(body: &[u8]) -> Result<Manifest> {
    let value: Value = serde_json::from_slice(body).map_err(|e| Error::MalformedManifest {
        raw: preview(&String::from_utf8_lossy(body)),
        reason: e.to_string(),
    })?;

    // serde would also accept a two-element array for the struct.
    if !value.is_object() {
        return Err(Error::MalformedManifest {
            raw: preview(&value.to_string()),
            reason: "index is not a JSON object".to_string(),
        });
    }

    let document: ManifestDocument =
        serde_json::from_value(value.clone()).map_err(|e| Error::MalformedManifest {
            raw: preview(&value.to_string()),
            reason: e.to_string(),
        })?;

    Ok(document.into())
}

fn preview(raw: &str) -> String {
    if raw.len() <= MAX_RAW_PREVIEW {
        return raw.to_string();
    }
    let mut end = MAX_RAW_PREVIEW;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &raw[..end])
}
