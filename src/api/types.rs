//! Console HTTP payload types.

use serde::Deserialize;
use url::Url;

/// Album index as served at `/data.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestDocument {
    pub console_name: String,
    pub file_names: Vec<String>,
}

/// Validated album index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub console_name: String,
    pub filenames: Vec<String>,
}

impl From<ManifestDocument> for Manifest {
    fn from(doc: ManifestDocument) -> Self {
        Self {
            console_name: doc.console_name,
            filenames: doc.file_names,
        }
    }
}

/// Raw payload of one successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: Url,
    pub bytes: Vec<u8>,
}
