/// Resource identifiers
///
/// A `ResourceSource` names one resource to fetch. The registry passes sources
/// through untouched; only adapters look inside them.

use crate::adapters::{AdapterError, AdapterResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of a single resource (URL, `file://` URL or local path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSource(String);

/// Broad classification of a source, used by adapters for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://` URL
    Http,

    /// `file://` URL or plain filesystem path
    File,
}

impl ResourceSource {
    /// Creates a new source
    pub fn new(source: impl Into<String>) -> Self {
        ResourceSource(source.into())
    }

    /// Returns the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies the source by scheme
    pub fn kind(&self) -> SourceKind {
        let lower = self.0.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceKind::Http
        } else {
            SourceKind::File
        }
    }

    /// Returns the filesystem path for `File` sources
    ///
    /// `file://` URLs are parsed and percent-decoded; plain paths are used
    /// as-is.
    ///
    /// # Errors
    ///
    /// `AdapterError::InvalidSource` for HTTP sources, malformed `file://`
    /// URLs, and `file://` URLs naming a remote host.
    pub fn to_local_path(&self) -> AdapterResult<PathBuf> {
        if self.kind() == SourceKind::Http {
            return Err(AdapterError::InvalidSource(format!(
                "{} is not a local resource",
                self
            )));
        }

        if !self.0.get(..5).map_or(false, |s| s.eq_ignore_ascii_case("file:")) {
            return Ok(PathBuf::from(&self.0));
        }

        let url = Url::parse(&self.0)
            .map_err(|e| AdapterError::InvalidSource(format!("{}: {}", self, e)))?;
        url.to_file_path()
            .map_err(|_| AdapterError::InvalidSource(format!("{} is not a local file URL", self)))
    }
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceSource {
    fn from(source: &str) -> Self {
        ResourceSource::new(source)
    }
}

impl From<String> for ResourceSource {
    fn from(source: String) -> Self {
        ResourceSource(source)
    }
}
