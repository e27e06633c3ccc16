/// Local filesystem adapter
///
/// Resolves `file://` URLs and plain paths to absolute paths of files that
/// already exist locally. Nothing is copied; "fetching" a local resource only
/// verifies it and canonicalizes its path.
///
/// Progress is reported once per source as `100 * (i + 1) / n`.
///
/// # Cancellation
///
/// When constructed with a cancellation token, the token is checked before
/// each source. A cancelled fetch returns `Ok(None)`.

use crate::adapters::adapter_trait::read_utf8;
use crate::adapters::{AdapterError, AdapterResult, ProgressFn, ResourceAdapter};
use crate::source::ResourceSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Filesystem-backed adapter
#[derive(Debug, Clone, Default)]
pub struct LocalFsAdapter {
    /// Base directory for relative paths (defaults to the working directory)
    base_dir: Option<PathBuf>,

    /// Optional cancellation token
    cancel_token: Option<CancellationToken>,
}

impl LocalFsAdapter {
    /// Creates a new local adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `base_dir`
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Interrupts fetches once `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false)
    }

    /// Resolves one source to an absolute path of an existing file
    pub(crate) async fn resolve(&self, source: &ResourceSource) -> AdapterResult<PathBuf> {
        let path = source.to_local_path()?;

        let path = match (&self.base_dir, path.is_relative()) {
            (Some(base), true) => base.join(path),
            _ => path,
        };

        let resolved = tokio::fs::canonicalize(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AdapterError::NotFound(path.display().to_string()),
            _ => AdapterError::Io(e),
        })?;

        let metadata = tokio::fs::metadata(&resolved).await?;
        if !metadata.is_file() {
            return Err(AdapterError::InvalidSource(format!(
                "{} is not a regular file",
                resolved.display()
            )));
        }

        Ok(resolved)
    }
}

#[async_trait]
impl ResourceAdapter for LocalFsAdapter {
    fn name(&self) -> &str {
        "local"
    }

    async fn fetch(
        &self,
        progress: &ProgressFn<'_>,
        sources: &[ResourceSource],
    ) -> AdapterResult<Option<Vec<PathBuf>>> {
        let total = sources.len();
        let mut paths = Vec::with_capacity(total);

        for (i, source) in sources.iter().enumerate() {
            if self.is_cancelled() {
                tracing::info!(completed = i, total, "Local fetch cancelled");
                return Ok(None);
            }

            let path = self.resolve(source).await?;
            tracing::debug!(source = %source, path = %path.display(), "Resolved local resource");
            paths.push(path);

            progress(100.0 * (i + 1) as f64 / total as f64);
        }

        Ok(Some(paths))
    }

    async fn read_as_string(&self, path: &Path) -> AdapterResult<String> {
        read_utf8(path).await
    }
}
