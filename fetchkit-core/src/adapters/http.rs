/// HTTP download adapter
///
/// Downloads `http://` and `https://` sources into a local download directory
/// and returns the paths of the downloaded files. Local sources (`file://`
/// URLs and plain paths) are handed to an inner `LocalFsAdapter`, so one
/// installed adapter serves both.
///
/// # File Naming
///
/// Each URL maps to `<download_dir>/<sha256(url)[..16]>[.<ext>]`, where `ext`
/// is the extension of the URL's last path segment. Bytes are streamed to a
/// uniquely named `.part` file in the same directory, which is renamed over
/// the destination once the body is complete and deleted on any failure.
/// Concurrent downloads of one URL each get their own partial file. Existing
/// files are overwritten; there is no reuse between fetches.
///
/// # Progress
///
/// Each source owns an equal share of 0-100. Within a share, progress follows
/// received bytes when the server sends `Content-Length`; otherwise the share
/// is reported once the source completes.
///
/// # Cancellation
///
/// The optional cancellation token is raced against the request and every
/// body read, so a stalled server does not delay cancellation. A cancelled
/// fetch removes its partial file and returns `Ok(None)`.
///
/// # Example
///
/// ```no_run
/// use fetchkit::adapters::HttpAdapter;
/// use fetchkit::config::FetchConfig;
/// use fetchkit::ResourceRegistry;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = FetchConfig::from_env()?;
/// let registry = ResourceRegistry::new();
/// registry.set_adapter(Arc::new(HttpAdapter::from_config(&config)?));
///
/// let progress = |p: f64| tracing::info!(progress = p, "downloading");
/// let paths = registry
///     .fetch(Some(&progress), &["https://example.com/tokenizer.json".into()])
///     .await?;
/// # Ok(())
/// # }
/// ```

use crate::adapters::adapter_trait::read_utf8;
use crate::adapters::{AdapterError, AdapterResult, LocalFsAdapter, ProgressFn, ResourceAdapter};
use crate::config::FetchConfig;
use crate::source::{ResourceSource, SourceKind};
use async_trait::async_trait;
use reqwest::{Client, Url};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// Number of hex characters of the URL digest used in file names
const FILE_NAME_HASH_LEN: usize = 16;

/// HTTP-backed adapter
pub struct HttpAdapter {
    /// HTTP client
    client: Client,

    /// Directory that receives downloads
    download_dir: PathBuf,

    /// Handles local sources
    local: LocalFsAdapter,

    /// Optional cancellation token
    cancel_token: Option<CancellationToken>,
}

/// Outcome of a single download
enum Download {
    Complete(PathBuf),
    Cancelled,
}

impl HttpAdapter {
    /// Creates an HTTP adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &FetchConfig) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self::with_client(client, config.download_dir.clone()))
    }

    /// Creates an HTTP adapter around an existing client
    pub fn with_client(client: Client, download_dir: impl Into<PathBuf>) -> Self {
        HttpAdapter {
            client,
            download_dir: download_dir.into(),
            local: LocalFsAdapter::new(),
            cancel_token: None,
        }
    }

    /// Interrupts fetches once `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.local = self.local.with_cancel_token(token.clone());
        self.cancel_token = Some(token);
        self
    }

    /// Returns the download directory
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .map(|t| t.is_cancelled())
            .unwrap_or(false)
    }

    /// Returns the local path a URL downloads to
    pub fn download_path(&self, url: &Url) -> PathBuf {
        let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
        let mut name = digest[..FILE_NAME_HASH_LEN].to_string();

        let extension = url
            .path_segments()
            .and_then(|segments| segments.last())
            .and_then(|segment| Path::new(segment).extension())
            .and_then(|ext| ext.to_str());

        if let Some(ext) = extension {
            name.push('.');
            name.push_str(ext);
        }

        self.download_dir.join(name)
    }

    /// Runs `fut` unless the cancellation token fires first
    async fn or_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        match &self.cancel_token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => None,
                output = fut => Some(output),
            },
            None => Some(fut.await),
        }
    }

    async fn download(
        &self,
        url: &Url,
        progress: &ProgressFn<'_>,
        index: usize,
        total: usize,
    ) -> AdapterResult<Download> {
        let dest = self.download_path(url);

        let mut response = match self.or_cancelled(self.client.get(url.clone()).send()).await {
            Some(response) => response?,
            None => return Ok(Download::Cancelled),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Http(format!("GET {} returned {}", url, status)));
        }

        let content_length = response.content_length().filter(|len| *len > 0);
        let share = 100.0 / total as f64;
        let base = share * index as f64;

        // Each download owns a uniquely named partial file, removed on drop
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let (file, partial) = tempfile::Builder::new()
            .prefix(".fetchkit-")
            .suffix(".part")
            .tempfile_in(&self.download_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);
        let mut received: u64 = 0;

        loop {
            let chunk = match self.or_cancelled(response.chunk()).await {
                Some(chunk) => chunk?,
                None => return Ok(Download::Cancelled),
            };
            let Some(chunk) = chunk else { break };

            file.write_all(&chunk).await?;
            received += chunk.len() as u64;

            if let Some(len) = content_length {
                let fraction = (received as f64 / len as f64).min(1.0);
                progress(base + share * fraction);
            }
        }

        file.flush().await?;
        drop(file);
        partial.persist(&dest).map_err(|e| AdapterError::Io(e.error))?;

        if content_length.is_none() {
            progress(base + share);
        }

        tracing::debug!(url = %url, path = %dest.display(), bytes = received, "Downloaded resource");
        Ok(Download::Complete(dest))
    }
}

#[async_trait]
impl ResourceAdapter for HttpAdapter {
    fn name(&self) -> &str {
        "http"
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
                tracing::info!(completed = i, total, "HTTP fetch cancelled");
                return Ok(None);
            }

            match source.kind() {
                SourceKind::File => {
                    paths.push(self.local.resolve(source).await?);
                    progress(100.0 * (i + 1) as f64 / total as f64);
                }
                SourceKind::Http => {
                    let url = Url::parse(source.as_str())
                        .map_err(|e| AdapterError::InvalidSource(format!("{}: {}", source, e)))?;

                    match self.download(&url, progress, i, total).await? {
                        Download::Complete(path) => paths.push(path),
                        Download::Cancelled => {
                            tracing::info!(url = %url, "HTTP download cancelled");
                            return Ok(None);
                        }
                    }
                }
            }
        }

        Ok(Some(paths))
    }

    async fn read_as_string(&self, path: &Path) -> AdapterResult<String> {
        read_utf8(path).await
    }
}
