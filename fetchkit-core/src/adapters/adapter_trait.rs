/// Core ResourceAdapter trait and types
///
/// This module defines the contract that every resource backend must
/// implement. Library code only ever talks to this trait, so it never depends
/// on a particular networking or filesystem stack.
///
/// # Adapter Contract
///
/// All adapters must:
/// 1. Implement the `ResourceAdapter` trait (async)
/// 2. Return one local path per requested source, in request order
/// 3. Return `Ok(None)` when a fetch is interrupted (not an error)
/// 4. Surface unrecoverable I/O problems as `AdapterError`
///
/// Progress reporting is optional. Adapters may call the progress function
/// zero or more times; completion is signalled only by the return value.
///
/// # Example
///
/// ```no_run
/// use async_trait::async_trait;
/// use fetchkit::adapters::{AdapterResult, ProgressFn, ResourceAdapter};
/// use fetchkit::ResourceSource;
/// use std::path::{Path, PathBuf};
///
/// struct StaticAdapter;
///
/// #[async_trait]
/// impl ResourceAdapter for StaticAdapter {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     async fn fetch(
///         &self,
///         progress: &ProgressFn<'_>,
///         sources: &[ResourceSource],
///     ) -> AdapterResult<Option<Vec<PathBuf>>> {
///         progress(100.0);
///         Ok(Some(sources.iter().map(|s| PathBuf::from(s.as_str())).collect()))
///     }
///
///     async fn read_as_string(&self, path: &Path) -> AdapterResult<String> {
///         Ok(tokio::fs::read_to_string(path).await?)
///     }
/// }
/// ```

use crate::source::ResourceSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Guidance attached to every "not initialized" failure
pub const INIT_GUIDANCE: &str = "no resource adapter installed; call \
    `ResourceRegistry::set_adapter` with an implementation of `ResourceAdapter` \
    (for example `HttpAdapter::from_config` or `LocalFsAdapter::new`) before \
    fetching or reading resources";

/// Adapter error types
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// No adapter installed in the registry
    #[error("Resource adapter not initialized: {0}")]
    NotInitialized(&'static str),

    /// Requested resource or file does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Source could not be interpreted by the adapter
    #[error("Invalid resource source: {0}")]
    InvalidSource(String),

    /// File contents are not valid UTF-8
    #[error("File is not valid UTF-8 text: {0}")]
    InvalidUtf8(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network or HTTP status failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Internal adapter error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Creates the configuration error raised when no adapter is installed
    pub fn not_initialized() -> Self {
        AdapterError::NotInitialized(INIT_GUIDANCE)
    }

    /// Returns true for the configuration error
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, AdapterError::NotInitialized(_))
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        AdapterError::Http(err.to_string())
    }
}

/// Adapter result type alias
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Progress reporting function
///
/// Receives a completion value, conventionally in 0-100.
pub type ProgressFn<'a> = dyn Fn(f64) + Send + Sync + 'a;

/// Progress function that discards every value
pub fn no_progress(_progress: f64) {}

/// Core resource adapter trait
///
/// All resource backends must implement this trait.
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// Returns the adapter name
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Fetches resources to local storage
    ///
    /// # Arguments
    ///
    /// * `progress` - Progress function, may be called zero or more times
    /// * `sources` - Resources to fetch
    ///
    /// # Returns
    ///
    /// `Some(paths)` with one local path per source, in the same order.
    /// `None` if the fetch was interrupted (e.g. cancelled).
    /// `Err` on unrecoverable I/O failure.
    async fn fetch(
        &self,
        progress: &ProgressFn<'_>,
        sources: &[ResourceSource],
    ) -> AdapterResult<Option<Vec<PathBuf>>>;

    /// Reads a local file as text
    ///
    /// # Arguments
    ///
    /// * `path` - Absolute path of a local file, e.g. one returned by `fetch`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not UTF-8.
    async fn read_as_string(&self, path: &Path) -> AdapterResult<String>;
}

/// Reads a file into a `String`, mapping failures to adapter errors
pub(crate) async fn read_utf8(path: &Path) -> AdapterResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AdapterError::NotFound(path.display().to_string()),
        _ => AdapterError::Io(e),
    })?;

    String::from_utf8(bytes).map_err(|_| AdapterError::InvalidUtf8(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_carries_guidance() {
        let err = AdapterError::not_initialized();
        assert!(err.is_not_initialized());

        let message = err.to_string();
        assert!(message.contains("not initialized"));
        assert!(message.contains("set_adapter"));
    }

    #[test]
    fn test_other_errors_are_not_configuration_errors() {
        assert!(!AdapterError::NotFound("/x".to_string()).is_not_initialized());
        assert!(!AdapterError::Http("503".to_string()).is_not_initialized());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AdapterError = io.into();
        assert!(matches!(err, AdapterError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_no_progress_accepts_any_value() {
        let progress: &ProgressFn<'_> = &no_progress;
        progress(-1.0);
        progress(50.0);
        progress(1000.0);
    }

    #[tokio::test]
    async fn test_read_utf8_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_utf8(&dir.path().join("missing.txt")).await;
        assert!(matches!(result, Err(AdapterError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_utf8_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let result = read_utf8(&path).await;
        assert!(matches!(result, Err(AdapterError::InvalidUtf8(_))));
    }
}
