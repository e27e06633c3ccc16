/// Mock adapter for testing and demos
///
/// This adapter never touches the network or the filesystem. It returns
/// scripted paths, reports scripted progress values, and serves file contents
/// from memory. Every call is recorded so tests can assert on exactly what the
/// registry forwarded.
///
/// # Behaviour
///
/// `fetch`:
/// 1. Records the sources
/// 2. Reports each scripted progress value, in order
/// 3. Fails if `should_fail` is set
/// 4. Returns `None` if `interrupt` is set
/// 5. Returns the scripted paths (or `<path_prefix>/<index>` per source)
///
/// `read_as_string` returns the in-memory contents for a path, or
/// `AdapterError::NotFound`.
///
/// # Configuration
///
/// Arguments (JSON):
/// ```json
/// {
///   "progress": [50, 100],          // Progress values to report (default: [])
///   "paths": ["/tmp/a", "/tmp/b"],  // Paths to return (default: derived)
///   "should_fail": false,           // Fail every fetch (default: false)
///   "interrupt": false,             // Return None from fetch (default: false)
///   "files": {"/tmp/a": "hello"}    // Contents served by read_as_string
/// }
/// ```
///
/// # Example
///
/// ```no_run
/// use fetchkit::adapters::{MockAdapter, ResourceAdapter};
/// use fetchkit::ResourceRegistry;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let adapter = Arc::new(
///     MockAdapter::new()
///         .with_paths(["/tmp/a", "/tmp/b"])
///         .with_progress([50.0, 100.0]),
/// );
///
/// let registry = ResourceRegistry::new();
/// registry.set_adapter(adapter.clone());
///
/// let paths = registry.fetch(None, &["s1".into(), "s2".into()]).await?;
/// assert_eq!(adapter.fetch_calls().len(), 1);
/// # Ok(())
/// # }
/// ```

use crate::adapters::{AdapterError, AdapterResult, ProgressFn, ResourceAdapter};
use crate::source::ResourceSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Mock adapter configuration
#[derive(Debug, Clone, Deserialize)]
struct MockConfig {
    /// Progress values reported on every fetch
    #[serde(default)]
    progress: Vec<f64>,

    /// Paths returned from fetch
    #[serde(default)]
    paths: Option<Vec<PathBuf>>,

    /// Prefix for derived paths when `paths` is unset
    #[serde(default = "default_path_prefix")]
    path_prefix: PathBuf,

    /// Whether to simulate a failure
    #[serde(default)]
    should_fail: bool,

    /// Whether to simulate an interrupted fetch
    #[serde(default)]
    interrupt: bool,

    /// In-memory file contents
    #[serde(default)]
    files: HashMap<PathBuf, String>,
}

fn default_path_prefix() -> PathBuf {
    PathBuf::from("/tmp/fetchkit-mock")
}

impl Default for MockConfig {
    fn default() -> Self {
        MockConfig {
            progress: Vec::new(),
            paths: None,
            path_prefix: default_path_prefix(),
            should_fail: false,
            interrupt: false,
            files: HashMap::new(),
        }
    }
}

/// Mock adapter implementation
pub struct MockAdapter {
    name: String,
    config: MockConfig,
    fetch_calls: Mutex<Vec<Vec<ResourceSource>>>,
    read_calls: Mutex<Vec<PathBuf>>,
}

impl MockAdapter {
    /// Creates a new mock adapter with default behaviour
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Creates a mock adapter from a JSON configuration
    pub fn from_json(args: serde_json::Value) -> AdapterResult<Self> {
        let config: MockConfig = serde_json::from_value(args)
            .map_err(|e| AdapterError::Internal(format!("Invalid mock config: {}", e)))?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: MockConfig) -> Self {
        MockAdapter {
            name: "mock".to_string(),
            config,
            fetch_calls: Mutex::new(Vec::new()),
            read_calls: Mutex::new(Vec::new()),
        }
    }

    /// Sets the adapter name reported by `name()`
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the paths returned from fetch
    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the progress values reported on every fetch
    pub fn with_progress(mut self, progress: impl IntoIterator<Item = f64>) -> Self {
        self.config.progress = progress.into_iter().collect();
        self
    }

    /// Adds an in-memory file served by `read_as_string`
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.config.files.insert(path.into(), contents.into());
        self
    }

    /// Makes every fetch fail
    pub fn failing(mut self) -> Self {
        self.config.should_fail = true;
        self
    }

    /// Makes every fetch return `None`
    pub fn interrupting(mut self) -> Self {
        self.config.interrupt = true;
        self
    }

    /// Returns the sources of every fetch call, in call order
    pub fn fetch_calls(&self) -> Vec<Vec<ResourceSource>> {
        self.fetch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the path of every read call, in call order
    pub fn read_calls(&self) -> Vec<PathBuf> {
        self.read_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(
        &self,
        progress: &ProgressFn<'_>,
        sources: &[ResourceSource],
    ) -> AdapterResult<Option<Vec<PathBuf>>> {
        self.fetch_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sources.to_vec());

        for value in &self.config.progress {
            progress(*value);
        }

        if self.config.should_fail {
            tracing::warn!(adapter = %self.name, "Mock adapter simulating failure");
            return Err(AdapterError::Internal("Simulated fetch failure".to_string()));
        }

        if self.config.interrupt {
            tracing::info!(adapter = %self.name, "Mock adapter simulating interruption");
            return Ok(None);
        }

        let paths = match &self.config.paths {
            Some(paths) => paths.clone(),
            None => (0..sources.len())
                .map(|i| self.config.path_prefix.join(i.to_string()))
                .collect(),
        };

        Ok(Some(paths))
    }

    async fn read_as_string(&self, path: &Path) -> AdapterResult<String> {
        self.read_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_path_buf());

        self.config
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| AdapterError::NotFound(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::no_progress;

    #[test]
    fn test_mock_config_defaults() {
        let config = MockConfig::default();
        assert!(config.progress.is_empty());
        assert!(config.paths.is_none());
        assert!(!config.should_fail);
        assert!(!config.interrupt);
        assert_eq!(config.path_prefix, PathBuf::from("/tmp/fetchkit-mock"));
    }

    #[test]
    fn test_mock_config_deserialization() {
        let adapter = MockAdapter::from_json(serde_json::json!({
            "progress": [10, 90],
            "paths": ["/tmp/x"],
            "should_fail": true,
            "files": {"/tmp/x": "contents"}
        }))
        .unwrap();

        assert_eq!(adapter.config.progress, vec![10.0, 90.0]);
        assert_eq!(adapter.config.paths, Some(vec![PathBuf::from("/tmp/x")]));
        assert!(adapter.config.should_fail);
        assert_eq!(adapter.config.files.len(), 1);
    }

    #[test]
    fn test_invalid_json_config() {
        let result = MockAdapter::from_json(serde_json::json!({"progress": "fast"}));
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("Invalid mock config"));
    }

    #[test]
    fn test_adapter_name() {
        assert_eq!(MockAdapter::new().name(), "mock");
        assert_eq!(MockAdapter::new().named("primary").name(), "primary");
    }

    #[tokio::test]
    async fn test_fetch_derives_paths_per_source() {
        let adapter = MockAdapter::new();
        let sources = vec![ResourceSource::from("a"), ResourceSource::from("b")];

        let paths = adapter.fetch(&no_progress, &sources).await.unwrap().unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/tmp/fetchkit-mock/0"),
                PathBuf::from("/tmp/fetchkit-mock/1"),
            ]
        );
        assert_eq!(adapter.fetch_calls(), vec![sources]);
    }

    #[tokio::test]
    async fn test_fetch_reports_progress_in_order() {
        let adapter = MockAdapter::new().with_progress([25.0, 50.0, 100.0]);
        let seen = Mutex::new(Vec::new());
        let progress = |p: f64| seen.lock().unwrap().push(p);

        adapter.fetch(&progress, &["a".into()]).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![25.0, 50.0, 100.0]);
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let adapter = MockAdapter::new().with_progress([50.0]).failing();
        let result = adapter.fetch(&no_progress, &["a".into()]).await;
        assert!(matches!(result, Err(AdapterError::Internal(_))));
        assert_eq!(adapter.fetch_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_interruption_is_not_an_error() {
        let adapter = MockAdapter::new().interrupting();
        let result = adapter.fetch(&no_progress, &["a".into()]).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_read_as_string() {
        let adapter = MockAdapter::new().with_file("/tmp/a", "hello world");

        let contents = adapter.read_as_string(Path::new("/tmp/a")).await.unwrap();
        assert_eq!(contents, "hello world");

        let missing = adapter.read_as_string(Path::new("/tmp/missing")).await;
        assert!(matches!(missing, Err(AdapterError::NotFound(_))));

        assert_eq!(
            adapter.read_calls(),
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/missing")]
        );
    }
}
