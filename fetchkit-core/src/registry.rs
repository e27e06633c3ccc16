/// Resource adapter registry
///
/// The registry holds at most one `ResourceAdapter` and routes every fetch
/// and read through it. Library code receives a `&ResourceRegistry` and never
/// names a concrete backend.
///
/// # State
///
/// ```text
///            set_adapter              set_adapter
/// Uninitialized ───────────> Ready ──────────────> Ready (replaced)
///       ^                      │
///       └──── reset_adapter ───┘
/// ```
///
/// Dispatch (`fetch`, `fs().read_as_string`) is only valid in `Ready`. In
/// `Uninitialized` it fails with `AdapterError::NotInitialized` without
/// touching any adapter.
///
/// # Concurrency
///
/// Dispatch clones the adapter `Arc` and releases the lock before awaiting.
/// In-flight calls therefore keep the adapter they were dispatched against
/// even if the slot is replaced or cleared meanwhile. Concurrent calls share
/// the same adapter instance; serialization is the adapter's concern.
///
/// # Example
///
/// ```no_run
/// use fetchkit::adapters::LocalFsAdapter;
/// use fetchkit::ResourceRegistry;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), fetchkit::adapters::AdapterError> {
/// let registry = ResourceRegistry::new();
/// registry.set_adapter(Arc::new(LocalFsAdapter::new()));
///
/// if let Some(paths) = registry.fetch(None, &["/etc/hostname".into()]).await? {
///     let text = registry.fs().read_as_string(&paths[0]).await?;
///     println!("{}", text);
/// }
/// # Ok(())
/// # }
/// ```

use crate::adapters::{no_progress, AdapterError, AdapterResult, ProgressFn, ResourceAdapter};
use crate::source::ResourceSource;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Holder of the single active resource adapter
#[derive(Default)]
pub struct ResourceRegistry {
    slot: RwLock<Option<Arc<dyn ResourceAdapter>>>,
}

impl ResourceRegistry {
    /// Creates an uninitialized registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `adapter` already installed
    pub fn with_adapter(adapter: Arc<dyn ResourceAdapter>) -> Self {
        let registry = Self::new();
        registry.set_adapter(adapter);
        registry
    }

    /// Installs `adapter`, replacing any previous one
    pub fn set_adapter(&self, adapter: Arc<dyn ResourceAdapter>) {
        tracing::info!(adapter = %adapter.name(), "Installing resource adapter");
        let previous = self
            .slot
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .replace(adapter);

        if let Some(previous) = previous {
            tracing::debug!(adapter = %previous.name(), "Replaced resource adapter");
        }
    }

    /// Clears the installed adapter
    ///
    /// No-op when no adapter is installed.
    pub fn reset_adapter(&self) {
        let previous = self.slot.write().unwrap_or_else(|e| e.into_inner()).take();

        if let Some(previous) = previous {
            tracing::info!(adapter = %previous.name(), "Reset resource adapter");
        }
    }

    /// Returns the installed adapter
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::NotInitialized` if no adapter is installed.
    pub fn get_adapter(&self) -> AdapterResult<Arc<dyn ResourceAdapter>> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| {
                tracing::warn!("Resource requested before an adapter was installed");
                AdapterError::not_initialized()
            })
    }

    /// Returns true if an adapter is installed
    pub fn is_initialized(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Fetches resources through the installed adapter
    ///
    /// Arguments and the result are passed through unchanged. A missing
    /// `progress` function is replaced with a no-op.
    ///
    /// # Returns
    ///
    /// `Some(paths)` with one local path per source, in order, or `None` if
    /// the adapter reports the fetch as interrupted.
    ///
    /// # Errors
    ///
    /// `AdapterError::NotInitialized` if no adapter is installed; otherwise
    /// whatever error the adapter returns.
    pub async fn fetch(
        &self,
        progress: Option<&ProgressFn<'_>>,
        sources: &[ResourceSource],
    ) -> AdapterResult<Option<Vec<PathBuf>>> {
        let adapter = self.get_adapter()?;
        let progress = progress.unwrap_or(&no_progress);

        tracing::debug!(adapter = %adapter.name(), sources = sources.len(), "Dispatching fetch");
        adapter.fetch(progress, sources).await
    }

    /// Returns the filesystem operations of this registry
    pub fn fs(&self) -> FsHandle<'_> {
        FsHandle { registry: self }
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("ResourceRegistry")
            .field("adapter", &slot.as_ref().map(|a| a.name().to_string()))
            .finish()
    }
}

/// Filesystem operations routed through a registry
#[derive(Debug, Clone, Copy)]
pub struct FsHandle<'a> {
    registry: &'a ResourceRegistry,
}

impl FsHandle<'_> {
    /// Reads a local file as text through the installed adapter
    ///
    /// # Errors
    ///
    /// `AdapterError::NotInitialized` if no adapter is installed; otherwise
    /// whatever error the adapter returns.
    pub async fn read_as_string(&self, path: impl AsRef<Path>) -> AdapterResult<String> {
        let adapter = self.registry.get_adapter()?;
        let path = path.as_ref();

        tracing::debug!(adapter = %adapter.name(), path = %path.display(), "Dispatching read");
        adapter.read_as_string(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAdapter;
    use std::sync::Mutex;

    #[test]
    fn test_starts_uninitialized() {
        let registry = ResourceRegistry::new();
        assert!(!registry.is_initialized());

        let err = registry.get_adapter().err().unwrap();
        assert!(err.is_not_initialized());
    }

    #[test]
    fn test_set_and_reset() {
        let registry = ResourceRegistry::new();
        registry.set_adapter(Arc::new(MockAdapter::new()));
        assert!(registry.is_initialized());
        assert_eq!(registry.get_adapter().unwrap().name(), "mock");

        registry.reset_adapter();
        assert!(!registry.is_initialized());

        // Resetting twice is a no-op
        registry.reset_adapter();
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_last_install_wins() {
        let registry = ResourceRegistry::with_adapter(Arc::new(MockAdapter::new().named("a")));
        registry.set_adapter(Arc::new(MockAdapter::new().named("b")));
        assert_eq!(registry.get_adapter().unwrap().name(), "b");
    }

    #[test]
    fn test_debug_shows_adapter_name() {
        let registry = ResourceRegistry::new();
        assert!(format!("{:?}", registry).contains("None"));

        registry.set_adapter(Arc::new(MockAdapter::new().named("weights")));
        assert!(format!("{:?}", registry).contains("weights"));
    }

    #[tokio::test]
    async fn test_dispatch_without_adapter_fails() {
        let registry = ResourceRegistry::new();

        let fetched = registry.fetch(None, &["a".into()]).await;
        assert!(matches!(fetched, Err(AdapterError::NotInitialized(_))));

        let read = registry.fs().read_as_string("/tmp/a").await;
        assert!(matches!(read, Err(AdapterError::NotInitialized(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_progress_tolerates_callbacks() {
        let registry = ResourceRegistry::with_adapter(Arc::new(
            MockAdapter::new().with_progress([0.0, 50.0, 100.0]),
        ));

        let paths = registry.fetch(None, &["a".into()]).await.unwrap();
        assert_eq!(paths.map(|p| p.len()), Some(1));
    }

    #[tokio::test]
    async fn test_fetch_forwards_progress() {
        let registry =
            ResourceRegistry::with_adapter(Arc::new(MockAdapter::new().with_progress([50.0, 100.0])));

        let seen = Mutex::new(Vec::new());
        let progress = |p: f64| seen.lock().unwrap().push(p);
        registry.fetch(Some(&progress), &["a".into()]).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![50.0, 100.0]);
    }

    #[tokio::test]
    async fn test_in_flight_fetch_keeps_its_adapter() {
        let registry = ResourceRegistry::with_adapter(Arc::new(MockAdapter::new().named("first")));

        let adapter = registry.get_adapter().unwrap();
        registry.set_adapter(Arc::new(MockAdapter::new().named("second")));
        registry.reset_adapter();

        // A call already resolved against "first" still completes on it
        assert_eq!(adapter.name(), "first");
        assert!(adapter.fetch(&no_progress, &["a".into()]).await.unwrap().is_some());
    }
}
