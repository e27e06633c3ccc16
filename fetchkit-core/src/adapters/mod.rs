/// Resource adapters
///
/// This module defines the adapter contract and provides implementations for
/// the environments fetchkit ships with.
///
/// # Architecture
///
/// Adapters are the I/O layer of fetchkit. Each adapter:
/// - Implements the `ResourceAdapter` trait
/// - Turns resource sources into local file paths
/// - Reports progress through the caller's progress function
/// - Reads local files as text
///
/// # Adapter Types
///
/// - **Http**: Download `http(s)` resources, delegate local ones
/// - **Local**: Resolve local files only
/// - **Mock**: Scripted in-memory behaviour for tests and demos
///
/// # Example
///
/// ```no_run
/// use fetchkit::adapters::{LocalFsAdapter, ResourceAdapter};
/// use fetchkit::ResourceRegistry;
/// use std::sync::Arc;
///
/// let registry = ResourceRegistry::new();
/// registry.set_adapter(Arc::new(LocalFsAdapter::new()));
/// assert!(registry.is_initialized());
/// ```

pub mod adapter_trait;
pub mod http;
pub mod local;
pub mod mock;

// Re-export main types
pub use adapter_trait::{
    no_progress, AdapterError, AdapterResult, ProgressFn, ResourceAdapter, INIT_GUIDANCE,
};
pub use http::HttpAdapter;
pub use local::LocalFsAdapter;
pub use mock::MockAdapter;
