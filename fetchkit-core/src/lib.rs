//! # fetchkit
//!
//! Resource access decoupled from any networking or filesystem stack.
//! Library code fetches resources and reads them as text through a
//! `ResourceRegistry`; the hosting application decides which
//! `ResourceAdapter` actually does the work.
//!
//! ## Modules
//!
//! - `adapters`: The adapter contract and the http, local and mock adapters
//! - `registry`: The registry that holds and dispatches to one adapter
//! - `source`: Resource identifiers
//! - `config`: Environment-driven configuration
//!
//! ## Example
//!
//! ```no_run
//! use fetchkit::adapters::MockAdapter;
//! use fetchkit::ResourceRegistry;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), fetchkit::adapters::AdapterError> {
//! let registry = ResourceRegistry::new();
//! registry.set_adapter(Arc::new(MockAdapter::new().with_paths(["/tmp/a"])));
//!
//! let paths = registry.fetch(None, &["https://example.com/a".into()]).await?;
//! assert_eq!(paths.map(|p| p.len()), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod registry;
pub mod source;

pub use registry::{FsHandle, ResourceRegistry};
pub use source::{ResourceSource, SourceKind};

/// Current version of the fetchkit library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
