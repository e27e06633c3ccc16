/// Configuration management for fetchkit adapters
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `FETCHKIT_ADAPTER`: Adapter to install, `http` or `local` (default: http)
/// - `FETCHKIT_DOWNLOAD_DIR`: Download directory (default: `<tmp>/fetchkit`)
/// - `FETCHKIT_HTTP_TIMEOUT_SECS`: Per-request timeout (default: 300)
/// - `FETCHKIT_USER_AGENT`: User agent for HTTP requests (default: fetchkit/<version>)
///
/// # Example
///
/// ```no_run
/// use fetchkit::config::FetchConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = FetchConfig::from_env()?;
/// println!("Downloads land in {}", config.download_dir.display());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Which adapter implementation to install
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// HTTP downloads plus local files
    Http,

    /// Local files only
    Local,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::Http => write!(f, "http"),
            AdapterKind::Local => write!(f, "local"),
        }
    }
}

impl FromStr for AdapterKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(AdapterKind::Http),
            "local" => Ok(AdapterKind::Local),
            other => anyhow::bail!("unknown adapter '{}', expected 'http' or 'local'", other),
        }
    }
}

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Adapter to install
    pub adapter: AdapterKind,

    /// Directory that receives downloaded resources
    pub download_dir: PathBuf,

    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,

    /// User agent sent with HTTP requests
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            adapter: AdapterKind::Http,
            download_dir: default_download_dir(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    env::temp_dir().join("fetchkit")
}

fn default_user_agent() -> String {
    format!("fetchkit/{}", env!("CARGO_PKG_VERSION"))
}

impl FetchConfig {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let adapter = match lookup("FETCHKIT_ADAPTER") {
            Some(value) => value.parse()?,
            None => AdapterKind::Http,
        };

        let download_dir = lookup("FETCHKIT_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        let http_timeout_secs = lookup("FETCHKIT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
            .parse::<u64>()?;

        if http_timeout_secs == 0 {
            anyhow::bail!("FETCHKIT_HTTP_TIMEOUT_SECS must be greater than 0");
        }

        let user_agent = lookup("FETCHKIT_USER_AGENT").unwrap_or_else(default_user_agent);

        Ok(Self {
            adapter,
            download_dir,
            http_timeout_secs,
            user_agent,
        })
    }

    /// Returns the HTTP timeout as a `Duration`
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
