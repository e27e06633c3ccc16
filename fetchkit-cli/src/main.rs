//! # fetchkit CLI
//!
//! Command-line front end for fetchkit. It installs the configured adapter in
//! a `ResourceRegistry` and routes every command through it.
//!
//! ## Usage
//!
//! ```bash
//! fetchkit fetch https://example.com/tokenizer.json ./config.json
//! fetchkit --adapter local cat /tmp/fetchkit/3f1c9a0b5d2e4f60.json
//! ```
//!
//! Ctrl-C during a fetch cancels it; the command then reports the fetch as
//! interrupted and exits successfully.

use clap::{Parser, Subcommand};
use fetchkit::adapters::{HttpAdapter, LocalFsAdapter, ResourceAdapter};
use fetchkit::config::{AdapterKind, FetchConfig};
use fetchkit::{ResourceRegistry, ResourceSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fetchkit", version, about = "Fetch resources and read them as text")]
struct Cli {
    /// Adapter to install (overrides FETCHKIT_ADAPTER)
    #[arg(long, global = true)]
    adapter: Option<AdapterKind>,

    /// Download directory (overrides FETCHKIT_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch resources and print one local path per line
    Fetch {
        /// URLs, file:// URLs or local paths
        #[arg(required = true)]
        sources: Vec<String>,
    },

    /// Print a local file's contents
    Cat {
        /// Path of the file to read
        path: PathBuf,
    },
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration
    fn apply_overrides(&self, config: &mut FetchConfig) {
        if let Some(adapter) = self.adapter {
            config.adapter = adapter;
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
    }
}

/// Builds the adapter selected by `config`
fn build_adapter(
    config: &FetchConfig,
    cancel_token: CancellationToken,
) -> anyhow::Result<Arc<dyn ResourceAdapter>> {
    let adapter: Arc<dyn ResourceAdapter> = match config.adapter {
        AdapterKind::Http => {
            Arc::new(HttpAdapter::from_config(config)?.with_cancel_token(cancel_token))
        }
        AdapterKind::Local => Arc::new(LocalFsAdapter::new().with_cancel_token(cancel_token)),
    };
    Ok(adapter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fetchkit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = FetchConfig::from_env()?;
    cli.apply_overrides(&mut config);

    tracing::debug!(
        adapter = %config.adapter,
        download_dir = %config.download_dir.display(),
        "Loaded configuration"
    );

    let cancel_token = CancellationToken::new();
    let registry = ResourceRegistry::new();
    registry.set_adapter(build_adapter(&config, cancel_token.clone())?);

    match cli.command {
        Command::Fetch { sources } => {
            let sources: Vec<ResourceSource> =
                sources.into_iter().map(ResourceSource::from).collect();

            let signal_token = cancel_token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupt received, cancelling fetch...");
                    signal_token.cancel();
                }
            });

            let progress = |p: f64| tracing::info!(progress = p, "Fetching");

            match registry.fetch(Some(&progress), &sources).await? {
                Some(paths) => {
                    for path in paths {
                        println!("{}", path.display());
                    }
                }
                None => tracing::warn!("Fetch interrupted before completion"),
            }
        }
        Command::Cat { path } => {
            let contents = registry.fs().read_as_string(&path).await?;
            print!("{}", contents);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch_with_adapter() {
        let cli = Cli::try_parse_from(["fetchkit", "--adapter", "local", "fetch", "a", "b"]).unwrap();
        assert_eq!(cli.adapter, Some(AdapterKind::Local));
        match cli.command {
            Command::Fetch { sources } => assert_eq!(sources, vec!["a", "b"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fetchkit",
            "cat",
            "/tmp/a.txt",
            "--adapter",
            "http",
            "--download-dir",
            "/tmp/downloads",
        ])
        .unwrap();
        assert_eq!(cli.adapter, Some(AdapterKind::Http));
        assert_eq!(cli.download_dir, Some(PathBuf::from("/tmp/downloads")));
        assert!(matches!(cli.command, Command::Cat { ref path } if path == &PathBuf::from("/tmp/a.txt")));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["fetchkit", "--adapter", "ftp", "fetch", "a"]).is_err());
        assert!(Cli::try_parse_from(["fetchkit", "fetch"]).is_err());
        assert!(Cli::try_parse_from(["fetchkit"]).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = FetchConfig::default();
        let default_dir = config.download_dir.clone();

        let cli = Cli::try_parse_from(["fetchkit", "fetch", "a"]).unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.adapter, FetchConfig::default().adapter);
        assert_eq!(config.download_dir, default_dir);

        let cli = Cli::try_parse_from([
            "fetchkit",
            "--adapter",
            "local",
            "--download-dir",
            "/tmp/elsewhere",
            "fetch",
            "a",
        ])
        .unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.adapter, AdapterKind::Local);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn test_build_adapter_follows_config() {
        let mut config = FetchConfig::default();

        config.adapter = AdapterKind::Local;
        let adapter = build_adapter(&config, CancellationToken::new()).unwrap();
        assert_eq!(adapter.name(), "local");

        config.adapter = AdapterKind::Http;
        let adapter = build_adapter(&config, CancellationToken::new()).unwrap();
        assert_eq!(adapter.name(), "http");
    }

    #[tokio::test]
    async fn test_cancelled_token_interrupts_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "a").unwrap();

        let config = FetchConfig {
            adapter: AdapterKind::Local,
            ..FetchConfig::default()
        };
        let token = CancellationToken::new();
        let registry = ResourceRegistry::with_adapter(build_adapter(&config, token.clone()).unwrap());

        let sources = [ResourceSource::new(file.display().to_string())];
        assert!(registry.fetch(None, &sources).await.unwrap().is_some());

        token.cancel();
        assert!(registry.fetch(None, &sources).await.unwrap().is_none());
    }
}
