//! Runtime settings.
//!
//! Values come from command line flags, which fall back to the
//! environment variables named here and then to the defaults; see
//! `main.rs` for the flag definitions.

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const BIND_ADDR_ENV: &str = "DOWNTIME_BIND_ADDR";
pub const THREADS_ENV: &str = "DOWNTIME_THREADS";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the HTTP server listens.
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn new(bind_addr: &str) -> Result<Self> {
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("invalid bind address {bind_addr:?}"))?;
        Ok(Self { bind_addr })
    }
}

/// Sizes the global rayon pool used for batch estimation.  `None` or
/// zero leaves the choice to rayon.
pub fn apply_thread_limit(threads: Option<usize>) -> Result<()> {
    if let Some(threads) = threads.filter(|n| *n > 0) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure batch thread pool")?;
    }
    Ok(())
}

/// Installs the global `tracing` subscriber.  `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}
