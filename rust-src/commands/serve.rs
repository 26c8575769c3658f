//! Serve command - run the REST API.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::api;
use crate::config::{ServerConfig, DEFAULT_LOG_FILTER};


/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Already installed is fine
    let _ = fmt().with_env_filter(filter).try_init();
}


/// Run the serve command.
pub fn run(config: ServerConfig) -> Result<()> {
    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(api::serve(config))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_filter_parses() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("info"));
        assert!(rendered.contains("tower_http=debug"));
    }
}
