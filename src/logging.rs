//! Tracing subscriber setup for the CLI.
//!
//! ```bash
//! STUBGEN_LOG=debug stubgen generate -i 'metadata/*.json'
//! STUBGEN_LOG=info STUBGEN_LOG_FORMAT=json stubgen generate -i core.json
//! ```
//!
//! Nothing is installed unless `STUBGEN_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("STUBGEN_LOG_FORMAT").unwrap_or_default())
    }
}

/// `STUBGEN_LOG` wins over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("STUBGEN_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init() {
    let has_own = std::env::var("STUBGEN_LOG").is_ok();
    let has_rust = std::env::var("RUST_LOG").is_ok();
    if !has_own && !has_rust {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
