//! Command line and environment configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIFT_DIALECT` | mysql | SQL dialect |
//! | `SIFT_LOG_LEVEL` | info | Log level |
//! | `SIFT_PAGINATION` | page | `page` or `offset` |
//! | `SIFT_PAGINATION_START` | 0 | First page number or offset |
//! | `SIFT_DEFAULT_SIZE` | 15 | Page size when the request has none |
//! | `SIFT_MAX_ALLOWED_SIZE` | 100 | Largest page size honoured |
//! | `SIFT_PRETTY` | false | Pretty-print the output |

use clap::Parser;
use sift_sql::{DialectKind, Pagination, PaginationKind, SearchResult};

/// Configuration of the `sift` tool.
#[derive(Debug, Clone, Parser)]
#[command(name = "sift")]
#[command(about = "Resolve a JSON search request into list and cluster SQL")]
pub struct Config {
    /// Path to the JSON request, or `-` for stdin.
    pub request: String,

    /// SQL dialect (mysql, postgresql, oracle, sqlserver, sqlite).
    #[arg(long, env = "SIFT_DIALECT", default_value = "mysql")]
    pub dialect: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SIFT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Pagination type: `page` (page number and size) or `offset` (offset and max).
    #[arg(long, env = "SIFT_PAGINATION", default_value = "page")]
    pub pagination: String,

    /// Number of the first page, or the first offset.
    #[arg(long, env = "SIFT_PAGINATION_START", default_value = "0")]
    pub start: u64,

    /// Page size used when the request gives none.
    #[arg(long, env = "SIFT_DEFAULT_SIZE", default_value = "15")]
    pub default_size: u64,

    /// Largest page size a request may ask for.
    #[arg(long, env = "SIFT_MAX_ALLOWED_SIZE", default_value = "100")]
    pub max_allowed_size: u64,

    /// Pretty-print the JSON output.
    #[arg(long, env = "SIFT_PRETTY", default_value = "false")]
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request: "-".to_string(),
            dialect: "mysql".to_string(),
            log_level: "info".to_string(),
            pagination: "page".to_string(),
            start: 0,
            default_size: 15,
            max_allowed_size: 100,
            pretty: false,
        }
    }
}

impl Config {
    /// The configured dialect.
    pub fn dialect_kind(&self) -> SearchResult<DialectKind> {
        self.dialect.parse()
    }

    /// The configured request pagination strategy.
    pub fn pagination(&self) -> SearchResult<Pagination> {
        let kind: PaginationKind = self.pagination.parse()?;
        Ok(Pagination::new(
            kind,
            self.start,
            self.max_allowed_size,
            self.default_size,
        ))
    }

    /// Validates the configuration, listing every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_size == 0 {
            errors.push("Default size cannot be 0".to_string());
        }

        if self.default_size > self.max_allowed_size {
            errors.push("Default size cannot exceed max allowed size".to_string());
        }

        if let Err(e) = self.dialect_kind() {
            errors.push(e.to_string());
        }

        if let Err(e) = self.pagination() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Initializes logging on stderr, leaving stdout for the JSON output.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sift={},sift_sql={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
