//! sift
//!
//! Resolves a JSON search request into list and cluster SQL statements and
//! prints them, with their bound parameters, as JSON.

mod config;
mod request;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sift_sql::{DateValueCorrector, SqlResolver};
use tracing::info;

use crate::config::{Config, init_logging};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let dialect = config.dialect_kind()?;
    let pagination = config.pagination()?;
    info!(
        dialect = %dialect,
        pagination = %pagination.kind(),
        request = %config.request,
        "Resolving search request"
    );

    let request = request::load(&config.request)?;
    let metadata = request
        .entity
        .to_metadata()
        .context("Invalid entity definition")?;
    let param = request
        .search
        .to_search_param(&pagination)
        .context("Invalid search definition")?;

    let resolver = SqlResolver::new(dialect.dialect(), Arc::new(DateValueCorrector));
    let sql = resolver
        .resolve(&metadata, &param)
        .context("Failed to resolve search")?;

    let output = if config.pretty {
        serde_json::to_string_pretty(&sql)?
    } else {
        serde_json::to_string(&sql)?
    };
    println!("{}", output);

    Ok(())
}
