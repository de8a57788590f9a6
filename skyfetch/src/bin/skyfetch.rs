//! Command line entry point for the catalog and Horizons pipelines.
//!
//! Subcommands:
//! - `catalog`: fetch and clean the TESS exoplanet catalog
//! - `ephemeris`: fetch and parse Horizons physical data
//! - `all`: run both pipelines (the default)
//! - `extract`: run the physical-data parser on a saved Horizons text

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::error;
use skyfetch::catalog::{self, CatalogOutcome, EMPTY_RESPONSE_MESSAGE};
use skyfetch::config::{default_output_dir, Config};
use skyfetch::ephemeris;
use skyfetch::extract::extract_physical_data;
use skyfetch::http::HttpClient;

#[derive(Parser, Debug)]
#[command(name = "skyfetch")]
#[command(about = "Fetch the TESS exoplanet catalog and Horizons physical data as JSON")]
#[command(version)]
struct Args {
    /// Directory the output files are written to (default: data/ beside the crate)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// JSON file overriding endpoints, tables and targets
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides the config file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and clean the TESS exoplanet catalog
    Catalog,

    /// Fetch Horizons physical data for every configured body
    Ephemeris,

    /// Run both pipelines
    All,

    /// Parse a saved Horizons object-data text and print the result
    Extract {
        /// Text file holding a Horizons `result` payload
        file: PathBuf,
    },
}

/// Settings and client shared by the network subcommands.
struct RunContext {
    client: HttpClient,
    config: Config,
    output_dir: PathBuf,
}

impl RunContext {
    fn load(
        config_path: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };
        if let Some(timeout_secs) = timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        let client = HttpClient::new(config.timeout())?;

        Ok(Self {
            client,
            config,
            output_dir: output_dir.unwrap_or_else(default_output_dir),
        })
    }
}

/// The line printed once a catalog run finishes.
fn catalog_summary(outcome: &CatalogOutcome) -> String {
    match outcome {
        CatalogOutcome::Written { path, records } => format!(
            "The cleaned data ({records} records) has been saved to '{}'.",
            path.display()
        ),
        CatalogOutcome::EmptyResponse => EMPTY_RESPONSE_MESSAGE.to_string(),
    }
}

fn run_catalog(ctx: &RunContext) -> Result<()> {
    let outcome = catalog::run_catalog(&ctx.client, &ctx.config.catalog, &ctx.output_dir)?;
    println!("{}", catalog_summary(&outcome));
    Ok(())
}

fn run_ephemeris(ctx: &RunContext) -> Result<()> {
    let outcome =
        ephemeris::run_ephemeris(&ctx.client, &ctx.config.ephemeris, &ctx.output_dir)?;
    if !outcome.skipped.is_empty() {
        println!("Skipped without data: {}", outcome.skipped.join(", "));
    }
    println!(
        "The data ({} bodies) is stored in '{}'.",
        outcome.records,
        outcome.path.display()
    );
    Ok(())
}

fn extract_file(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let data = extract_physical_data(&text);
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args {
        output_dir,
        config,
        timeout_secs,
        command,
    } = Args::parse();

    match command.unwrap_or(Command::All) {
        Command::Extract { file } => extract_file(&file),
        Command::Catalog => run_catalog(&RunContext::load(config, output_dir, timeout_secs)?),
        Command::Ephemeris => run_ephemeris(&RunContext::load(config, output_dir, timeout_secs)?),
        Command::All => {
            let ctx = RunContext::load(config, output_dir, timeout_secs)?;
            let mut failed = Vec::new();
            if let Err(e) = run_catalog(&ctx) {
                error!("Catalog pipeline failed: {e:#}");
                failed.push("catalog");
            }
            if let Err(e) = run_ephemeris(&ctx) {
                error!("Ephemeris pipeline failed: {e:#}");
                failed.push("ephemeris");
            }
            if !failed.is_empty() {
                bail!("{} pipeline failed", failed.join(" and "));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        assert!(Args::try_parse_from(["skyfetch", "--timeout-secs", "0", "catalog"]).is_err());

        let args = Args::try_parse_from(["skyfetch", "catalog", "--timeout-secs", "5"]).unwrap();
        assert_eq!(args.timeout_secs, Some(5));
    }

    #[test]
    fn test_empty_response_summary() {
        assert_eq!(
            catalog_summary(&CatalogOutcome::EmptyResponse),
            EMPTY_RESPONSE_MESSAGE
        );
    }

    #[test]
    fn test_written_summary_names_file() {
        let summary = catalog_summary(&CatalogOutcome::Written {
            path: PathBuf::from("data/out.json"),
            records: 3,
        });
        assert_eq!(
            summary,
            "The cleaned data (3 records) has been saved to 'data/out.json'."
        );
    }
}
