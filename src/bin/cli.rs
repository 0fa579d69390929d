//! Internshala crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use internshala_crawler::{
    error::Result,
    models::{Config, DescriptionFormat},
    pipeline,
};

/// Internshala internship and job crawler
#[derive(Parser, Debug)]
#[command(
    name = "internshala-crawler",
    version,
    about = "Collects internship and job postings from Internshala"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl listings and write them to a JSON file
    Crawl {
        /// Search term
        #[arg(short, long)]
        query: Option<String>,

        /// Search term used only for this site (overrides --query)
        #[arg(long)]
        site_query: Option<String>,

        /// Number of posts wanted
        #[arg(short, long)]
        results: Option<usize>,

        /// Only keep posts published within this many hours
        #[arg(long)]
        hours_old: Option<u32>,

        /// Fetch each listing's detail page for the full description
        #[arg(long)]
        fetch_description: bool,

        /// Description format (markdown, plain, html)
        #[arg(long)]
        format: Option<DescriptionFormat>,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Crawl {
            query,
            site_query,
            results,
            hours_old,
            fetch_description,
            format,
            output,
        } => {
            let search = &mut config.search;
            if query.is_some() {
                search.search_term = query;
            }
            if site_query.is_some() {
                search.site_search_term = site_query;
            }
            if let Some(results) = results {
                search.results_wanted = results;
            }
            if hours_old.is_some() {
                search.hours_old = hours_old;
            }
            if fetch_description {
                search.fetch_description = true;
            }
            if let Some(format) = format {
                search.description_format = format;
            }
            if let Some(path) = output {
                config.output.path = path;
            }

            let outcome = pipeline::run_crawler(&config)?;
            log::info!("Crawl complete: {} posts", outcome.jobs.len());
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            let config = Config::load(&cli.config).inspect_err(|e| {
                log::error!("Cannot load {}: {}", cli.config.display(), e);
            })?;
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
