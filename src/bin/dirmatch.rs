//! dirmatch command-line front end
//!
//! Parses names and resolves them against a JSON directory fixture
//! (an array of `{accountName, givenName, surname, ...}` records).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dirmatch::{
    BatchResolver, CasingPolicy, IdentityResolver, InMemoryDirectory, MatchTier, NameParser,
    Resolution, ResolverConfig, TierFilter,
};

/// Command-line arguments for dirmatch
#[derive(Parser, Debug)]
#[command(name = "dirmatch")]
#[command(about = "Resolve free-text personal names to directory accounts")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "DIRMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Casing applied to parsed names (overrides the config file)
    #[arg(long, global = true)]
    casing: Option<CasingPolicy>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a name into its components
    Parse {
        /// Name as entered, e.g. "Smith, John E."
        name: String,
    },
    /// Resolve one name against the directory
    Resolve {
        /// Name as entered, e.g. "Smith, John E."
        name: String,

        #[command(flatten)]
        lookup: Lookup,
    },
    /// Resolve every line of a file against the directory
    Batch {
        /// File with one name per line
        names: PathBuf,

        #[command(flatten)]
        lookup: Lookup,
    },
}

#[derive(Args, Debug)]
struct Lookup {
    /// JSON directory fixture
    #[arg(short, long, env = "DIRMATCH_DIRECTORY")]
    directory: PathBuf,

    /// Only report results found at this tier
    #[arg(short, long)]
    tier: Option<MatchTier>,
}

impl Lookup {
    fn filter(&self) -> Option<TierFilter> {
        self.tier.map(TierFilter::from)
    }

    fn open(&self, config: &ResolverConfig) -> Result<InMemoryDirectory> {
        let directory = InMemoryDirectory::from_json_file(&self.directory)
            .with_context(|| format!("Failed to load directory {}", self.directory.display()))?;
        let records = directory.len()?;
        info!(records, path = %self.directory.display(), "directory loaded");
        Ok(directory.case_sensitive(config.case_sensitive))
    }
}

fn load_config(args: &Cli) -> Result<ResolverConfig> {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    if let Some(casing) = args.casing {
        config.casing = casing;
    }
    Ok(config)
}

fn print_resolution(resolution: &Resolution, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resolution)?);
        return Ok(());
    }

    println!("name:    {}", resolution.name);
    match &resolution.note {
        Some(note) => println!("result:  {note}"),
        None => println!(
            "result:  {} ({} candidate{}, {:?})",
            resolution.tier,
            resolution.match_count,
            if resolution.match_count == 1 { "" } else { "s" },
            resolution.outcome()
        ),
    }
    for result in &resolution.results {
        println!(
            "  {:<16} {} {:<20} {}",
            result.account_name,
            result.given_name,
            result.surname,
            result.mail.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn read_names(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read names from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dirmatch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = load_config(&args)?;
    info!(casing = %config.casing, "dirmatch v{}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Parse { name } => {
            let parsed = NameParser::new(config.casing).parse(name)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("first:   {} ({})", parsed.first_name(), parsed.first_initial());
                println!("middle:  {} ({})", parsed.middle_name(), parsed.middle_initial());
                println!("last:    {} ({})", parsed.last_name(), parsed.last_initial());
            }
        }
        Command::Resolve { name, lookup } => {
            let directory = lookup.open(&config)?;
            let resolution = IdentityResolver::from_config(&config).resolve(
                name.as_str(),
                &directory,
                lookup.filter(),
            )?;
            print_resolution(&resolution, args.json)?;
        }
        Command::Batch { names, lookup } => {
            let directory = Arc::new(lookup.open(&config)?);
            let mut batch =
                BatchResolver::new(IdentityResolver::from_config(&config), directory, &config)?;
            if let Some(filter) = lookup.filter() {
                batch = batch.with_filter(filter);
            }

            let mut failures = 0usize;
            for item in batch.resolve_all(read_names(names)?) {
                match item.outcome {
                    Ok(resolution) => print_resolution(&resolution, args.json)?,
                    Err(e) => {
                        failures += 1;
                        eprintln!("error: {}: {e}", item.input);
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} name(s) could not be resolved");
            }
        }
    }

    Ok(())
}
