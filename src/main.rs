use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use update_resolver::app::{CheckOptions, run_check};
use update_resolver::catalog::cache::CatalogCache;
use update_resolver::config::{ResolverConfig, config_path, db_path, log_path};
use update_resolver::logging::init_logging;
use update_resolver::update::{ChannelStatus, Platform};

#[derive(Parser)]
#[command(name = "update-resolver")]
#[command(version, about = "Decide which published build an installation should update to")]
struct Cli {
    /// Config file (defaults to config.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the catalog for an update to a build
    Check(CheckArgs),
    /// Remove cached catalog documents
    ClearCache,
}

#[derive(Args)]
struct CheckArgs {
    /// Running build, e.g. IU-145.258
    #[arg(long)]
    build: String,

    /// Read the catalog from a local file
    #[arg(long, conflicts_with = "url")]
    catalog: Option<PathBuf>,

    /// Fetch the catalog from a URL
    #[arg(long)]
    url: Option<String>,

    /// Subscribed channel tier: release, beta or eap
    #[arg(long)]
    channel: Option<ChannelStatus>,

    /// Build number to skip (repeatable)
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Build to look up a patch from (defaults to --build)
    #[arg(long)]
    from: Option<String>,

    /// Host platform for patch exclusions (defaults to this host)
    #[arg(long)]
    platform: Option<String>,

    /// Bypass the catalog cache
    #[arg(long)]
    refresh: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(&log_path())?;

    let config_file = cli.config.unwrap_or_else(config_path);
    let config = ResolverConfig::load(&config_file)?;

    match cli.command {
        Command::Check(args) => {
            let json = args.json;
            let options = CheckOptions {
                build: args.build,
                catalog_file: args.catalog,
                catalog_url: args.url,
                channel: args.channel,
                ignored: args.ignore,
                from: args.from,
                platform: args.platform.as_deref().map(Platform::from),
                refresh: args.refresh,
                cache_db: Some(db_path()),
            };

            let report = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(run_check(options, config))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
        Command::ClearCache => {
            let cache = CatalogCache::new(&db_path(), config.catalog.refresh_interval)?;
            let removed = cache.clear()?;
            info!("Cleared catalog cache");
            println!("Removed {} cached catalog documents", removed);
        }
    }

    Ok(())
}
