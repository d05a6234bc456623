//! Pizzeria CLI - run and administer the Pizza API

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pizzeria_storage::{open_storage, StorageBackend};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, offer, pizza, restaurant, seed};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "pizzeria")]
#[command(author, version, about = "Restaurant and pizza catalogue with a JSON API")]
pub struct Cli {
    /// Storage connection string (sqlite:///app.db, sqlite://:memory:, memory://)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Config file path
    #[arg(long, env = "PIZZERIA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(config::default_config_path)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from(self.format.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "PIZZERIA_ADDR")]
        addr: Option<String>,
    },
    /// Insert the sample restaurants, pizzas and offerings
    Seed(seed::SeedArgs),
    /// Manage restaurants
    Restaurant(restaurant::RestaurantArgs),
    /// Manage pizzas
    Pizza(pizza::PizzaArgs),
    /// Offer a pizza at a restaurant
    Offer(offer::OfferArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend
pub struct AppContext {
    pub storage: Arc<dyn StorageBackend>,
    pub config: Config,
}

impl AppContext {
    pub async fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load(&cli.config_path())?;
        let url = config.database_url(cli.database_url.as_deref())?;
        tracing::debug!("Using storage at: {}", url);

        let storage = open_storage(&url).await?;

        Ok(Self { storage, config })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting pizzeria CLI");

    // Commands that never touch storage
    match &cli.command {
        Commands::Config(args) => return commands::config::run(args, &cli),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let ctx = AppContext::new(&cli).await?;

    let result = match &cli.command {
        Commands::Serve { addr } => {
            let addr = ctx.config.bind_addr(addr.as_deref());
            pizzeria_http::run_server(ctx.storage.clone(), &addr).await
        }
        Commands::Seed(args) => seed::run(args, &cli, &ctx).await,
        Commands::Restaurant(args) => restaurant::run(args, &cli, &ctx).await,
        Commands::Pizza(args) => pizza::run(args, &cli, &ctx).await,
        Commands::Offer(args) => offer::run(args, &cli, &ctx).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    };

    ctx.storage.close().await?;
    result
}
