//! travian: command-line client for a Travian game server.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use travian_cli::{parse_plan, Config};
use travian_client::{
    authenticate, fetch_hero_attributes, fetch_hero_inventory, fetch_overview, fetch_tile,
    list_producible_units, produce_units, transfer_from_hero, upgrade, HttpTransport, Resource,
    Session, UpgradeRequest,
};

#[derive(Parser)]
#[command(
    name = "travian",
    about = "Read village state and submit actions on a Travian game server",
    version
)]
struct Cli {
    /// Path to a JSON config file with username, password and server.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Base URL to talk to instead of https://<server>.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print both dashboards as one game state snapshot.
    Overview,

    /// Hero pages.
    Hero {
        #[command(subcommand)]
        page: HeroCommand,
    },

    /// Describe the map tile at (x, y).
    #[command(allow_negative_numbers = true)]
    Tile { x: i32, y: i32 },

    /// Upgrade a slot, or build on an empty interior slot.
    #[command(allow_negative_numbers = true)]
    Upgrade {
        /// Slot id, 1-18 for resource fields and 19-40 for buildings.
        slot: i64,

        /// Building type to construct on an empty slot.
        #[arg(long)]
        building: Option<u32>,

        /// Run every check but do not submit.
        #[arg(long)]
        dry_run: bool,
    },

    /// Move resources from the hero's inventory into the village.
    Transfer { resource: Resource, amount: i64 },

    /// List units the village can train.
    Units,

    /// Train units, e.g. `travian train t1=10 t3=2`.
    Train {
        #[arg(required = true)]
        plan: Vec<String>,

        /// Fill the forms but do not submit.
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion scripts.
    ///
    /// Example:
    ///   travian completions bash > ~/.local/share/bash-completion/completions/travian
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum HeroCommand {
    /// Attribute points, experience, health, speed and production.
    Attributes,
    /// Resources held by the hero.
    Inventory,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "travian", &mut std::io::stdout());
        return Ok(());
    }

    let session = login(&cli).await?;

    match cli.command {
        Commands::Overview => print(&fetch_overview(&session).await?),
        Commands::Hero {
            page: HeroCommand::Attributes,
        } => print(&fetch_hero_attributes(&session).await?),
        Commands::Hero {
            page: HeroCommand::Inventory,
        } => print(&fetch_hero_inventory(&session).await?),
        Commands::Tile { x, y } => print(&fetch_tile(&session, x, y).await?),
        Commands::Upgrade {
            slot,
            building,
            dry_run,
        } => {
            let mut request = UpgradeRequest::new(slot).dry_run(dry_run);
            if let Some(building) = building {
                request = request.building(building);
            }
            print(&upgrade(&session, request).await?)
        }
        Commands::Transfer { resource, amount } => {
            print(&transfer_from_hero(&session, resource, amount).await?)
        }
        Commands::Units => print(&list_producible_units(&session).await?),
        Commands::Train { plan, dry_run } => {
            let plan = parse_plan(&plan)?;
            print(&produce_units(&session, &plan, dry_run).await?)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

async fn login(cli: &Cli) -> anyhow::Result<Session> {
    let config = Config::resolve(cli.config.as_deref())?;
    let transport = match &cli.base_url {
        Some(url) => HttpTransport::with_base_url(url)?,
        None => HttpTransport::new(&config.server)?,
    };
    let session = authenticate(transport, &config.credentials())
        .await
        .with_context(|| format!("login to {} as {}", config.server, config.username))?;
    Ok(session)
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
