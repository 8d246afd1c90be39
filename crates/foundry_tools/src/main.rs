//! Scrap Foundry - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use foundry_core::battle::BattleMode;
use foundry_core::catalog::{Catalog, CatalogData, DEFAULT_CATALOG_SEED};
use foundry_core::config::GameRules;
use foundry_core::player::Player;
use foundry_tools::simulate::{run_simulation, SimulationConfig};
use foundry_tools::{replay, validate, ToolError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "foundry-tools")]
#[command(about = "Development tools for Scrap Foundry")]
#[command(version)]
struct Cli {
    /// Catalog data file (defaults to the bundled catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Seed used to roll the template library
    #[arg(long, global = true, default_value_t = DEFAULT_CATALOG_SEED)]
    catalog_seed: u64,

    /// Rules override file
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a catalog data file
    Validate {
        /// Path to the catalog RON file
        #[arg(default_value = "crates/foundry_core/data/catalog.ron")]
        path: PathBuf,
    },

    /// Auto-play battles from a starter profile and print win statistics
    Simulate {
        /// Battle mode: pvp, bounty or story:<chapter>
        #[arg(short, long, default_value = "pvp")]
        mode: BattleMode,

        /// Number of battles
        #[arg(short = 'n', long, default_value = "100")]
        battles: u32,

        /// Seed of the first battle
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also record the first battle as a replay file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Check that a replay file reproduces its final state
    VerifyReplay {
        /// Replay file path
        file: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        if let ToolError::Invalid { errors, .. } = &e {
            for error in errors {
                eprintln!("  - {error}");
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> foundry_tools::Result<()> {
    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating catalog: {}", path.display());
            let summary = validate::validate_catalog_file(&path, cli.catalog_seed)?;
            if let Some(rules) = &cli.rules {
                validate::load_rules_file(rules)?;
            }
            println!(
                "OK: {} moves, {} templates, {} guilds, {} chapters",
                summary.moves, summary.templates, summary.guilds, summary.chapters
            );
        }
        Commands::Simulate {
            mode,
            battles,
            seed,
            format,
            record,
        } => {
            let catalog = load_catalog(cli.catalog.as_deref(), cli.catalog_seed)?;
            let rules = load_rules(cli.rules.as_deref())?;
            let config = SimulationConfig { mode, battles, seed };

            let summary = run_simulation(&catalog, &rules, &config)?;
            match format {
                OutputFormat::Text => print!("{}", summary.to_text()),
                OutputFormat::Json => println!("{}", summary.to_json()?),
            }

            if let Some(path) = record {
                let player = Player::starter("simulator", "Simulator", &catalog)?;
                replay::record_battle(&catalog, &player, mode, seed)?.save(&path)?;
                tracing::info!("Replay written to {}", path.display());
            }
        }
        Commands::VerifyReplay { file } => {
            let catalog = load_catalog(cli.catalog.as_deref(), cli.catalog_seed)?;
            let check = replay::verify_replay_file(&file, &catalog)?;
            println!(
                "OK: {} seed {}, {} commands, ended on turn {} ({:?})",
                check.mode, check.seed, check.commands, check.final_turn, check.result
            );
        }
    }
    Ok(())
}

fn load_catalog(path: Option<&Path>, seed: u64) -> foundry_tools::Result<Catalog> {
    let data = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| ToolError::io(path, e))?;
            CatalogData::from_ron_str(&path.display().to_string(), &text)?
        }
        None => CatalogData::builtin()?,
    };
    Ok(Catalog::generate(data, seed))
}

fn load_rules(path: Option<&Path>) -> foundry_tools::Result<GameRules> {
    match path {
        Some(path) => validate::load_rules_file(path),
        None => Ok(GameRules::default()),
    }
}
