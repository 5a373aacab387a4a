//! Umbra daemon — entry point for running the overlay decoder/ledger.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use umbra_chain::StandardInspector;
use umbra_decoder::MessageDecoder;
use umbra_ledger::Ledger;
use umbra_node::{
    init_logging, verify_balances, LogFormat, NodeConfig, ReplayEngine, ShutdownController,
};
use umbra_store::account::AccountStore;
use umbra_store::pack::PackStore;
use umbra_store_lmdb::LmdbEnvironment;
use umbra_types::params::EXODUS_ADDRESS;
use umbra_types::Address;

#[derive(Parser)]
#[command(name = "umbra-daemon", about = "Umbra overlay-protocol decoder and ledger")]
struct Cli {
    /// Data directory for ledger storage.
    #[arg(long, env = "UMBRA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "UMBRA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "UMBRA_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the node: open the ledger and wait for the chain watcher.
    Run {
        /// Rebuild the ledger from persisted packs before serving.
        #[arg(long)]
        replay_on_start: bool,
    },
    /// Discard the ledger and re-derive it from persisted packs.
    Replay,
    /// Compare ledger balances against a reference snapshot.
    Verify {
        /// Snapshot file; falls back to the configured snapshot_path.
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

struct Subsystems {
    ledger: Ledger,
    packs: Arc<dyn PackStore>,
    decoder: Arc<MessageDecoder>,
}

fn open_subsystems(config: &NodeConfig) -> anyhow::Result<Subsystems> {
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size)
        .with_context(|| format!("opening ledger environment at {}", config.data_dir.display()))?;
    let accounts: Arc<dyn AccountStore> = Arc::new(env.account_store());
    let packs: Arc<dyn PackStore> = Arc::new(env.pack_store());
    let decoder = Arc::new(MessageDecoder::new(
        Arc::new(StandardInspector),
        Address::new(EXODUS_ADDRESS),
    ));
    Ok(Subsystems {
        ledger: Ledger::new(accounts),
        packs,
        decoder,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(&path.display().to_string())
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    match cli.command {
        Command::Run { replay_on_start } => {
            let subsystems = open_subsystems(&config)?;

            if replay_on_start {
                let engine = ReplayEngine::new(
                    subsystems.decoder.clone(),
                    subsystems.ledger.clone(),
                    subsystems.packs.clone(),
                );
                let summary = engine.replay()?;
                tracing::info!(
                    packs = summary.packs,
                    applied = summary.applied,
                    "ledger rebuilt from persisted packs"
                );
            }

            tracing::info!(
                accounts = subsystems.ledger.accounts().record_count()?,
                packs = subsystems.packs.pack_count()?,
                "Umbra node ready; awaiting blocks from the chain watcher"
            );

            let shutdown = ShutdownController::new();
            shutdown.wait_for_signal().await;
            tracing::info!("Umbra daemon exited cleanly");
        }
        Command::Replay => {
            let subsystems = open_subsystems(&config)?;
            let engine = ReplayEngine::new(
                subsystems.decoder,
                subsystems.ledger,
                subsystems.packs,
            );
            let summary = engine.replay()?;
            println!(
                "replayed {} packs: {} applied, {} invalid, {} skipped",
                summary.packs, summary.applied, summary.invalid, summary.skipped
            );
        }
        Command::Verify { snapshot } => {
            let path = snapshot
                .or_else(|| config.snapshot_path.clone())
                .context("no snapshot path given (use --snapshot or set snapshot_path)")?;
            let subsystems = open_subsystems(&config)?;

            // A snapshot that cannot be loaded is a hard stop: exit non-zero
            // through the error path rather than report a partial comparison.
            let report = verify_balances(&subsystems.ledger, &path)?;
            for mismatch in &report.mismatches {
                println!(
                    "failed cmp for {}: {} expected {}, ledger has {}",
                    mismatch.address, mismatch.currency, mismatch.expected, mismatch.actual
                );
            }
            println!(
                "failed {} (compared {})",
                report.mismatches.len(),
                report.compared
            );
            if !report.passed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
