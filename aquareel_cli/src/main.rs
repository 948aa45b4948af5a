use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use aquareel_core::{
    BetContext, ChaoticRng, EngineParams, FairRng, Lcg, NewtonRng, Parsheet, RandomSource,
    SpinEngine,
};

#[derive(Parser)]
#[command(name = "aquareel", about = "Batch driver for the aquareel slot math core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Par-sheet JSON path; defaults to the bundled SL-AQUA sheet
    #[arg(long, global = true)]
    parsheet: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run spin batches and print a payout summary
    Run {
        /// Spins per batch
        #[arg(long, default_value_t = 50)]
        spins: u64,
        /// Number of batches, each replayed on a fresh source state
        #[arg(long, default_value_t = 1)]
        batches: u64,
        /// Bet per payline
        #[arg(long, default_value_t = 1.0)]
        bet_per_line: f64,
        #[arg(long, value_enum, default_value_t = RngChoice::Lcg)]
        rng: RngChoice,
        /// Seed for the arithmetic sources; defaults to the current time
        #[arg(long)]
        seed: Option<u64>,
        /// Server seed for the fair source
        #[arg(long, default_value = "aquareel-dev-seed")]
        server_seed: String,
        /// Client seed for the fair source
        #[arg(long, default_value = "demo-client")]
        client_seed: String,
        /// Write one CSV row per spin to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Load a par-sheet and report whether the engine accepts it
    Validate,
    /// Print the expanded reel strips
    Strips,
}

#[derive(Clone, Copy, ValueEnum)]
enum RngChoice {
    Lcg,
    Chaotic,
    Newton,
    Fair,
}

impl RngChoice {
    fn build(self, seed: u64, server_seed: &str, client_seed: &str, nonce: u64) -> Box<dyn RandomSource> {
        match self {
            RngChoice::Lcg => Box::new(Lcg::new(seed)),
            RngChoice::Chaotic => Box::new(ChaoticRng::new(seed as f64)),
            RngChoice::Newton => Box::new(NewtonRng::new(seed as f64)),
            RngChoice::Fair => Box::new(FairRng::new(server_seed, client_seed, nonce)),
        }
    }
}

#[derive(Serialize)]
struct SpinRow {
    batch: u64,
    spin: u64,
    bet: f64,
    payout: f64,
    winning_lines: usize,
    warnings: usize,
}

fn load_sheet(path: &Option<PathBuf>) -> anyhow::Result<Parsheet> {
    match path {
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .with_context(|| format!("reading par-sheet {}", p.display()))?;
            Ok(Parsheet::from_json(&json)?)
        }
        None => Ok(Parsheet::sl_aqua()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let sheet = load_sheet(&cli.parsheet)?;

    match cli.command {
        Commands::Run {
            spins,
            batches,
            bet_per_line,
            rng,
            seed,
            server_seed,
            client_seed,
            export,
        } => {
            let engine = SpinEngine::new(EngineParams::from_parsheet(&sheet))?;
            let bet = BetContext::new(bet_per_line, sheet.lines_api_data.len())?;
            let seed = seed.unwrap_or_else(|| Utc::now().timestamp_millis() as u64);
            info!(sheet = %sheet.id, spins, batches, seed, "starting run");

            let mut writer = match &export {
                Some(path) => Some(
                    csv::Writer::from_path(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                ),
                None => None,
            };

            let mut grand_bet = 0.0;
            let mut grand_payout = 0.0;
            let mut rows = 0usize;
            for batch_no in 0..batches {
                // each batch gets its own source state so runs are
                // replayable batch by batch
                let mut source = rng.build(
                    seed.wrapping_add(batch_no),
                    &server_seed,
                    &client_seed,
                    batch_no * spins,
                );
                let batch = engine.run_batch(source.as_mut(), &bet, spins);
                for (i, outcome) in batch.outcomes.iter().enumerate() {
                    grand_bet += bet.total_bet();
                    grand_payout += outcome.total_payout;
                    if let Some(w) = writer.as_mut() {
                        w.serialize(SpinRow {
                            batch: batch_no + 1,
                            spin: i as u64 + 1,
                            bet: bet.total_bet(),
                            payout: outcome.total_payout,
                            winning_lines: outcome.winning_lines.len(),
                            warnings: outcome.warnings.len(),
                        })?;
                        rows += 1;
                    }
                }
                if let Some(err) = batch.error {
                    return Err(err).context(format!(
                        "batch {} aborted after {} spins",
                        batch_no + 1,
                        batch.outcomes.len()
                    ));
                }
            }

            if let Some(mut w) = writer {
                w.flush()?;
                let path = export.expect("writer implies path");
                println!("Exported {} rows to {}", rows, path.display());
            }
            println!(
                "spins={} total_bet={:.2} total_payout={:.2} rtp={:.4}",
                spins * batches,
                grand_bet,
                grand_payout,
                grand_payout / grand_bet
            );
        }
        Commands::Validate => {
            let engine = SpinEngine::new(EngineParams::from_parsheet(&sheet))?;
            println!(
                "{}: {} symbols, {} paylines, {}x{} matrix, strips ok",
                sheet.id,
                engine.params().symbols.len(),
                engine.params().paylines.len(),
                engine.params().reels,
                engine.params().rows,
            );
        }
        Commands::Strips => {
            let engine = SpinEngine::new(EngineParams::from_parsheet(&sheet))?;
            for (reel, strip) in engine.strips().iter().enumerate() {
                println!("reel {} ({} stops): {:?}", reel, strip.len(), strip.ids());
            }
        }
    }

    Ok(())
}
