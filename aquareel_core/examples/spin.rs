use aquareel_core::{BetContext, EngineParams, FairRng, Parsheet, SpinEngine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example end-to-end spin against the bundled SL-AQUA sheet
    let sheet = Parsheet::sl_aqua();
    let engine = SpinEngine::new(EngineParams::from_parsheet(&sheet))?;
    let bet = BetContext::new(1.0, sheet.lines_api_data.len())?;

    let mut rng = FairRng::new("example-server-seed", "example-client-seed", 1);
    println!("server_seed_hash={}", rng.server_seed_hash_hex());

    let outcome = engine.spin(&mut rng, &bet)?;
    for row in &outcome.matrix {
        println!("{row:?}");
    }
    println!(
        "bet={} payout={} winning_lines={}",
        bet.total_bet(),
        outcome.total_payout,
        outcome.winning_lines.len()
    );
    Ok(())
}
