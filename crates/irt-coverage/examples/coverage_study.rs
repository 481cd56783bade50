//! Coverage study from the command line
//!
//! ```text
//! RUST_LOG=irt_coverage=info cargo run --example coverage_study -p irt-coverage [config.json]
//! ```
//!
//! Without an argument a seven-item, five-category test is simulated for
//! 2000 persons drawn from N(0.57, 1.5).

use anyhow::Context;
use irt_core::fixtures::seven_item_pcm;
use irt_coverage::{SimulationStudy, StudyConfig};
use irt_simulate::TraitDistribution;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading study config {path}"))?;
            StudyConfig::from_json(&json)?
        }
        None => StudyConfig::for_items(&seven_item_pcm())
            .traits(TraitDistribution::normal(0.57, 1.5))
            .seed(2024),
    };

    let study = SimulationStudy::new(config)?;
    let report = study.run()?;

    println!("=== Coverage Study ===\n");
    println!(
        "  {} persons, {} items, seed {}",
        report.n_persons,
        study.items().len(),
        report.seed
    );
    println!(
        "  estimated: {} ({} interior, {} extreme, {} clamped), failed: {}",
        report.estimation.succeeded,
        report.estimation.interior,
        report.estimation.extreme,
        report.estimation.clamped,
        report.estimation.failed()
    );

    println!("\n  Coverage:");
    for level in &report.coverage.levels {
        println!(
            "    {:>6}  z = {:.3}  coverage = {:.3}",
            level.level.to_string(),
            level.z,
            level.coverage
        );
    }

    let acc = &report.coverage.accuracy;
    println!("\n  Accuracy:");
    println!("    bias = {:+.4}", acc.bias);
    println!("    MAE  = {:.4}", acc.mae);
    println!("    RMSE = {:.4}", acc.rmse);
    if let Some(r) = acc.correlation {
        println!("    r    = {r:.4}");
    }
    println!("    undefined SE: {}", acc.undefined_se);

    Ok(())
}
