use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bedtrack_core::config::{days_from_env_value, hospital_roster_from_env_value, seed_from_env_value};
use bedtrack_core::constants::DEFAULT_DATA_DIR;
use bedtrack_core::simulation::DEFAULT_DAYS;
use bedtrack_core::{CoreConfig, Simulation, SimulationConfig};

/// Main entry point for the bedtrack simulation
///
/// Runs the day-by-day admission simulation against an empty registry and writes a snapshot of
/// every hospital every ten days.
///
/// # Environment Variables
/// - `BEDTRACK_DATA_DIR`: Directory the `hospital_state_NN.csv` snapshots are written to (default: ".")
/// - `BEDTRACK_HOSPITALS`: Hospital roster as `name:beds,...` (default: "kingston:10,hamilton:13,toronto:20")
/// - `BEDTRACK_SEED`: Seed for a reproducible run (default: seeded from OS entropy)
/// - `BEDTRACK_DAYS`: Number of simulated days (default: 90)
///
/// # Returns
/// * `Ok(())` - If the simulation ran to completion
/// * `Err(anyhow::Error)` - If the configuration is invalid or the simulation fails
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("bedtrack=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::var("BEDTRACK_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let hospitals = hospital_roster_from_env_value(std::env::var("BEDTRACK_HOSPITALS").ok())?;
    let core = CoreConfig::new(data_dir.into(), hospitals)?;

    let config = SimulationConfig {
        days: days_from_env_value(std::env::var("BEDTRACK_DAYS").ok(), DEFAULT_DAYS)?,
        seed: seed_from_env_value(std::env::var("BEDTRACK_SEED").ok())?,
        ..SimulationConfig::default()
    };

    tracing::info!(
        "++ Simulating {} days into {}",
        config.days,
        core.data_dir().display()
    );

    let summary = Simulation::new(core, config)?.run()?;

    println!("The simulation for {} days has finished!", summary.days);
    println!("  admitted:    {}", summary.admitted);
    println!("  rebalanced:  {}", summary.rebalanced);
    println!("  skipped:     {}", summary.skipped);
    println!("  discharged:  {}", summary.discharged);
    println!("  downgraded:  {}", summary.downgraded);
    println!("  remaining:   {}", summary.final_patients);
    for path in &summary.snapshots {
        println!("  snapshot:    {}", path.display());
    }

    Ok(())
}
