mod menu;
mod session;
mod table;

use anyhow::Context;
use bedtrack_core::config::{hospital_roster_from_env_value, seed_from_env_value};
use bedtrack_core::{build_report, render_report, CoreConfig, Severity, StatusChange};
use bedtrack_types::parse_covid_flag;
use clap::{Parser, Subcommand};
use menu::Menu;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Number of periodic snapshots a default simulation run writes.
const DEFAULT_REPORT_STATES: usize = 9;

#[derive(Parser)]
#[command(name = "bedtrack")]
#[command(about = "Hospital bed and patient tracker")]
struct Cli {
    /// Directory holding the snapshot files (overrides BEDTRACK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu
    Menu,
    /// List patients per hospital
    List,
    /// Hospitals with free beds
    Availability,
    /// Admit a new patient
    Add {
        /// Hospital name (case-insensitive)
        hospital: String,
        /// Severity status, 0-3
        severity: Severity,
        /// "true" or "false"
        covid: String,
    },
    /// Transfer a patient to another hospital
    Transfer {
        /// Patient ID, e.g. 042b
        id: String,
        /// Destination hospital
        hospital: String,
    },
    /// Discharge a recovered (status 0) patient
    Discharge {
        /// Patient ID
        id: String,
    },
    /// Update a patient's severity status
    UpdateStatus {
        /// Patient ID
        id: String,
        /// New severity status, 0-3
        severity: Severity,
    },
    /// Summarise simulation snapshots
    Report {
        /// Snapshot files (defaults to the simulation's hospital_state_NN.csv files)
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bedtrack=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(cli.data_dir)?;

    match cli.command {
        Some(Commands::Menu) => {
            let registry = session::load_initial(&cfg)?;
            let stdin = io::stdin();
            let mut menu = Menu::new(
                stdin.lock(),
                io::stdout(),
                registry,
                cfg.final_state_path(),
                rng()?,
            );
            menu.run()?;
            tracing::debug!(
                "menu closed with {} patients",
                menu.into_registry().patient_count()
            );
        }
        Some(Commands::List) => {
            let registry = session::load_working(&cfg)?;
            print!("{}", table::patient_table(&registry));
        }
        Some(Commands::Availability) => {
            let registry = session::load_working(&cfg)?;
            let available = registry.available_hospitals();
            if available.is_empty() {
                println!("No hospital can admit new patients.");
            }
            for name in available {
                if let Some(h) = registry.hospital(name) {
                    println!("{} -> Beds available: {}", h.name(), h.available_beds());
                }
            }
        }
        Some(Commands::Add {
            hospital,
            severity,
            covid,
        }) => {
            let covid = parse_covid_flag(&covid)?;
            let mut rng = rng()?;
            match session::apply(&cfg, |r| r.admit(&hospital, severity, covid, &mut rng))? {
                Ok(id) => println!("Admitted patient {}", id),
                Err(e) => eprintln!("Error admitting patient: {}", e),
            }
        }
        Some(Commands::Transfer { id, hospital }) => {
            match session::apply(&cfg, |r| {
                let id = r.resolve_id(&id)?;
                r.transfer(id, &hospital)?;
                Ok(id)
            })? {
                Ok(id) => println!("Transferred patient {} to {}", id, hospital.trim()),
                Err(e) => eprintln!("Error transferring patient: {}", e),
            }
        }
        Some(Commands::Discharge { id }) => {
            match session::apply(&cfg, |r| {
                let id = r.resolve_id(&id)?;
                r.discharge(id)
            })? {
                Ok(patient) => println!(
                    "Discharged patient {} from {}",
                    patient.id(),
                    patient.hospital_name().display_name()
                ),
                Err(e) => eprintln!("Error discharging patient: {}", e),
            }
        }
        Some(Commands::UpdateStatus { id, severity }) => {
            match session::apply(&cfg, |r| {
                let id = r.resolve_id(&id)?;
                r.update_status(id, severity).map(|change| (id, change))
            })? {
                Ok((id, StatusChange::Unchanged(s))) => {
                    println!("Patient {} already has a status of {}", id, s)
                }
                Ok((id, StatusChange::Updated { from, to })) => {
                    println!("Updated patient {} from {} to {}", id, from, to)
                }
                Err(e) => eprintln!("Error updating status: {}", e),
            }
        }
        Some(Commands::Report { files }) => {
            let files = if files.is_empty() {
                (1..=DEFAULT_REPORT_STATES)
                    .map(|n| cfg.simulation_state_path(n))
                    .collect()
            } else {
                files
            };
            let tallies = build_report(&files, cfg.hospitals());
            if tallies.is_empty() {
                println!("No snapshots could be read.");
            } else {
                print!("{}", render_report(&tallies));
            }
        }
        None => {
            println!("Use 'bedtrack --help' for commands");
        }
    }

    Ok(())
}

/// Builds the core configuration from the environment, with `--data-dir` taking precedence.
fn resolve_config(data_dir: Option<PathBuf>) -> anyhow::Result<CoreConfig> {
    let data_dir = data_dir
        .or_else(|| std::env::var_os("BEDTRACK_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(bedtrack_core::constants::DEFAULT_DATA_DIR));
    let hospitals = hospital_roster_from_env_value(std::env::var("BEDTRACK_HOSPITALS").ok())
        .context("invalid BEDTRACK_HOSPITALS")?;
    Ok(CoreConfig::new(data_dir, hospitals)?)
}

fn rng() -> anyhow::Result<ChaCha8Rng> {
    let seed = seed_from_env_value(std::env::var("BEDTRACK_SEED").ok())
        .context("invalid BEDTRACK_SEED")?;
    Ok(match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    })
}
