//! Thinfilm command-line interface.
//!
//! Run reflectance sweeps from TOML job files:
//! ```sh
//! thinfilm-cli run jobs/two_layer.toml
//! thinfilm-cli validate jobs/two_layer.toml
//! thinfilm-cli materials
//! ```

mod config;
mod runner;
mod sink;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thinfilm_materials::{MaterialCatalog, MaterialRole};

#[derive(Parser)]
#[command(name = "thinfilm-cli")]
#[command(about = "Thinfilm: closed-form anti-reflection coating reflectance")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every figure in a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve materials and models without sweeping.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the built-in material catalogue.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let catalog = MaterialCatalog::standard();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Thinfilm Reflectance");
            println!("====================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let plans = runner::plan_job(&job, &catalog)?;
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            let mut sink = sink::FileSink::new(&out_dir, job.output.save_csv, job.output.save_json);

            let count = runner::run_job(&plans, &mut sink)?;
            let written = sink.finish()?;
            for path in &written {
                println!("  wrote {}", path.display());
            }
            println!("{} figures complete.", count);
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let plans = runner::plan_job(&job, &catalog)?;
            for plan in &plans {
                println!(
                    "  '{}': {} series over {} samples of {}",
                    plan.title,
                    plan.series.len(),
                    plan.sweep.len(),
                    plan.sweep.axis()
                );
            }
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Materials => {
            println!("Available materials:");
            println!();
            for role in [MaterialRole::Coating, MaterialRole::Substrate] {
                match role {
                    MaterialRole::Coating => println!("  Coatings:"),
                    MaterialRole::Substrate => println!("  Substrates:"),
                }
                for m in catalog.iter().filter(|m| m.role == role) {
                    println!("    {:<12} {:<12} n = {}", m.id, m.display_name, m.medium.index());
                }
                println!();
            }
            Ok(())
        }
    }
}
