use clap::Parser;
use kitchen_sim::lifecycle::{run_from_files, setup_tracing};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "kitchen-sim")]
#[command(about = "Simulates waiters and chefs working through a fixed number of orders")]
struct Cli {
    /// Settings file: eight integers, one per line
    #[arg(long, default_value = "config.txt")]
    config: PathBuf,

    /// Order event log, appended to
    #[arg(long, default_value = "log.txt")]
    log: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing();

    info!("Program started");

    let report = run_from_files(&cli.config, &cli.log).await.map_err(|e| {
        error!(error = %e, "Simulation failed");
        e.to_string()
    })?;

    info!(%report, "Simulation complete");
    info!("Done.");
    Ok(())
}
