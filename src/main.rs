use std::process::ExitCode;

use clap::Parser;
use log_bucket::cli::{run, Cli};
use log_bucket::hook::LocalCleanup;
use log_bucket::telemetry::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("{e}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => {
            tracing::info!(
                key = %outcome.receipt.key,
                local_file_deleted = outcome.cleanup == LocalCleanup::Deleted,
                "Hook completed"
            );
            ExitCode::SUCCESS
        }
        // Already logged where it was detected.
        Err(e) => ExitCode::from(e.exit_code()),
    }
}
