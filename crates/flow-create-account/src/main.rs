use std::process::ExitCode;

use clap::Parser;
use flow_create_account::{Args, error::EXIT_OK, run};
use flow_kit::RestClient;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the report
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Received interrupt, no longer waiting for the seal");
                shutdown.cancel();
            }
            Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
        }
    });

    let api = RestClient::with_retry_config(config.access_api.clone(), config.retry.clone());
    tracing::debug!(access_api = %api.url(), sponsor = %config.sponsor_address, "Starting");

    let stdout = std::io::stdout();
    match run(&config, &api, &mut rand::rngs::OsRng, stdout.lock(), cancel).await {
        Ok(_) => ExitCode::from(EXIT_OK),
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
