// ABOUTME: Main entry point for pgmi-wizard
//
// Binary: pgmi-wizard
// Usage: pgmi-wizard [--config PATH] [--timeout SECS] [--format json|text] [COMMAND]
// - No command or connect: connection setup wizard
// - init [DIR]: project setup wizard, optionally followed by connection setup

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use tracing::info;

use pgmi_wizard::app::cleanup_terminal;
use pgmi_wizard::cli::{self, Commands};
use pgmi_wizard::config::WizardConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let config = WizardConfig::load(args.config.as_deref())?.with_timeout_override(args.timeout);
    setup_logging(&config);
    setup_panic_handler();

    info!(version = env!("CARGO_PKG_VERSION"), "pgmi-wizard starting");

    let result = match args.command {
        Some(Commands::Init(init_args)) => cli::init::execute(init_args, &config, args.format).await,
        Some(Commands::Connect) | None => cli::connect::execute(&config, args.format).await,
    };

    // Ensure terminal is cleaned up on any error
    if result.is_err() {
        cleanup_terminal();
    }

    result
}

fn setup_logging(config: &WizardConfig) {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    if !config.logging.enabled {
        return;
    }

    let Ok(log_dir) = WizardConfig::log_dir() else {
        return;
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    // Create JSONL log file with timestamp
    let log_file = log_dir.join(format!(
        "pgmi-wizard-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // The terminal belongs to the TUI, so without a file there is nowhere to log
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    let default_filter = config.logging.filter.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
