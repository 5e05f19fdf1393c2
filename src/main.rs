use anyhow::Context;
use astorb_validator::cli::{args::Args, commands};
use clap::Parser;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Create async runtime and run the command with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<_> = runtime.block_on(async {
        // Cooperative cancellation flag checked by the scanners between lines
        let cancel = Arc::new(AtomicBool::new(false));

        let signal_flag = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, stopping after the current line...");
                signal_flag.store(true, Ordering::Relaxed);
            }
        });

        commands::run(args, cancel)
            .await
            .context("astorb validation failed")
    });

    match result {
        Ok(_stats) => {
            // Success - statistics have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
