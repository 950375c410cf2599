//! omenctl - fan and thermal control for HP OMEN laptops on Linux
//!
//! One-shot CLI over the omen-core controller: show status, switch fan
//! modes, toggle the max-fan override, or watch sensors continuously.
//! Hardware errors map onto distinct process exit codes so scripts and
//! service units can react to the specific failure.

mod cli;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Cli::parse();

    // Log level via OMENCTL_LOG (trace, debug, info, warn, error).
    // Logs go to stderr; stdout carries only command output.
    let log_level = std::env::var("OMENCTL_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(args).await {
        eprintln!("omenctl: {}", e);
        std::process::exit(e.exit_code());
    }
}
