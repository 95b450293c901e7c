//! powboot - Bootstrap launcher for the kCTF proof-of-work tool
//!
//! Thin entry point: everything after the program name is opaque and is
//! forwarded to the launched artifact untouched, so there are no flags
//! here. Verbosity comes from `POWBOOT_LOG`, the config path from
//! `POWBOOT_CONFIG`.

use console::style;
use powboot::config::ConfigManager;
use powboot::error::PowbootResult;
use powboot::fetch::HttpFetcher;
use powboot::orchestrator::Orchestrator;
use std::convert::Infallible;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let forwarded_args: Vec<String> = std::env::args().skip(1).collect();

    let filter = EnvFilter::try_from_env("POWBOOT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("powboot=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(forwarded_args) {
        Ok(never) => match never {},
        Err(e) => {
            eprintln!(
                "{} {} stage failed: {}",
                style("Error:").red().bold(),
                e.stage(),
                e
            );
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// On success the process becomes the artifact and this never returns.
fn run(forwarded_args: Vec<String>) -> PowbootResult<Infallible> {
    let config = ConfigManager::from_env().load()?;
    let orchestrator = Orchestrator::new(config, HttpFetcher::new());
    orchestrator.run(forwarded_args)
}
