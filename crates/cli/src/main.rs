use std::io;
use std::process::ExitCode;

use clap::Parser;

use stockledger_cli::{Cli, run};
use stockledger_observability::LogConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = stockledger_observability::init_with(&LogConfig::new(&cli.log)) {
        eprintln!("warning: {e}; continuing without an operational log");
    }

    match run(&cli, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
