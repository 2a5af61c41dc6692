use clap::Parser;
use rfs_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to file when possible; never refuse to run over logging.
    if let Err(err) = logging::init_logging(cli.verbose) {
        logging::init_logging_stderr(cli.verbose);
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli.run().await {
        eprintln!("rfs error: {:#}", err);
        std::process::exit(1);
    }
}
