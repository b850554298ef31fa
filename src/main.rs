//! DOMREALCE cart command line

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(err) = cli.init_logging() {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{err}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user on stderr"
            )]
            {
                eprintln!("error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}
