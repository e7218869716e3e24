use std::process::ExitCode;

use jls_convert::cli::{self, ParseOutcome};
use jls_convert::logger;

use tracing::info;

fn main() -> ExitCode {
    logger::init();

    let args = match cli::parse_args(std::env::args_os()) {
        Ok(ParseOutcome::Convert(args)) => args,
        Ok(ParseOutcome::Informational(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // Printed directly so the diagnostic survives RUST_LOG=off
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(&args) {
        Ok(output) => {
            info!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Conversion failed: {e}");
            ExitCode::FAILURE
        }
    }
}
