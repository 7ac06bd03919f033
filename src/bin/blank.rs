use clap::Parser;
use std::io;
use std::process::ExitCode;

use tilewrap::commands::run_blank;
use tilewrap::config::{exit_for_parse_error, BlankConfig, EXIT_BAD_ARGUMENT, EXIT_FAILURE};
use tilewrap::{init_logging, log, LogSeverity};

fn main() -> ExitCode {
    let config = match BlankConfig::try_parse() {
        Ok(config) => config,
        Err(err) => return exit_for_parse_error(err, "X_CENTER", "Z_CENTER"),
    };
    init_logging(config.verbose);

    if let Err(reason) = config.validate() {
        log(format!("Invalid arguments: {}", reason), LogSeverity::Error);
        return ExitCode::from(EXIT_BAD_ARGUMENT);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_blank(&config, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log(format!("Could not write blank map: {}", e), LogSeverity::Fatal);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
