use clap::Parser;
use std::process::ExitCode;

use tilewrap::commands::run_shift;
use tilewrap::config::{exit_for_parse_error, ShiftConfig, EXIT_BAD_ARGUMENT, EXIT_FAILURE};
use tilewrap::{init_logging, log, LogSeverity};

fn main() -> ExitCode {
    let config = match ShiftConfig::try_parse() {
        Ok(config) => config,
        Err(err) => return exit_for_parse_error(err, "X_SHIFT", "Z_SHIFT"),
    };
    init_logging(config.verbose);

    if let Err(reason) = config.validate() {
        log(format!("Invalid arguments: {}", reason), LogSeverity::Error);
        return ExitCode::from(EXIT_BAD_ARGUMENT);
    }

    log(
        format!(
            "Shifting {} maps by ({}, {})",
            config.files.len(),
            config.x_shift,
            config.z_shift
        ),
        LogSeverity::Info,
    );
    match run_shift(&config) {
        Ok(written) => {
            log(format!("Shifted {} maps", written.len()), LogSeverity::Info);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log(format!("Shift failed: {}", e), LogSeverity::Fatal);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
