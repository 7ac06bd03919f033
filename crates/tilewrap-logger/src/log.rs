use crate::severity::LogSeverity;
use crate::systime::now;
use once_cell::sync::Lazy;
use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the minimum severity that gets printed.
pub const LOG_ENV_VAR: &str = "TILEWRAP_LOG";

// Process-wide threshold, seeded from the environment on first use.
static MIN_SEVERITY: Lazy<AtomicU8> = Lazy::new(|| {
    let initial = env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<LogSeverity>().ok())
        .unwrap_or(LogSeverity::Info);
    AtomicU8::new(initial as u8)
});

pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

pub(crate) fn format_line(msg: &str, log_severity: LogSeverity, time: &str) -> String {
    format!("[{}] {} {}", log_severity, time, msg)
}

/// Writes a log line to stderr. Stdout is left alone since tools may stream
/// binary data there.
pub fn log(msg: String, log_severity: LogSeverity) {
    if !enabled(log_severity) {
        return;
    }
    eprintln!("{}", format_line(&msg, log_severity, &now()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line("decoded 3 tiles", LogSeverity::Info, "2024-01-01 00:00:00 UTC");
        assert_eq!(line, "[INFO] 2024-01-01 00:00:00 UTC decoded 3 tiles");
    }

    #[test]
    fn test_threshold() {
        set_min_severity(LogSeverity::Warning);
        assert!(!enabled(LogSeverity::Info));
        assert!(enabled(LogSeverity::Warning));
        assert!(enabled(LogSeverity::Fatal));
        assert_eq!(min_severity(), LogSeverity::Warning);

        set_min_severity(LogSeverity::Debug);
        assert!(enabled(LogSeverity::Debug));
    }
}
