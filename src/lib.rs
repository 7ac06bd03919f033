pub mod commands;
pub mod config;
pub mod preview;

// Re-export commonly used items
pub use tilewrap_common::{Result, TilewrapError};
pub use tilewrap_logger::{log, LogSeverity};
pub use tilewrap_map::{Compositor, PaletteTable, ShiftedMap, Tile};
pub use tilewrap_nbt::{NamedTag, NbtFile, Tag};

/// Lowers the log threshold to debug when `verbose` is set. Otherwise the
/// `TILEWRAP_LOG` environment variable decides.
pub fn init_logging(verbose: bool) {
    if verbose {
        tilewrap_logger::set_min_severity(LogSeverity::Debug);
    }
}
