//! Command-line configuration for the tilewrap tools.
//!
//! Both tools take two integers as their leading positional arguments. Parse
//! failures map to distinct exit codes so scripts can tell them apart:
//!
//! - `1` missing or unexpected arguments
//! - `2` the first integer is invalid
//! - `3` the second integer is invalid
//! - `4` any other invalid argument value
//! - `5` processing failed after arguments were accepted
//!
//! Values are checked while arguments are parsed, so a bad leading integer
//! reports `2` or `3` even when required arguments are also missing.
//!
//! Optional settings fall back to `TILEWRAP_*` environment variables.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use tilewrap_map::blank::{DEFAULT_DIMENSION, DEFAULT_SCALE, DEFAULT_SIZE};
use tilewrap_map::compositor::DEFAULT_MAX_CANVAS_CELLS;
use tilewrap_map::tile::MAX_SCALE;
use tilewrap_map::{BlankTileOptions, CompositorConfig};

// =============================================================================
// Default Values
// =============================================================================

/// Default directory for shifted maps and previews.
pub const DEFAULT_OUTPUT_DIR: &str = "shifted";

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_FIRST_INTEGER: u8 = 2;
pub const EXIT_SECOND_INTEGER: u8 = 3;
pub const EXIT_BAD_ARGUMENT: u8 = 4;
pub const EXIT_FAILURE: u8 = 5;

// =============================================================================
// Shift Tool
// =============================================================================

/// Stitch map tiles together, wrap-shift the result and split it back.
///
/// Reads gzip-compressed map files, composites them onto one canvas, rolls the
/// canvas by the given offsets in world units and writes every map to the
/// output directory together with a PNG preview.
#[derive(Parser, Debug, Clone)]
#[command(name = "tilewrap-shift")]
#[command(version, about, long_about = None, allow_negative_numbers = true)]
pub struct ShiftConfig {
    /// Shift along the x axis, in world units.
    #[arg(value_name = "X_SHIFT")]
    pub x_shift: i32,

    /// Shift along the z axis, in world units.
    #[arg(value_name = "Z_SHIFT")]
    pub z_shift: i32,

    /// Map files to shift. Later files win where tiles overlap.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Directory the shifted maps and previews are written to.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, env = "TILEWRAP_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Skip writing PNG previews.
    #[arg(long)]
    pub no_preview: bool,

    /// Refuse canvases with more cells than this.
    #[arg(long, default_value_t = DEFAULT_MAX_CANVAS_CELLS, env = "TILEWRAP_MAX_CANVAS_CELLS")]
    pub max_canvas_cells: u64,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ShiftConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_canvas_cells == 0 {
            return Err("--max-canvas-cells must be positive".to_string());
        }
        if self.output_dir.is_file() {
            return Err(format!(
                "output directory {} is an existing file",
                self.output_dir.display()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for file in &self.files {
            let name = file
                .file_name()
                .ok_or_else(|| format!("{} does not name a file", file.display()))?;
            if !seen.insert(name) {
                return Err(format!(
                    "more than one input is named {}",
                    name.to_string_lossy()
                ));
            }
        }
        Ok(())
    }

    pub fn compositor_config(&self) -> CompositorConfig {
        CompositorConfig {
            max_canvas_cells: self.max_canvas_cells,
        }
    }
}

// =============================================================================
// Blank Tool
// =============================================================================

/// Write an empty map document to standard output.
#[derive(Parser, Debug, Clone)]
#[command(name = "tilewrap-blank")]
#[command(version, about, long_about = None, allow_negative_numbers = true)]
pub struct BlankConfig {
    /// World x coordinate of the map center.
    #[arg(value_name = "X_CENTER")]
    pub x_center: i32,

    /// World z coordinate of the map center.
    #[arg(value_name = "Z_CENTER")]
    pub z_center: i32,

    /// Scale exponent; one pixel covers 2^scale world units.
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    pub scale: i8,

    /// Dimension id stored in the map.
    #[arg(long, default_value_t = DEFAULT_DIMENSION)]
    pub dimension: i8,

    /// Width and height in pixels.
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    pub size: i16,

    /// Gzip the output like the game does. Off by default.
    #[arg(long)]
    pub gzip: bool,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BlankConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=MAX_SCALE).contains(&self.scale) {
            return Err(format!("--scale must be within 0..={}", MAX_SCALE));
        }
        if self.size <= 0 {
            return Err("--size must be positive".to_string());
        }
        Ok(())
    }

    pub fn tile_options(&self) -> BlankTileOptions {
        BlankTileOptions {
            x_center: self.x_center,
            z_center: self.z_center,
            scale: self.scale,
            dimension: self.dimension,
            width: self.size,
            height: self.size,
        }
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit code for a failed parse. `first` and `second` are the value names of
/// the two leading integer arguments.
pub fn parse_error_code(err: &clap::Error, first: &str, second: &str) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        ErrorKind::MissingRequiredArgument
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues
        | ErrorKind::TooManyValues
        | ErrorKind::UnknownArgument => EXIT_USAGE,
        ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
            match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) if arg.contains(first) => EXIT_FIRST_INTEGER,
                Some(ContextValue::String(arg)) if arg.contains(second) => EXIT_SECOND_INTEGER,
                _ => EXIT_BAD_ARGUMENT,
            }
        }
        _ => EXIT_BAD_ARGUMENT,
    }
}

/// Prints the parse error (or help text) and returns the matching exit code.
pub fn exit_for_parse_error(err: clap::Error, first: &str, second: &str) -> ExitCode {
    let code = parse_error_code(&err, first, second);
    // Nothing sensible is left to do if stderr is gone.
    let _ = err.print();
    ExitCode::from(code)
}
