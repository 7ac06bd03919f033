use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tilewrap_common::{Result, TilewrapError};
use tilewrap_logger::log;
use tilewrap_logger::LogSeverity::{Debug, Info};
use tilewrap_map::{blank_tile, shift_documents, Compositor, PaletteTable};
use tilewrap_nbt::{encode, save_encoded, NbtFile};

use crate::config::{BlankConfig, ShiftConfig};
use crate::preview::save_png;

/// Shifts every input map and writes the results, plus previews unless
/// disabled, into the output directory under the input file names. Nothing
/// is written unless every input shifts cleanly. Returns the written maps.
pub fn run_shift(config: &ShiftConfig) -> Result<Vec<PathBuf>> {
    let names = config
        .files
        .iter()
        .map(|path| {
            path.file_name()
                .map(PathBuf::from)
                .ok_or_else(|| TilewrapError::InvalidInputPath {
                    path: path.display().to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut roots = Vec::with_capacity(config.files.len());
    for path in &config.files {
        log(format!("Reading {}", path.display()), Debug);
        roots.push(NbtFile::open(path)?.root);
    }

    let compositor = Compositor::with_config(config.compositor_config());
    let maps = shift_documents(&compositor, &roots, config.x_shift, config.z_shift)?;

    fs::create_dir_all(&config.output_dir)?;
    let palette = PaletteTable::standard();
    let mut written = Vec::with_capacity(maps.len());
    for (name, map) in names.iter().zip(&maps) {
        let target = config.output_dir.join(name);
        save_encoded(&target, &map.bytes)?;
        if !config.no_preview {
            save_png(preview_path(&target), &map.tile.colors, &palette)?;
        }
        log(
            format!(
                "Wrote {} centered at ({}, {})",
                target.display(),
                map.tile.x_center,
                map.tile.z_center
            ),
            Info,
        );
        written.push(target);
    }
    Ok(written)
}

/// `map_3.dat` previews as `map_3.dat.png`.
pub fn preview_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".png");
    PathBuf::from(name)
}

/// Writes an encoded blank map to `out`.
pub fn run_blank<W: Write>(config: &BlankConfig, out: &mut W) -> Result<()> {
    let root = blank_tile(&config.tile_options())?;
    let bytes = encode(&root)?;
    if config.gzip {
        let mut encoder = GzEncoder::new(out, Compression::default());
        encoder.write_all(&bytes)?;
        encoder.finish()?.flush()?;
    } else {
        out.write_all(&bytes)?;
        out.flush()?;
    }
    log(
        format!(
            "Wrote blank {}x{} map centered at ({}, {})",
            config.size, config.size, config.x_center, config.z_center
        ),
        Debug,
    );
    Ok(())
}
