use std::path::{Path, PathBuf};

use tilewrap::config::ShiftConfig;
use tilewrap_map::compositor::DEFAULT_MAX_CANVAS_CELLS;
use tilewrap_map::{blank_tile, BlankTileOptions};
use tilewrap_nbt::{NamedTag, NbtFile, Tag};

pub const SIZE: i16 = 8;

/// A scale-1 map document centered at (x_center, z_center), filled with `value`.
pub fn painted_map(x_center: i32, z_center: i32, value: u8) -> NamedTag {
    let options = BlankTileOptions {
        width: SIZE,
        height: SIZE,
        ..BlankTileOptions::at(x_center, z_center)
    };
    let mut root = blank_tile(&options).unwrap();
    let data = root.tag.get_mut("data").unwrap();
    *data.get_mut("colors").unwrap() = Tag::ByteArray(vec![value; SIZE as usize * SIZE as usize]);
    root
}

pub fn write_map(dir: &Path, name: &str, root: NamedTag) -> PathBuf {
    let path = dir.join(name);
    NbtFile::new(root).unwrap().save(&path).unwrap();
    path
}

pub fn shift_config(files: Vec<PathBuf>, output_dir: PathBuf, x_shift: i32, z_shift: i32) -> ShiftConfig {
    ShiftConfig {
        x_shift,
        z_shift,
        files,
        output_dir,
        no_preview: false,
        max_canvas_cells: DEFAULT_MAX_CANVAS_CELLS,
        verbose: false,
    }
}

pub fn data_field<'a>(root: &'a NamedTag, name: &str) -> &'a Tag {
    root.tag.get("data").unwrap().get(name).unwrap()
}
