use tilewrap_common::{Result, TilewrapError};
use tilewrap_nbt::{NamedTag, Tag};

pub const DEFAULT_SCALE: i8 = 1;
pub const DEFAULT_DIMENSION: i8 = 0;
pub const DEFAULT_SIZE: i16 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankTileOptions {
    pub x_center: i32,
    pub z_center: i32,
    pub scale: i8,
    pub dimension: i8,
    pub width: i16,
    pub height: i16,
}

impl BlankTileOptions {
    pub fn at(x_center: i32, z_center: i32) -> Self {
        BlankTileOptions {
            x_center,
            z_center,
            ..Default::default()
        }
    }
}

impl Default for BlankTileOptions {
    fn default() -> Self {
        BlankTileOptions {
            x_center: 0,
            z_center: 0,
            scale: DEFAULT_SCALE,
            dimension: DEFAULT_DIMENSION,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

/// Builds an all-zero map document, fields in the order the game writes them.
pub fn blank_tile(options: &BlankTileOptions) -> Result<NamedTag> {
    if options.width <= 0 || options.height <= 0 {
        return Err(TilewrapError::InvalidTileGeometry(format!(
            "dimensions {}x{} are not positive",
            options.width, options.height
        )));
    }
    let cells = options.width as usize * options.height as usize;

    let data = Tag::compound(vec![
        NamedTag::new("scale", Tag::Byte(options.scale)),
        NamedTag::new("dimension", Tag::Byte(options.dimension)),
        NamedTag::new("height", Tag::Short(options.height)),
        NamedTag::new("colors", Tag::ByteArray(vec![0; cells])),
        NamedTag::new("xCenter", Tag::Int(options.x_center)),
        NamedTag::new("width", Tag::Short(options.width)),
        NamedTag::new("zCenter", Tag::Int(options.z_center)),
    ]);
    Ok(NamedTag::new("", Tag::compound(vec![NamedTag::new("data", data)])))
}
