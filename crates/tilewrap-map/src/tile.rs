use tilewrap_common::{Result, TagKind, TilewrapError};
use tilewrap_nbt::{NamedTag, Tag};

/// Largest accepted `scale` exponent.
pub const MAX_SCALE: i8 = 16;

/// Dense row-major grid of palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl ColorGrid {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        ColorGrid {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, cells: Vec<u8>) -> Result<Self> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            TilewrapError::InvalidTileGeometry(format!("{}x{} grid is too large", width, height))
        })?;
        if cells.len() != expected {
            return Err(TilewrapError::InvalidTileGeometry(format!(
                "{} cells for a {}x{} grid",
                cells.len(),
                width,
                height
            )));
        }
        Ok(ColorGrid {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows(rows: &[&[u8]]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.len());
        let cells: Vec<u8> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Self::from_vec(width, rows.len(), cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row * self.width + col] = value;
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.width..(row + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [u8] {
        &mut self.cells[row * self.width..(row + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.cells
    }
}

/// A tile's world-space rectangle. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

impl Footprint {
    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top + 1
    }
}

/// Typed view of the `data` compound of a map document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub scale: i8,
    pub x_center: i32,
    pub z_center: i32,
    pub width: i16,
    pub height: i16,
    pub colors: ColorGrid,
}

impl Tile {
    /// Extracts the tile from a document root. Every field is required.
    pub fn from_root(root: &NamedTag) -> Result<Tile> {
        let data = root
            .tag
            .get("data")
            .ok_or_else(|| TilewrapError::missing("data"))?;
        expect_kind("data", data, TagKind::Compound)?;

        let scale = read_field(data, "scale", TagKind::Byte, Tag::as_i8)?;
        let x_center = read_field(data, "xCenter", TagKind::Int, Tag::as_i32)?;
        let z_center = read_field(data, "zCenter", TagKind::Int, Tag::as_i32)?;
        let width = read_field(data, "width", TagKind::Short, Tag::as_i16)?;
        let height = read_field(data, "height", TagKind::Short, Tag::as_i16)?;
        let colors = read_field(data, "colors", TagKind::ByteArray, Tag::as_byte_array)?;

        if width <= 0 || height <= 0 {
            return Err(TilewrapError::InvalidTileGeometry(format!(
                "dimensions {}x{} are not positive",
                width, height
            )));
        }
        let colors = ColorGrid::from_vec(width as usize, height as usize, colors.to_vec())?;

        let tile = Tile {
            scale,
            x_center,
            z_center,
            width,
            height,
            colors,
        };
        tile.validate()?;
        Ok(tile)
    }

    /// Returns a copy of `root` with `colors`, `xCenter` and `zCenter`
    /// replaced by this tile's values. Everything else is left as it was.
    pub fn apply_to(&self, root: &NamedTag) -> Result<NamedTag> {
        let mut patched = root.clone();
        let data = patched
            .tag
            .get_mut("data")
            .ok_or_else(|| TilewrapError::missing("data"))?;
        expect_kind("data", data, TagKind::Compound)?;

        patch_field(
            data,
            "colors",
            Tag::ByteArray(self.colors.as_slice().to_vec()),
        )?;
        patch_field(data, "xCenter", Tag::Int(self.x_center))?;
        patch_field(data, "zCenter", Tag::Int(self.z_center))?;
        Ok(patched)
    }

    /// Checks the invariants the compositor relies on.
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_SCALE).contains(&self.scale) {
            return Err(TilewrapError::InvalidTileGeometry(format!(
                "scale {} outside 0..={}",
                self.scale, MAX_SCALE
            )));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(TilewrapError::InvalidTileGeometry(format!(
                "dimensions {}x{} are not positive",
                self.width, self.height
            )));
        }
        if self.colors.width() != self.width as usize || self.colors.height() != self.height as usize
        {
            return Err(TilewrapError::InvalidTileGeometry(format!(
                "colors grid is {}x{}, tile is {}x{}",
                self.colors.width(),
                self.colors.height(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    pub fn scale_factor(&self) -> i64 {
        1i64 << self.scale.clamp(0, MAX_SCALE)
    }

    pub fn footprint(&self) -> Footprint {
        let scale_factor = self.scale_factor();
        let width = i64::from(self.width);
        let height = i64::from(self.height);

        let left = i64::from(self.x_center) - (width / 2) * scale_factor;
        let top = i64::from(self.z_center) - (height / 2) * scale_factor;
        Footprint {
            left,
            right: left + width * scale_factor - 1,
            top,
            bottom: top + height * scale_factor - 1,
        }
    }
}

fn expect_kind(path: &str, tag: &Tag, expected: TagKind) -> Result<()> {
    let found = tag.kind();
    if found != expected {
        return Err(TilewrapError::UnexpectedKind {
            path: path.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn read_field<'a, T>(
    data: &'a Tag,
    name: &str,
    expected: TagKind,
    project: impl Fn(&'a Tag) -> Option<T>,
) -> Result<T> {
    let path = format!("data.{}", name);
    let tag = data
        .get(name)
        .ok_or_else(|| TilewrapError::missing(path.as_str()))?;
    expect_kind(&path, tag, expected)?;
    project(tag).ok_or_else(|| TilewrapError::missing(path))
}

fn patch_field(data: &mut Tag, name: &str, value: Tag) -> Result<()> {
    let path = format!("data.{}", name);
    let slot = data
        .get_mut(name)
        .ok_or_else(|| TilewrapError::missing(path.as_str()))?;
    expect_kind(&path, slot, value.kind())?;
    *slot = value;
    Ok(())
}
