use crate::palette::PaletteTable;
use crate::tile::ColorGrid;

/// Expands palette indices into a row-major RGB8 buffer, 3 bytes per cell.
pub fn render_rgb(grid: &ColorGrid, palette: &PaletteTable) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(grid.as_slice().len() * 3);
    for &index in grid.as_slice() {
        pixels.extend_from_slice(&palette.get(index));
    }
    pixels
}
