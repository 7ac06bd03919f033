use image::RgbImage;
use std::path::Path;

use tilewrap_common::{Result, TilewrapError};
use tilewrap_map::{render_rgb, ColorGrid, PaletteTable};

/// Renders a color grid as an RGB image, one pixel per cell.
pub fn preview_image(grid: &ColorGrid, palette: &PaletteTable) -> Result<RgbImage> {
    let (width, height) = (grid.width() as u32, grid.height() as u32);
    RgbImage::from_raw(width, height, render_rgb(grid, palette)).ok_or_else(|| {
        TilewrapError::Image(format!("pixel buffer does not fit {}x{}", width, height))
    })
}

pub fn save_png<P: AsRef<Path>>(path: P, grid: &ColorGrid, palette: &PaletteTable) -> Result<()> {
    preview_image(grid, palette)?
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| TilewrapError::Image(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_pixels() {
        let grid = ColorGrid::from_rows(&[&[0, 4, 16]]).unwrap();
        let image = preview_image(&grid, &PaletteTable::standard()).unwrap();
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(image.get_pixel(1, 0).0, [88, 124, 39]);
        assert_eq!(image.get_pixel(2, 0).0, [178, 0, 0]);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_0.dat.png");
        let grid = ColorGrid::from_rows(&[&[4, 4], &[16, 16]]).unwrap();
        save_png(&path, &grid, &PaletteTable::standard()).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(0, 1).0, [178, 0, 0]);
    }
}
