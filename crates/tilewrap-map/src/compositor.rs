//! Stitches tiles into one canvas, wraps it around and cuts the tiles back out.
//!
//! Steps, in order:
//!
//! 1. union of all tile footprints
//! 2. zero-filled canvas over that union
//! 3. nearest-neighbour upsampling of every tile by its scale factor, placed in
//!    input order (later tiles win where they overlap)
//! 4. toroidal roll of the canvas by the shift vector
//! 5. each tile's original window is cut out again and decimated, keeping odd
//!    rows and columns
//! 6. the tile centers move by the negated shift
//!
//! Decimation only inverts the upsampling for a scale factor of 2. Other
//! factors produce a degraded tile: the decimated grid is anchored top-left and
//! cropped or zero-padded to the tile's dimensions.

use tilewrap_common::{Result, TilewrapError};
use tilewrap_logger::log;
use tilewrap_logger::LogSeverity::{Debug, Warning};

use crate::tile::{ColorGrid, Tile};

/// Default upper bound on canvas cells.
pub const DEFAULT_MAX_CANVAS_CELLS: u64 = 1 << 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorConfig {
    pub max_canvas_cells: u64,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        CompositorConfig {
            max_canvas_cells: DEFAULT_MAX_CANVAS_CELLS,
        }
    }
}

/// Union of tile footprints, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: i64,
    pub x_max: i64,
    pub z_min: i64,
    pub z_max: i64,
}

impl BoundingBox {
    pub fn of(tiles: &[Tile]) -> Result<BoundingBox> {
        let mut footprints = tiles.iter().map(Tile::footprint);
        let first = footprints.next().ok_or(TilewrapError::EmptyTileSet)?;
        let init = BoundingBox {
            x_min: first.left,
            x_max: first.right,
            z_min: first.top,
            z_max: first.bottom,
        };
        Ok(footprints.fold(init, |bbox, fp| BoundingBox {
            x_min: bbox.x_min.min(fp.left),
            x_max: bbox.x_max.max(fp.right),
            z_min: bbox.z_min.min(fp.top),
            z_max: bbox.z_max.max(fp.bottom),
        }))
    }

    pub fn width(&self) -> u64 {
        (self.x_max - self.x_min + 1) as u64
    }

    pub fn height(&self) -> u64 {
        (self.z_max - self.z_min + 1) as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompositorConfig) -> Self {
        Compositor { config }
    }

    /// Runs the whole pipeline. Tiles come back in input order.
    pub fn shift(&self, tiles: &[Tile], x_shift: i32, z_shift: i32) -> Result<Vec<Tile>> {
        if tiles.is_empty() {
            return Err(TilewrapError::EmptyTileSet);
        }
        for tile in tiles {
            tile.validate()?;
        }

        let bbox = BoundingBox::of(tiles)?;
        let cells = bbox.width().saturating_mul(bbox.height());
        if cells > self.config.max_canvas_cells {
            return Err(TilewrapError::CanvasTooLarge {
                cells,
                limit: self.config.max_canvas_cells,
            });
        }
        log(
            format!(
                "Compositing {} tiles on a {}x{} canvas (x {}..={}, z {}..={})",
                tiles.len(),
                bbox.width(),
                bbox.height(),
                bbox.x_min,
                bbox.x_max,
                bbox.z_min,
                bbox.z_max
            ),
            Debug,
        );

        let mut canvas = ColorGrid::new(bbox.width() as usize, bbox.height() as usize);
        for tile in tiles {
            let (row, col) = window_origin(tile, &bbox);
            blit(&mut canvas, &upsample(&tile.colors, tile.scale_factor() as usize), row, col);
        }

        let shifted = roll(&canvas, i64::from(x_shift), i64::from(z_shift));

        tiles
            .iter()
            .map(|tile| {
                let scale_factor = tile.scale_factor();
                if scale_factor != 2 {
                    log(
                        format!(
                            "Tile at ({}, {}) has scale factor {}, decimation is lossy",
                            tile.x_center, tile.z_center, scale_factor
                        ),
                        Warning,
                    );
                }

                let (row, col) = window_origin(tile, &bbox);
                let footprint = tile.footprint();
                let window = crop(
                    &shifted,
                    row,
                    col,
                    footprint.height() as usize,
                    footprint.width() as usize,
                );
                let colors = fit(
                    &decimate(&window),
                    tile.width as usize,
                    tile.height as usize,
                );

                Ok(Tile {
                    scale: tile.scale,
                    width: tile.width,
                    height: tile.height,
                    x_center: tile
                        .x_center
                        .checked_sub(x_shift)
                        .ok_or(TilewrapError::CoordinateOverflow)?,
                    z_center: tile
                        .z_center
                        .checked_sub(z_shift)
                        .ok_or(TilewrapError::CoordinateOverflow)?,
                    colors,
                })
            })
            .collect()
    }
}

/// Runs the pipeline with the default configuration.
pub fn shift_tiles(tiles: &[Tile], x_shift: i32, z_shift: i32) -> Result<Vec<Tile>> {
    Compositor::new().shift(tiles, x_shift, z_shift)
}

/// Canvas row and column of a tile's top-left corner.
fn window_origin(tile: &Tile, bbox: &BoundingBox) -> (usize, usize) {
    let footprint = tile.footprint();
    (
        (footprint.top - bbox.z_min) as usize,
        (footprint.left - bbox.x_min) as usize,
    )
}

/// Nearest-neighbour upsampling: every cell becomes a `factor x factor` block.
pub fn upsample(grid: &ColorGrid, factor: usize) -> ColorGrid {
    let mut out = ColorGrid::new(grid.width() * factor, grid.height() * factor);
    for row in 0..grid.height() {
        let wide: Vec<u8> = grid
            .row(row)
            .iter()
            .flat_map(|&value| std::iter::repeat(value).take(factor))
            .collect();
        for rep in 0..factor {
            out.row_mut(row * factor + rep).copy_from_slice(&wide);
        }
    }
    out
}

/// Copies `src` into `canvas` with its top-left corner at (`row`, `col`).
pub fn blit(canvas: &mut ColorGrid, src: &ColorGrid, row: usize, col: usize) {
    for r in 0..src.height() {
        canvas.row_mut(row + r)[col..col + src.width()].copy_from_slice(src.row(r));
    }
}

/// Circular shift: the cell at (r, c) moves to
/// ((r + z_shift) mod height, (c + x_shift) mod width).
pub fn roll(grid: &ColorGrid, x_shift: i64, z_shift: i64) -> ColorGrid {
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 {
        return grid.clone();
    }
    let dx = x_shift.rem_euclid(width as i64) as usize;
    let dz = z_shift.rem_euclid(height as i64) as usize;

    let mut out = ColorGrid::new(width, height);
    for row in 0..height {
        let src = grid.row(row);
        let dst = out.row_mut((row + dz) % height);
        dst[dx..].copy_from_slice(&src[..width - dx]);
        dst[..dx].copy_from_slice(&src[width - dx..]);
    }
    out
}

pub fn crop(grid: &ColorGrid, row: usize, col: usize, height: usize, width: usize) -> ColorGrid {
    let mut out = ColorGrid::new(width, height);
    for r in 0..height {
        out.row_mut(r)
            .copy_from_slice(&grid.row(row + r)[col..col + width]);
    }
    out
}

/// Drops rows and columns 0, 2, 4, ... and keeps 1, 3, 5, ...
pub fn decimate(grid: &ColorGrid) -> ColorGrid {
    let (width, height) = (grid.width() / 2, grid.height() / 2);
    let mut out = ColorGrid::new(width, height);
    for r in 0..height {
        let src = grid.row(2 * r + 1);
        for (c, cell) in out.row_mut(r).iter_mut().enumerate() {
            *cell = src[2 * c + 1];
        }
    }
    out
}

/// Top-left anchored crop or zero-pad to exactly `width x height`.
pub fn fit(grid: &ColorGrid, width: usize, height: usize) -> ColorGrid {
    if grid.width() == width && grid.height() == height {
        return grid.clone();
    }
    let mut out = ColorGrid::new(width, height);
    let copy_width = width.min(grid.width());
    for r in 0..height.min(grid.height()) {
        out.row_mut(r)[..copy_width].copy_from_slice(&grid.row(r)[..copy_width]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn tile(scale: i8, x_center: i32, z_center: i32, colors: ColorGrid) -> Tile {
        Tile {
            scale,
            x_center,
            z_center,
            width: colors.width() as i16,
            height: colors.height() as i16,
            colors,
        }
    }

    fn patterned(width: usize, height: usize, seed: u8) -> ColorGrid {
        let cells = (0..width * height)
            .map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed))
            .collect();
        ColorGrid::from_vec(width, height, cells).unwrap()
    }

    #[test]
    fn test_bounding_box_union() {
        let tiles = vec![
            tile(0, 0, 0, ColorGrid::new(128, 128)),
            tile(0, 128, 256, ColorGrid::new(128, 128)),
        ];
        assert_eq!(
            BoundingBox::of(&tiles).unwrap(),
            BoundingBox {
                x_min: -64,
                x_max: 191,
                z_min: -64,
                z_max: 319
            }
        );
    }

    #[test]
    fn test_empty_tile_set() {
        assert_matches!(BoundingBox::of(&[]), Err(TilewrapError::EmptyTileSet));
        assert_matches!(shift_tiles(&[], 1, 1), Err(TilewrapError::EmptyTileSet));
    }

    #[test]
    fn test_upsample_blocks() {
        let grid = ColorGrid::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let up = upsample(&grid, 2);
        assert_eq!(up.row(0), &[1, 1, 2, 2]);
        assert_eq!(up.row(1), &[1, 1, 2, 2]);
        assert_eq!(up.row(2), &[3, 3, 4, 4]);
        assert_eq!(up.row(3), &[3, 3, 4, 4]);
        assert_eq!(upsample(&grid, 1), grid);
    }

    #[test]
    fn test_roll_wraps_both_axes() {
        let grid = ColorGrid::from_rows(&[&[1, 2, 3], &[4, 5, 6]]).unwrap();
        let rolled = roll(&grid, 1, 0);
        assert_eq!(rolled.row(0), &[3, 1, 2]);
        assert_eq!(rolled.row(1), &[6, 4, 5]);

        let rolled = roll(&grid, -1, 1);
        assert_eq!(rolled.row(0), &[5, 6, 4]);
        assert_eq!(rolled.row(1), &[2, 3, 1]);

        assert_eq!(roll(&grid, 3, 2), grid);
        assert_eq!(roll(&grid, -300, 8), grid);
    }

    #[test]
    fn test_decimate_keeps_odd_indices() {
        let grid = ColorGrid::from_rows(&[
            &[0, 1, 2, 3],
            &[10, 11, 12, 13],
            &[20, 21, 22, 23],
            &[30, 31, 32, 33],
        ])
        .unwrap();
        let small = decimate(&grid);
        assert_eq!(small.row(0), &[11, 13]);
        assert_eq!(small.row(1), &[31, 33]);
    }

    #[test]
    fn test_fit_pads_and_crops() {
        let grid = ColorGrid::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let padded = fit(&grid, 3, 3);
        assert_eq!(padded.as_slice(), &[1, 2, 0, 3, 4, 0, 0, 0, 0]);
        let cropped = fit(&grid, 1, 1);
        assert_eq!(cropped.as_slice(), &[1]);
    }

    #[test]
    fn test_zero_shift_is_identity() {
        let tiles = vec![
            tile(1, 0, 0, patterned(4, 4, 1)),
            tile(1, 8, 0, patterned(4, 4, 2)),
            tile(1, 0, 8, patterned(4, 4, 3)),
        ];
        let shifted = shift_tiles(&tiles, 0, 0).unwrap();
        assert_eq!(shifted, tiles);
    }

    #[test]
    fn test_scale_one_round_trips_exactly() {
        let colors = ColorGrid::from_rows(&[&[7, 8], &[9, 10]]).unwrap();
        let tiles = vec![tile(1, 0, 0, colors.clone())];
        let shifted = shift_tiles(&tiles, 0, 0).unwrap();
        assert_eq!(shifted[0].colors, colors);
    }

    #[test]
    fn test_centers_move_against_shift() {
        let tiles = vec![
            tile(1, 0, 0, patterned(4, 4, 1)),
            tile(1, -1000, 64, patterned(4, 4, 2)),
        ];
        let shifted = shift_tiles(&tiles, 5, -3).unwrap();
        assert_eq!((shifted[0].x_center, shifted[0].z_center), (-5, 3));
        assert_eq!((shifted[1].x_center, shifted[1].z_center), (-1005, 67));
    }

    #[test]
    fn test_full_period_wrap_is_identity() {
        // Two scale-1 tiles side by side: the union is 16 columns wide.
        let tiles = vec![
            tile(1, 0, 0, patterned(4, 4, 1)),
            tile(1, 8, 0, patterned(4, 4, 9)),
        ];
        let width = BoundingBox::of(&tiles).unwrap().width() as i32;
        assert_eq!(width, 16);

        let wrapped = shift_tiles(&tiles, width, 0).unwrap();
        let still = shift_tiles(&tiles, 0, 0).unwrap();
        for (a, b) in wrapped.iter().zip(&still) {
            assert_eq!(a.colors, b.colors);
        }
    }

    #[test]
    fn test_shift_by_one_tile_swaps_content() {
        // Scale-1 tiles 8 world units wide; shifting by 8 moves each tile's
        // content into its neighbour's window.
        let left = patterned(4, 4, 1);
        let right = patterned(4, 4, 50);
        let tiles = vec![tile(1, 0, 0, left.clone()), tile(1, 8, 0, right.clone())];

        let shifted = shift_tiles(&tiles, 8, 0).unwrap();
        assert_eq!(shifted[0].colors, right);
        assert_eq!(shifted[1].colors, left);
    }

    #[test]
    fn test_shift_by_one_pixel() {
        // One pixel at scale 1 is two canvas cells.
        let colors = ColorGrid::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let tiles = vec![tile(1, 0, 0, colors)];
        let shifted = shift_tiles(&tiles, 2, 0).unwrap();
        assert_eq!(shifted[0].colors.as_slice(), &[2, 1, 4, 3]);
    }

    #[test]
    fn test_later_tiles_overwrite_overlaps() {
        let under = ColorGrid::from_vec(2, 2, vec![1; 4]).unwrap();
        let over = ColorGrid::from_vec(2, 2, vec![2; 4]).unwrap();
        let tiles = vec![tile(1, 0, 0, under), tile(1, 0, 0, over)];
        let shifted = shift_tiles(&tiles, 0, 0).unwrap();
        assert_eq!(shifted[0].colors.as_slice(), &[2; 4]);
        assert_eq!(shifted[1].colors.as_slice(), &[2; 4]);
    }

    #[test]
    fn test_other_scales_keep_dimensions() {
        let tiles = vec![tile(0, 0, 0, patterned(4, 4, 1))];
        let shifted = shift_tiles(&tiles, 0, 0).unwrap();
        let colors = &shifted[0].colors;
        assert_eq!((colors.width(), colors.height()), (4, 4));
        // Only the top-left 2x2 is populated at scale 0.
        let source = &tiles[0].colors;
        assert_eq!(colors.row(0), &[source.get(1, 1), source.get(1, 3), 0, 0]);
        assert_eq!(colors.row(2), &[0, 0, 0, 0]);

        // Scale 2: the decimated 4x4 grid is cropped to its top-left 2x2,
        // which all comes from the first source pixel.
        let tiles = vec![tile(2, 0, 0, patterned(2, 2, 1))];
        let shifted = shift_tiles(&tiles, 0, 0).unwrap();
        let first = tiles[0].colors.get(0, 0);
        assert_eq!(shifted[0].colors.as_slice(), &[first; 4]);
    }

    #[test]
    fn test_canvas_limit() {
        let tiles = vec![
            tile(1, 0, 0, patterned(4, 4, 1)),
            tile(1, 100_000, 100_000, patterned(4, 4, 2)),
        ];
        let compositor = Compositor::with_config(CompositorConfig {
            max_canvas_cells: 1_000_000,
        });
        assert_matches!(
            compositor.shift(&tiles, 0, 0),
            Err(TilewrapError::CanvasTooLarge { limit: 1_000_000, .. })
        );
    }

    #[test]
    fn test_center_overflow() {
        let tiles = vec![tile(1, i32::MIN + 4, 0, patterned(4, 4, 1))];
        assert_matches!(
            shift_tiles(&tiles, 8, 0),
            Err(TilewrapError::CoordinateOverflow)
        );
    }

    #[test]
    fn test_invalid_tile_is_rejected() {
        let mut bad = tile(1, 0, 0, patterned(4, 4, 1));
        bad.width = 5;
        assert_matches!(
            shift_tiles(&[bad], 0, 0),
            Err(TilewrapError::InvalidTileGeometry(_))
        );
    }
}
