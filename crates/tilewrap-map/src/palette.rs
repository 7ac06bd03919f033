//! Fixed RGB palette used to render map previews.
//!
//! Every base color expands into four shades, so palette index `4 * i + s`
//! is shade `s` of base color `i`. Unused indices stay black.

mod base_colors {
    include!(concat!(env!("OUT_DIR"), "/base_colors.rs"));
}
pub use base_colors::BASE_COLORS;

pub const PALETTE_ENTRIES: usize = 256;

/// Per-channel shade multipliers, numerator over 255, in palette order.
pub const SHADE_MULTIPLIERS: [u32; 4] = [180, 220, 255, 135];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    entries: [[u8; 3]; PALETTE_ENTRIES],
}

impl PaletteTable {
    /// Builds the table from `base` colors. Colors past the 64th are ignored
    /// since their shades would not fit.
    pub fn derive(base: &[[u8; 3]]) -> Self {
        let mut entries = [[0u8; 3]; PALETTE_ENTRIES];
        let shades = base
            .iter()
            .flat_map(|color| SHADE_MULTIPLIERS.iter().map(move |&m| shade(*color, m)));
        for (slot, rgb) in entries.iter_mut().zip(shades) {
            *slot = rgb;
        }
        PaletteTable { entries }
    }

    /// The table derived from the compiled-in base colors.
    pub fn standard() -> Self {
        Self::derive(BASE_COLORS)
    }

    pub fn get(&self, index: u8) -> [u8; 3] {
        self.entries[index as usize]
    }

    /// Flat `r, g, b, r, g, b, ...` form, 768 bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.entries.iter().flatten().copied().collect()
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn shade(rgb: [u8; 3], multiplier: u32) -> [u8; 3] {
    // f64::round rounds halves away from zero.
    rgb.map(|channel| (f64::from(channel) * f64::from(multiplier) / 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_color_count() {
        assert_eq!(BASE_COLORS.len(), 37);
        assert_eq!(BASE_COLORS[1], [125, 176, 55]);
    }

    #[test]
    fn test_standard_shades() {
        let palette = PaletteTable::standard();
        // grass
        assert_eq!(palette.get(4), [88, 124, 39]);
        assert_eq!(palette.get(5), [108, 152, 47]);
        assert_eq!(palette.get(6), [125, 176, 55]);
        assert_eq!(palette.get(7), [66, 93, 29]);
        // fire
        assert_eq!(palette.get(16), [178, 0, 0]);
        assert_eq!(palette.get(19), [133, 0, 0]);
        // last base color
        assert_eq!(palette.get(144), [89, 59, 34]);
        assert_eq!(palette.get(147), [67, 44, 25]);
    }

    #[test]
    fn test_padding_is_black() {
        let palette = PaletteTable::standard();
        for index in 148..=255u8 {
            assert_eq!(palette.get(index), [0, 0, 0]);
        }
    }

    #[test]
    fn test_flat_bytes() {
        let bytes = PaletteTable::standard().to_rgb_bytes();
        assert_eq!(bytes.len(), 768);
        assert_eq!(&bytes[18..21], &[125, 176, 55]);
    }

    #[test]
    fn test_derive_is_pure() {
        let base = [[255, 255, 255]];
        let palette = PaletteTable::derive(&base);
        assert_eq!(palette.get(0), [180, 180, 180]);
        assert_eq!(palette.get(1), [220, 220, 220]);
        assert_eq!(palette.get(2), [255, 255, 255]);
        assert_eq!(palette.get(3), [135, 135, 135]);
        assert_eq!(palette.get(4), [0, 0, 0]);
        assert_eq!(palette, PaletteTable::derive(&base));
    }

    #[test]
    fn test_derive_truncates_oversized_base() {
        let base = vec![[10, 20, 30]; 80];
        let palette = PaletteTable::derive(&base);
        assert_eq!(palette.get(255), [10, 20, 30].map(|c: u8| {
            (f64::from(c) * 135.0 / 255.0).round() as u8
        }));
    }
}
