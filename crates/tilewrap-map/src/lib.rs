//! Map tile view, compositing and wrap-around shifting, palette and previews.

pub mod blank;
pub mod compositor;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod tile;

pub use blank::{blank_tile, BlankTileOptions};
pub use compositor::{shift_tiles, BoundingBox, Compositor, CompositorConfig};
pub use palette::PaletteTable;
pub use pipeline::{shift_documents, ShiftedMap};
pub use render::render_rgb;
pub use tile::{ColorGrid, Footprint, Tile};
