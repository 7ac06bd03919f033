use tilewrap_common::Result;
use tilewrap_logger::log;
use tilewrap_logger::LogSeverity::Debug;
use tilewrap_nbt::{encode, NamedTag};

use crate::compositor::Compositor;
use crate::tile::Tile;

/// One shifted map: the patched document, its tile view and the encoded bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftedMap {
    pub root: NamedTag,
    pub tile: Tile,
    pub bytes: Vec<u8>,
}

/// Extracts a tile from every document, shifts them jointly and writes the
/// results back into copies of the documents. Any failure aborts the batch.
pub fn shift_documents(
    compositor: &Compositor,
    roots: &[NamedTag],
    x_shift: i32,
    z_shift: i32,
) -> Result<Vec<ShiftedMap>> {
    let tiles = roots
        .iter()
        .map(Tile::from_root)
        .collect::<Result<Vec<_>>>()?;

    let shifted = compositor.shift(&tiles, x_shift, z_shift)?;

    roots
        .iter()
        .zip(shifted)
        .map(|(root, tile)| {
            let root = tile.apply_to(root)?;
            let bytes = encode(&root)?;
            log(
                format!(
                    "Encoded tile now centered at ({}, {}), {} bytes",
                    tile.x_center,
                    tile.z_center,
                    bytes.len()
                ),
                Debug,
            );
            Ok(ShiftedMap { root, tile, bytes })
        })
        .collect()
}
