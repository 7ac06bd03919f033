use thiserror::Error;

use crate::types::TagKind;

/// Why a byte buffer could not be decoded as a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("unknown tag kind {0}")]
    UnknownKind(u8),

    #[error("unknown list element kind {0}")]
    InvalidListKind(u8),

    #[error("need {needed} bytes, only {available} left")]
    Truncated { needed: usize, available: usize },

    #[error("negative length prefix {0}")]
    NegativeLength(i32),

    #[error("{0} trailing bytes after the root tag")]
    TrailingBytes(usize),

    #[error("list of End declares {0} elements")]
    EndListNotEmpty(usize),

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("root tag is not a compound")]
    NotCompound,
}

#[derive(Debug, Error)]
pub enum TilewrapError {
    /// Decode failure. Fatal to the whole buffer.
    #[error("Malformed tag at byte {offset}: {reason}")]
    MalformedTag {
        offset: usize,
        reason: MalformedReason,
    },

    #[error("Missing named child: {path}")]
    MissingNamedChild { path: String },

    #[error("Child {path} has kind {found}, expected {expected}")]
    UnexpectedKind {
        path: String,
        expected: TagKind,
        found: TagKind,
    },

    #[error("No tiles to composite")]
    EmptyTileSet,

    #[error("List declared as {expected} holds a {found} element")]
    HeterogeneousList { expected: TagKind, found: TagKind },

    #[error("End tag found before the last entry of a compound")]
    MisplacedEnd,

    #[error("{what} of length {len} does not fit its length prefix")]
    LengthOverflow { what: &'static str, len: usize },

    #[error("Invalid tile geometry: {0}")]
    InvalidTileGeometry(String),

    #[error("Canvas of {cells} cells exceeds the limit of {limit}")]
    CanvasTooLarge { cells: u64, limit: u64 },

    #[error("Shifted center coordinate overflows a 32-bit integer")]
    CoordinateOverflow,

    #[error("Input path does not name a file: {path}")]
    InvalidInputPath { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(String),
}

impl TilewrapError {
    pub fn malformed(offset: usize, reason: MalformedReason) -> Self {
        TilewrapError::MalformedTag { offset, reason }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        TilewrapError::MissingNamedChild { path: path.into() }
    }
}
