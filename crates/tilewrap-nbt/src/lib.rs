//! Tag tree model, binary codec and gzip file framing.

pub mod codec;
pub mod file;
pub mod tag;

pub use codec::{decode, decode_at, encode};
pub use file::{save_encoded, NbtFile};
pub use tag::{NamedTag, Tag, TagList};
pub use tilewrap_common::TagKind;
