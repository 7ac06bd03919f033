pub mod error;
pub mod types;

pub use error::{MalformedReason, TilewrapError};
pub use types::{Result, TagKind};
