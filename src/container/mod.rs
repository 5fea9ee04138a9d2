//! Pure mappings from runtime-reported container fields to metric values.
//!
//! - [`state`] turns a lifecycle state string into an ordinal in `(0, 1]`.
//! - [`image`] derives an optional version label from an image reference.
mod image;
mod state;

pub use image::{VersionExtractor, extract_version};
pub use state::{ContainerState, UNKNOWN_ORDINAL, state_ordinal};
