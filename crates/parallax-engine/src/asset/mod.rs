//! Asset probing.
//!
//! The engine never decodes pixels; it only needs to know at scene construction
//! whether a layer's asset is usable. Layers whose probe fails render transparent.

mod error;
mod probe;

pub use error::AssetError;
pub use probe::{AssetInfo, AssetProbe, ImageFileProbe};
