//! Scene composition.
//!
//! Responsibilities:
//! - declare the fixed set of renderable objects and bind their slots
//! - run per-frame derivation and produce a renderer-facing snapshot
//! - keep a deterministic paint order (z-index + declaration order)

mod composer;
mod error;
mod instance;
mod key;
mod object;
mod snapshot;
mod stars;
mod z_index;

pub use composer::{SceneComposer, SCROLL_MAX};
pub use error::SceneError;
pub use instance::Scene;
pub use key::SortKey;
pub use object::{Binding, Content, ObjectId, ObjectKind, RenderableObject, Slot};
pub use snapshot::{FrameSnapshot, ObjectFrame, RenderState};
pub use stars::StarField;
pub use z_index::ZIndex;
