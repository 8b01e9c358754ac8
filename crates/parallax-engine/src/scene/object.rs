use std::path::PathBuf;

use super::SortKey;
use crate::derive::PropertyId;
use crate::signal::Value;

/// Stable handle to a renderable object; its index in declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Background,
    StarField,
    ImagePlane,
    MessagePlane,
    TextSprite,
    Light,
    PostProcess,
}

/// Property slots a renderer reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Slot {
    Position,
    /// Euler angles in radians.
    Rotation,
    Scale,
    Opacity,
    Color,
    Intensity,
}

/// Where a slot's value comes from. Fixed at construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Binding {
    Constant(Value),
    Derived(PropertyId),
    /// Owned motion of the object itself (star field rotation and scale).
    Autonomous,
}

/// What the renderer has to load for an object, if anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    None,
    Image {
        path: PathBuf,
        /// Result of the construction-time probe. Unavailable images have opacity 0.
        available: bool,
    },
    Text {
        text: String,
        font_size: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableObject {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) kind: ObjectKind,
    pub(crate) key: SortKey,
    pub(crate) content: Content,
    pub(crate) bindings: Vec<(Slot, Binding)>,
}

impl RenderableObject {
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn sort_key(&self) -> SortKey {
        self.key
    }

    #[inline]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[inline]
    pub fn bindings(&self) -> &[(Slot, Binding)] {
        &self.bindings
    }

    pub fn binding(&self, slot: Slot) -> Option<Binding> {
        self.bindings
            .iter()
            .find_map(|&(s, b)| (s == slot).then_some(b))
    }
}
