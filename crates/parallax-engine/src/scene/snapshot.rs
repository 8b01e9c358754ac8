use super::{ObjectId, ObjectKind, Slot, ZIndex};
use crate::coords::Vec3;
use crate::paint::Color;
use crate::signal::Value;

/// Numeric state of one object for one frame. Unbound slots keep these defaults.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
    pub color: Color,
    pub intensity: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl RenderState {
    /// Writes `value` into `slot`. Returns `false` (and changes nothing) when the
    /// value's kind does not fit the slot.
    pub fn set(&mut self, slot: Slot, value: Value) -> bool {
        match (slot, value) {
            (Slot::Position, Value::Vec3(v)) => self.position = v,
            (Slot::Rotation, Value::Vec3(v)) => self.rotation = v,
            (Slot::Scale, Value::Vec3(v)) => self.scale = v,
            (Slot::Scale, Value::Scalar(s)) => self.scale = Vec3::splat(s),
            (Slot::Opacity, Value::Scalar(s)) => self.opacity = s,
            (Slot::Color, Value::Color(c)) => self.color = c,
            (Slot::Intensity, Value::Scalar(s)) => self.intensity = s,
            _ => return false,
        }
        true
    }

    pub fn get(&self, slot: Slot) -> Value {
        match slot {
            Slot::Position => Value::Vec3(self.position),
            Slot::Rotation => Value::Vec3(self.rotation),
            Slot::Scale => Value::Vec3(self.scale),
            Slot::Opacity => Value::Scalar(self.opacity),
            Slot::Color => Value::Color(self.color),
            Slot::Intensity => Value::Scalar(self.intensity),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectFrame {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub z: ZIndex,
    pub state: RenderState,
}

/// Read-only view of the whole scene for one frame, objects back-to-front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    pub(crate) frame_index: u64,
    pub(crate) faults: usize,
    pub(crate) objects: Vec<ObjectFrame>,
    /// `ObjectId` index → position in `objects`.
    pub(crate) slots_by_id: Vec<usize>,
}

impl FrameSnapshot {
    /// Number of completed ticks; 0 before the first one.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Derived properties that failed on the last tick.
    #[inline]
    pub fn faults(&self) -> usize {
        self.faults
    }

    #[inline]
    pub fn objects(&self) -> &[ObjectFrame] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&ObjectFrame> {
        self.slots_by_id.get(id.0).map(|&i| &self.objects[i])
    }

    pub fn state(&self, id: ObjectId) -> Option<&RenderState> {
        self.get(id).map(|f| &f.state)
    }

    /// Clear colour for the frame: the background's colour, if there is one.
    pub fn background(&self) -> Option<Color> {
        self.objects
            .iter()
            .find(|o| o.kind == ObjectKind::Background)
            .map(|o| o.state.color)
    }

    pub(crate) fn state_mut(&mut self, id: ObjectId) -> Option<&mut RenderState> {
        let i = *self.slots_by_id.get(id.0)?;
        Some(&mut self.objects[i].state)
    }
}
