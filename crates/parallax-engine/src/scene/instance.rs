use super::key::paint_order;
use super::{Binding, FrameSnapshot, ObjectFrame, ObjectId, RenderState, RenderableObject, Slot, SortKey, StarField};
use crate::derive::DerivationGraph;
use crate::signal::{SignalSnapshot, Value};

/// A composed scene: fixed objects, their derivations and the star field's motion.
///
/// The only per-frame output is the [`FrameSnapshot`], refreshed by [`Scene::update`].
pub struct Scene {
    objects: Vec<RenderableObject>,
    graph: DerivationGraph,
    stars: StarField,
    frame: FrameSnapshot,
}

impl Scene {
    /// Lays out the snapshot and evaluates every derivation once against `signals`,
    /// so frame 0 already carries derived values. Nothing is advanced.
    pub(crate) fn new(
        objects: Vec<RenderableObject>,
        graph: DerivationGraph,
        stars: StarField,
        signals: &SignalSnapshot,
    ) -> Self {
        let keys: Vec<SortKey> = objects.iter().map(|o| o.key).collect();
        let order = paint_order(&keys);

        let mut slots_by_id = vec![0; objects.len()];
        let mut frames = Vec::with_capacity(objects.len());
        for (pos, &i) in order.iter().enumerate() {
            let object = &objects[i];
            slots_by_id[i] = pos;

            let mut state = RenderState::default();
            for &(slot, binding) in &object.bindings {
                let initial = match binding {
                    Binding::Constant(v) => Some(v),
                    // Transparent and dormant until the property first evaluates.
                    Binding::Derived(_) => dormant(slot),
                    Binding::Autonomous => None,
                };
                if let Some(v) = initial {
                    let applied = state.set(slot, v);
                    debug_assert!(applied, "{}: {v:?} does not fit {slot:?}", object.name);
                }
            }
            frames.push(ObjectFrame {
                id: object.id,
                kind: object.kind,
                z: object.key.z,
                state,
            });
        }

        let mut scene = Self {
            objects,
            graph,
            stars,
            frame: FrameSnapshot {
                frame_index: 0,
                faults: 0,
                objects: frames,
                slots_by_id,
            },
        };
        scene.frame.faults = scene.graph.evaluate_all(signals);
        scene.copy_bound_values();
        scene
    }

    /// Objects in declaration order.
    #[inline]
    pub fn objects(&self) -> &[RenderableObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&RenderableObject> {
        self.objects.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&RenderableObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    #[inline]
    pub fn graph(&self) -> &DerivationGraph {
        &self.graph
    }

    #[inline]
    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    /// Latest derived value of a named property.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.graph.value_by_name(name)
    }

    #[inline]
    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.frame
    }

    /// Runs one tick: evaluates every derivation against `signals`, advances the
    /// star field, and copies bound values into the frame snapshot.
    ///
    /// A slot whose property failed keeps last tick's value.
    pub fn update(&mut self, signals: &SignalSnapshot) -> &FrameSnapshot {
        let faults = self.graph.evaluate_all(signals);
        self.stars.advance();
        self.copy_bound_values();

        let frame = &mut self.frame;
        frame.faults = faults;
        frame.frame_index += 1;
        log::trace!("frame {} updated ({faults} faults)", frame.frame_index);
        frame
    }

    fn copy_bound_values(&mut self) {
        let Self {
            objects,
            graph,
            stars,
            frame,
        } = self;

        for object in objects.iter() {
            let Some(state) = frame.state_mut(object.id) else {
                continue;
            };
            for &(slot, binding) in &object.bindings {
                let value = match binding {
                    // Written once at construction.
                    Binding::Constant(_) => continue,
                    Binding::Derived(p) => graph.value(p),
                    Binding::Autonomous => star_motion(stars, slot),
                };
                if let Some(v) = value {
                    let applied = state.set(slot, v);
                    debug_assert!(applied, "{}: {v:?} does not fit {slot:?}", object.name);
                }
            }
        }
    }
}

fn dormant(slot: Slot) -> Option<Value> {
    match slot {
        Slot::Opacity | Slot::Intensity => Some(Value::Scalar(0.0)),
        _ => None,
    }
}

fn star_motion(stars: &StarField, slot: Slot) -> Option<Value> {
    match slot {
        Slot::Rotation => Some(Value::Vec3(stars.rotation())),
        Slot::Scale => Some(Value::Vec3(stars.scale())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{EvalError, GraphBuilder};
    use crate::scene::{Content, ObjectKind, ZIndex};
    use crate::signal::{Smoother, Smoothing, SCROLL_TOP};

    fn smoother(scroll: f32) -> Smoother {
        let mut s = Smoother::new();
        s.register(SCROLL_TOP, Value::Scalar(scroll), Smoothing::Immediate).unwrap();
        s
    }

    /// One plane whose opacity fails until scroll passes 100, and one lit by a
    /// property that always evaluates.
    fn scene(signals: &Smoother) -> Scene {
        let mut b = GraphBuilder::new();
        b.map("flaky", SCROLL_TOP.as_str(), |v| match v.as_scalar() {
            Some(t) if t >= 100.0 => Ok(Value::Scalar(0.75)),
            _ => Err(EvalError::Failed("not yet".into())),
        })
        .unwrap();
        b.map("steady", SCROLL_TOP.as_str(), |_| Ok(Value::Scalar(0.5))).unwrap();
        let graph = b.build(signals).unwrap();

        let plane = |i: usize, name: &str, slot: Slot, prop: &str| RenderableObject {
            id: ObjectId(i),
            name: name.into(),
            kind: ObjectKind::ImagePlane,
            key: SortKey::new(ZIndex::IMAGES, i as u32),
            content: Content::None,
            bindings: vec![(slot, Binding::Derived(graph.id_of(prop).unwrap()))],
        };
        let objects = vec![
            plane(0, "flaky", Slot::Opacity, "flaky"),
            plane(1, "steady", Slot::Intensity, "steady"),
        ];
        Scene::new(objects, graph, StarField::new(0, 1.0, 0), &signals.snapshot())
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn frame_zero_carries_derived_values() {
        let scene = scene(&smoother(0.0));
        let snap = scene.snapshot();
        assert_eq!(snap.frame_index(), 0);
        assert_eq!(snap.state(ObjectId(1)).unwrap().intensity, 0.5);
    }

    #[test]
    fn never_evaluated_slots_stay_transparent() {
        let mut signals = smoother(0.0);
        let mut scene = scene(&signals);
        assert_eq!(scene.snapshot().faults(), 1);
        assert_eq!(scene.snapshot().state(ObjectId(0)).unwrap().opacity, 0.0);

        scene.update(&signals.snapshot());
        assert_eq!(scene.snapshot().state(ObjectId(0)).unwrap().opacity, 0.0);

        signals.jump("scrollTop", Value::Scalar(150.0)).unwrap();
        scene.update(&signals.snapshot());
        assert_eq!(scene.snapshot().state(ObjectId(0)).unwrap().opacity, 0.75);
        assert_eq!(scene.snapshot().faults(), 0);
    }
}
