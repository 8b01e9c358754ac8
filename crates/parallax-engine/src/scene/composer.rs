use std::path::Path;

use super::{Binding, Content, ObjectId, ObjectKind, RenderableObject, Scene, SceneError, Slot, SortKey, StarField, ZIndex};
use crate::asset::AssetProbe;
use crate::constants::*;
use crate::coords::{Vec2, Vec3};
use crate::derive::curves::{self, BlinkEnvelope, PulseEnvelope};
use crate::derive::{EvalError, GraphBuilder, Inputs};
use crate::layout::SceneConfig;
use crate::paint::Color;
use crate::signal::{Smoother, Value, ValueKind, ELAPSED, POINTER, SCROLL_TOP, VIEWPORT_HEIGHT};

/// Name of the derived visible scroll range.
pub const SCROLL_MAX: &str = "scrollMax";

/// Declares the fixed object list and wires every slot to a constant, a derived
/// property or the object's own motion.
///
/// Topology depends only on the layout dataset: one background, one star field,
/// one light, one post-process pass, two text sprites, and one plane per layout
/// entry. Nothing is added or removed afterwards.
pub struct SceneComposer<'a> {
    config: &'a SceneConfig,
    probe: &'a dyn AssetProbe,
    graph: GraphBuilder,
    objects: Vec<RenderableObject>,
}

impl<'a> SceneComposer<'a> {
    pub fn new(config: &'a SceneConfig, probe: &'a dyn AssetProbe) -> Self {
        Self {
            config,
            probe,
            graph: GraphBuilder::new(),
            objects: Vec::new(),
        }
    }

    /// Builds the scene against the signals already registered in `signals`.
    pub fn compose(mut self, signals: &Smoother) -> Result<Scene, SceneError> {
        self.graph.combine(SCROLL_MAX, &[VIEWPORT_HEIGHT.as_str()], |i| {
            Ok(curves::scroll_max(i.scalar(0)?).into())
        })?;

        self.add_light()?;
        self.add_post_process()?;
        self.add_background()?;
        self.add_stars()?;
        self.add_images()?;
        self.add_messages()?;
        self.add_text()?;

        let graph = self.graph.build(signals)?;
        log::debug!(
            "scene composed: {} objects, {} derived properties",
            self.objects.len(),
            graph.len()
        );
        Ok(Scene::new(
            self.objects,
            graph,
            StarField::default(),
            &signals.snapshot(),
        ))
    }

    fn push(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        z: ZIndex,
        content: Content,
        bindings: Vec<(Slot, Binding)>,
    ) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(RenderableObject {
            id,
            name: name.into(),
            kind,
            key: SortKey::new(z, id.0 as u32),
            content,
            bindings,
        });
        id
    }

    fn probe_asset(&self, layer: &str, path: &Path) -> bool {
        match self.probe.probe(path) {
            Ok(info) => {
                log::debug!("{layer}: {} ({}x{})", path.display(), info.width, info.height);
                true
            }
            Err(err) => {
                log::warn!("{layer}: {err}; layer stays transparent");
                false
            }
        }
    }

    fn add_light(&mut self) -> Result<(), SceneError> {
        let position = self.graph.combine("light.position", &[POINTER.as_str()], |i| {
            Ok(curves::spotlight_position(i.vec2(0)?).into())
        })?;

        self.push(
            "spotlight",
            ObjectKind::Light,
            ZIndex::IMAGES,
            Content::None,
            vec![
                (Slot::Position, Binding::Derived(position)),
                (Slot::Intensity, Binding::Constant(Value::Scalar(LIGHT_INTENSITY))),
                (Slot::Color, Binding::Constant(Value::Color(Color::WHITE))),
            ],
        );
        Ok(())
    }

    fn add_post_process(&mut self) -> Result<(), SceneError> {
        let pulse = PulseEnvelope::default();
        let intensity = self.graph.combine(
            "glitch.intensity",
            &[ELAPSED.as_str(), SCROLL_TOP.as_str()],
            move |i| Ok(pulse.sample(i.scalar(0)?, i.scalar(1)?).into()),
        )?;

        self.push(
            "glitch",
            ObjectKind::PostProcess,
            ZIndex::POST,
            Content::None,
            vec![(Slot::Intensity, Binding::Derived(intensity))],
        );
        Ok(())
    }

    fn add_background(&mut self) -> Result<(), SceneError> {
        let ramp = curves::background_ramp().ok_or(SceneError::InvalidColor("background stops"))?;
        let color = self.graph.combine(
            "background.color",
            &[SCROLL_TOP.as_str(), SCROLL_MAX],
            move |i| Ok(curves::background_color(&ramp, i.scalar(0)?, scroll_range(i, 1)?).into()),
        )?;

        self.push(
            "background",
            ObjectKind::Background,
            ZIndex::BACKGROUND,
            Content::None,
            vec![(Slot::Color, Binding::Derived(color))],
        );
        Ok(())
    }

    fn add_stars(&mut self) -> Result<(), SceneError> {
        let color = parse_color(STAR_COLOR)?;
        let position = self.graph.combine("stars.position", &[SCROLL_TOP.as_str()], |i| {
            let base = Vec3::new(0.0, -1.0, 0.0);
            Ok(curves::drift(base, i.scalar(0)?, STAR_DRIFT_DIVISOR).into())
        })?;

        self.push(
            "stars",
            ObjectKind::StarField,
            ZIndex::STARS,
            Content::None,
            vec![
                (Slot::Position, Binding::Derived(position)),
                (Slot::Rotation, Binding::Autonomous),
                (Slot::Scale, Binding::Autonomous),
                (Slot::Color, Binding::Constant(Value::Color(color))),
            ],
        );
        Ok(())
    }

    fn add_images(&mut self) -> Result<(), SceneError> {
        let config = self.config;
        for (n, entry) in config.images.iter().enumerate() {
            let name = format!("image[{n}]");
            let path = config.asset_path(entry);
            let available = self.probe_asset(&name, &path);
            let anchor = entry.anchor();

            let position = self.graph.combine(
                format!("{name}.position"),
                &[POINTER.as_str(), SCROLL_TOP.as_str(), SCROLL_MAX],
                move |i| {
                    let p = curves::parallax_position(anchor, i.vec2(0)?, i.scalar(1)?, scroll_range(i, 2)?);
                    Ok(p.into())
                },
            )?;

            let opacity = if available {
                Binding::Derived(self.graph.combine(
                    format!("{name}.opacity"),
                    &[SCROLL_TOP.as_str()],
                    |i| Ok(curves::fade_in(i.scalar(0)?, IMAGE_FADE_IN_SPAN).into()),
                )?)
            } else {
                Binding::Constant(Value::Scalar(0.0))
            };

            let scale = Vec3::new(entry.scale, entry.scale, 1.0);
            self.push(
                name,
                ObjectKind::ImagePlane,
                ZIndex::IMAGES,
                Content::Image { path, available },
                vec![
                    (Slot::Position, Binding::Derived(position)),
                    (Slot::Opacity, opacity),
                    (Slot::Scale, Binding::Constant(Value::Vec3(scale))),
                ],
            );
        }
        Ok(())
    }

    fn add_messages(&mut self) -> Result<(), SceneError> {
        let config = self.config;
        for (n, entry) in config.messages.iter().enumerate() {
            let name = format!("message[{n}]");
            let path = config.asset_path(entry);
            let available = self.probe_asset(&name, &path);
            let anchor = entry.anchor();

            // Opacity and position both map this one property.
            let y_name = format!("{name}.y");
            self.graph.combine(
                y_name.clone(),
                &[POINTER.as_str(), SCROLL_TOP.as_str(), SCROLL_MAX],
                move |i| {
                    let pointer: Vec2 = i.vec2(0)?;
                    let y = curves::effective_y(anchor, pointer.y, i.scalar(1)?, scroll_range(i, 2)?);
                    Ok(y.into())
                },
            )?;

            let position = self.graph.map(format!("{name}.position"), &y_name, |v| {
                let y = scalar(v)?;
                Ok(Vec3::new(0.0, y, curves::message_depth(y)).into())
            })?;

            let opacity = if available {
                Binding::Derived(self.graph.map(format!("{name}.opacity"), &y_name, |v| {
                    Ok(curves::visibility(scalar(v)?, MESSAGE_VISIBILITY_MAX).into())
                })?)
            } else {
                Binding::Constant(Value::Scalar(0.0))
            };

            let scale = Vec3::new(entry.scale, entry.scale, 1.0);
            self.push(
                name,
                ObjectKind::MessagePlane,
                ZIndex::MESSAGES,
                Content::Image { path, available },
                vec![
                    (Slot::Position, Binding::Derived(position)),
                    (Slot::Opacity, opacity),
                    (Slot::Scale, Binding::Constant(Value::Vec3(scale))),
                ],
            );
        }
        Ok(())
    }

    fn add_text(&mut self) -> Result<(), SceneError> {
        let title_opacity = self.graph.combine("title.opacity", &[SCROLL_TOP.as_str()], |i| {
            Ok(curves::fade_out(i.scalar(0)?, TITLE_FADE_OUT_SPAN).into())
        })?;
        let title_position = self.graph.combine("title.position", &[SCROLL_TOP.as_str()], |i| {
            Ok(curves::drift(Vec3::new(0.0, -1.0, 0.0), i.scalar(0)?, TEXT_DRIFT_DIVISOR).into())
        })?;

        self.push(
            "title",
            ObjectKind::TextSprite,
            ZIndex::TEXT,
            Content::Text {
                text: TITLE_TEXT.to_string(),
                font_size: TITLE_FONT_SIZE,
            },
            vec![
                (Slot::Position, Binding::Derived(title_position)),
                (Slot::Opacity, Binding::Derived(title_opacity)),
                (Slot::Color, Binding::Constant(Value::Color(Color::WHITE))),
            ],
        );

        let blink = BlinkEnvelope::default();
        let hint_color = parse_color(HINT_COLOR)?;
        let hint_opacity = self.graph.combine(
            "hint.opacity",
            &[ELAPSED.as_str(), SCROLL_TOP.as_str()],
            move |i| Ok(blink.sample(i.scalar(0)?, i.scalar(1)?).into()),
        )?;
        let hint_position = self.graph.combine("hint.position", &[SCROLL_TOP.as_str()], |i| {
            Ok(curves::drift(Vec3::new(3.0, -3.0, 0.0), i.scalar(0)?, TEXT_DRIFT_DIVISOR).into())
        })?;

        self.push(
            "hint",
            ObjectKind::TextSprite,
            ZIndex::TEXT,
            Content::Text {
                text: HINT_TEXT.to_string(),
                font_size: HINT_FONT_SIZE,
            },
            vec![
                (Slot::Position, Binding::Derived(hint_position)),
                (Slot::Opacity, Binding::Derived(hint_opacity)),
                (Slot::Color, Binding::Constant(Value::Color(hint_color))),
            ],
        );
        Ok(())
    }
}

fn parse_color(hex: &'static str) -> Result<Color, SceneError> {
    Color::from_hex(hex).ok_or(SceneError::InvalidColor(hex))
}

fn scalar(v: Value) -> Result<f32, EvalError> {
    v.as_scalar().ok_or(EvalError::TypeMismatch {
        index: 0,
        expected: ValueKind::Scalar,
        found: v.kind(),
    })
}

/// Scroll range input; an empty range would divide by zero.
fn scroll_range(inputs: &Inputs<'_>, index: usize) -> Result<f32, EvalError> {
    let range = inputs.scalar(index)?;
    if range > 0.0 {
        Ok(range)
    } else {
        Err(EvalError::Failed(format!("empty scroll range ({range})")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use super::*;
    use crate::asset::{AssetError, AssetInfo};
    use crate::signal::Smoothing;

    struct FakeProbe {
        missing: HashSet<PathBuf>,
    }

    impl AssetProbe for FakeProbe {
        fn probe(&self, path: &Path) -> Result<AssetInfo, AssetError> {
            if self.missing.contains(path) {
                Err(AssetError::NotFound(path.to_path_buf()))
            } else {
                Ok(AssetInfo { width: 8, height: 8 })
            }
        }
    }

    fn signals() -> Smoother {
        let mut s = Smoother::new();
        s.register(SCROLL_TOP, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        s.register(POINTER, Value::Vec2(Vec2::zero()), Smoothing::Immediate).unwrap();
        s.register(ELAPSED, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        s.register(VIEWPORT_HEIGHT, Value::Scalar(600.0), Smoothing::Immediate).unwrap();
        s
    }

    fn compose(missing: &[&str]) -> (SceneConfig, Scene) {
        let config = SceneConfig::default();
        let probe = FakeProbe {
            missing: missing.iter().map(|m| config.asset_root.join(m)).collect(),
        };
        let scene = SceneComposer::new(&config, &probe).compose(&signals()).unwrap();
        (config, scene)
    }

    // ── topology ──────────────────────────────────────────────────────────

    #[test]
    fn default_topology() {
        let (config, scene) = compose(&[]);
        assert_eq!(scene.objects().len(), 6 + config.images.len() + config.messages.len());

        let count = |kind| scene.objects().iter().filter(|o| o.kind() == kind).count();
        assert_eq!(count(ObjectKind::Background), 1);
        assert_eq!(count(ObjectKind::StarField), 1);
        assert_eq!(count(ObjectKind::Light), 1);
        assert_eq!(count(ObjectKind::PostProcess), 1);
        assert_eq!(count(ObjectKind::TextSprite), 2);
        assert_eq!(count(ObjectKind::ImagePlane), config.images.len());
        assert_eq!(count(ObjectKind::MessagePlane), config.messages.len());
    }

    #[test]
    fn paint_order_is_back_to_front() {
        let (_, scene) = compose(&[]);
        let kinds: Vec<_> = scene.snapshot().objects().iter().map(|o| o.kind).collect();
        assert_eq!(kinds.first(), Some(&ObjectKind::Background));
        assert_eq!(kinds.get(1), Some(&ObjectKind::StarField));
        assert_eq!(kinds.last(), Some(&ObjectKind::PostProcess));
    }

    #[test]
    fn star_motion_is_autonomous() {
        let (_, scene) = compose(&[]);
        let stars = scene.find("stars").unwrap();
        assert_eq!(stars.binding(Slot::Rotation), Some(Binding::Autonomous));
        assert_eq!(stars.binding(Slot::Scale), Some(Binding::Autonomous));
    }

    #[test]
    fn messages_map_a_shared_derived_property() {
        let (_, scene) = compose(&[]);
        let graph = scene.graph();
        let order: Vec<_> = graph.evaluation_order().collect();
        let y = order.iter().position(|n| *n == "message[0].y").unwrap();
        let op = order.iter().position(|n| *n == "message[0].opacity").unwrap();
        let pos = order.iter().position(|n| *n == "message[0].position").unwrap();
        assert!(y < op && y < pos);
    }

    // ── degraded assets ───────────────────────────────────────────────────

    #[test]
    fn missing_asset_makes_layer_transparent() {
        let (config, mut scene) = compose(&["images/photo-1.jpg"]);
        let mut s = signals();
        s.update("scrollTop", Value::Scalar(500.0)).unwrap();
        s.tick(0.016);
        scene.update(&s.snapshot());

        let broken = scene.find("image[0]").unwrap();
        assert_eq!(broken.binding(Slot::Opacity), Some(Binding::Constant(Value::Scalar(0.0))));
        assert_eq!(
            broken.content(),
            &Content::Image {
                path: config.asset_root.join("images/photo-1.jpg"),
                available: false
            }
        );
        assert_eq!(scene.snapshot().state(broken.id()).unwrap().opacity, 0.0);

        let fine = scene.find("image[1]").unwrap().id();
        assert_eq!(scene.snapshot().state(fine).unwrap().opacity, 1.0);
    }

    #[test]
    fn unknown_signal_fails_composition() {
        let config = SceneConfig::default();
        let probe = FakeProbe { missing: HashSet::new() };
        let mut s = Smoother::new();
        s.register(SCROLL_TOP, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        let err = SceneComposer::new(&config, &probe).compose(&s).err().unwrap();
        assert!(matches!(err, SceneError::Graph(crate::derive::GraphError::UnknownSignal(_))));
    }
}
