use super::types::{InputEvent, Key, KeyState, MouseWheelDelta};
use crate::coords::Viewport;

/// Virtual scroll container that produces the raw scroll offset.
///
/// The content is `content_screens` viewport heights tall; the offset is clamped to
/// `[0, content - viewport]`. Positive wheel `y` (wheel rolled towards the user) scrolls
/// down, which increases the offset.
#[derive(Debug, Clone)]
pub struct ScrollContainer {
    offset: f32,
    viewport_height: f32,
    content_screens: f32,
    line_height: f32,
}

impl ScrollContainer {
    pub fn new(viewport_height: f32, content_screens: f32, line_height: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height: viewport_height.max(0.0),
            content_screens: content_screens.max(1.0),
            line_height,
        }
    }

    /// Current offset in logical pixels.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Largest reachable offset.
    #[inline]
    pub fn max_offset(&self) -> f32 {
        (self.viewport_height * self.content_screens - self.viewport_height).max(0.0)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport_height = viewport.height.max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Scrolls by `delta` pixels. Returns whether the offset changed.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let prev = self.offset;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset());
        self.offset != prev
    }

    /// Applies a wheel, key or resize event. Returns whether the offset changed.
    pub fn handle(&mut self, ev: &InputEvent) -> bool {
        match ev {
            InputEvent::MouseWheel { delta } => {
                let dy = match delta {
                    MouseWheelDelta::Line { y, .. } => -*y * self.line_height,
                    MouseWheelDelta::Pixel { y, .. } => -*y,
                };
                self.scroll_by(dy)
            }

            InputEvent::Key { key, state: KeyState::Pressed, .. } => {
                let page = self.viewport_height * 0.9;
                match key {
                    Key::ArrowDown => self.scroll_by(self.line_height),
                    Key::ArrowUp => self.scroll_by(-self.line_height),
                    Key::PageDown | Key::Space => self.scroll_by(page),
                    Key::PageUp => self.scroll_by(-page),
                    Key::Home => self.scroll_by(f32::NEG_INFINITY),
                    Key::End => self.scroll_by(f32::INFINITY),
                    _ => false,
                }
            }

            InputEvent::Resized(vp) => {
                let prev = self.offset;
                self.resize(*vp);
                self.offset != prev
            }

            _ => false,
        }
    }
}
