use std::time::Duration;

use super::{SignalError, TargetSender, Value, ELAPSED, POINTER, SCROLL_TOP, VIEWPORT_HEIGHT};
use crate::coords::Viewport;
use crate::input::{InputEvent, PointerMoveEvent, ScrollContainer};
use crate::time::IntervalTimer;

/// Turns raw input and timer ticks into signal targets.
///
/// Owns the pieces of input state that produce raw values: the scroll container,
/// the viewport used to centre the pointer, and the interval timer. Everything it
/// produces goes through a [`TargetSender`], so it never touches spring state directly.
#[derive(Debug)]
pub struct SignalSource {
    sender: TargetSender,
    viewport: Viewport,
    scroll: ScrollContainer,
    timer: IntervalTimer,
}

impl SignalSource {
    pub fn new(
        sender: TargetSender,
        viewport: Viewport,
        scroll: ScrollContainer,
        timer: IntervalTimer,
    ) -> Self {
        Self {
            sender,
            viewport,
            scroll,
            timer,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    #[inline]
    pub fn elapsed_ms(&self) -> f32 {
        self.timer.elapsed_ms()
    }

    #[inline]
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Posts the targets implied by one input event.
    pub fn handle(&mut self, ev: &InputEvent) -> Result<(), SignalError> {
        match ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                let centered = self.viewport.centered(*x, *y);
                self.sender.post(POINTER.as_str(), Value::Vec2(centered))
            }

            InputEvent::Resized(vp) if vp.is_valid() => {
                self.viewport = *vp;
                self.sender.post(VIEWPORT_HEIGHT.as_str(), Value::Scalar(vp.height))?;
                if self.scroll.handle(ev) {
                    self.post_scroll()?;
                }
                Ok(())
            }

            InputEvent::MouseWheel { .. } | InputEvent::Key { .. } => {
                if self.scroll.handle(ev) {
                    self.post_scroll()?;
                }
                Ok(())
            }

            // Pointer leaving keeps the last target; focus does not feed any signal.
            InputEvent::Resized(_) | InputEvent::PointerLeft | InputEvent::Focused(_) => Ok(()),
        }
    }

    /// Jumps the scroll offset directly, as if the container had been scrolled there.
    pub fn scroll_to(&mut self, offset: f32) -> Result<(), SignalError> {
        let delta = offset - self.scroll.offset();
        if self.scroll.scroll_by(delta) {
            self.post_scroll()?;
        }
        Ok(())
    }

    /// Feeds frame time to the interval timer; posts the elapsed signal when it fires.
    pub fn advance_time(&mut self, dt: Duration) -> Result<(), SignalError> {
        if self.timer.advance(dt) > 0 {
            self.sender
                .post(ELAPSED.as_str(), Value::Scalar(self.timer.elapsed_ms()))?;
        }
        Ok(())
    }

    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    fn post_scroll(&self) -> Result<(), SignalError> {
        self.sender
            .post(SCROLL_TOP.as_str(), Value::Scalar(self.scroll.offset()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::input::{Key, KeyState, MouseWheelDelta};
    use crate::signal::{Smoother, Smoothing};

    fn rig() -> (Smoother, SignalSource) {
        let mut s = Smoother::new();
        s.register(SCROLL_TOP, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        s.register(POINTER, Value::Vec2(Vec2::zero()), Smoothing::Immediate).unwrap();
        s.register(ELAPSED, Value::Scalar(0.0), Smoothing::Immediate).unwrap();
        s.register(VIEWPORT_HEIGHT, Value::Scalar(600.0), Smoothing::Immediate).unwrap();
        let vp = Viewport::new(800.0, 600.0);
        let src = SignalSource::new(
            s.sender(),
            vp,
            ScrollContainer::new(vp.height, 8.0, 40.0),
            IntervalTimer::new(Duration::from_millis(100)),
        );
        (s, src)
    }

    #[test]
    fn pointer_is_centred() {
        let (mut s, mut src) = rig();
        src.handle(&InputEvent::PointerMoved(PointerMoveEvent { x: 500.0, y: 100.0 }))
            .unwrap();
        s.tick(0.016);
        assert_eq!(s.read("pointer").unwrap(), Value::Vec2(Vec2::new(100.0, -200.0)));
    }

    #[test]
    fn pointer_left_keeps_last_target() {
        let (mut s, mut src) = rig();
        src.handle(&InputEvent::PointerMoved(PointerMoveEvent { x: 0.0, y: 0.0 }))
            .unwrap();
        src.handle(&InputEvent::PointerLeft).unwrap();
        s.tick(0.016);
        assert_eq!(s.read("pointer").unwrap(), Value::Vec2(Vec2::new(-400.0, -300.0)));
    }

    #[test]
    fn wheel_posts_scroll_offset() {
        let (mut s, mut src) = rig();
        src.handle(&InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: -120.0 },
        })
        .unwrap();
        s.tick(0.016);
        assert_eq!(s.read("scrollTop").unwrap(), Value::Scalar(120.0));
    }

    #[test]
    fn key_scrolls_too() {
        let (mut s, mut src) = rig();
        src.handle(&InputEvent::Key { key: Key::End, state: KeyState::Pressed, repeat: false })
            .unwrap();
        s.tick(0.016);
        assert_eq!(s.read("scrollTop").unwrap(), Value::Scalar(4200.0));
    }

    #[test]
    fn resize_updates_viewport_signal() {
        let (mut s, mut src) = rig();
        src.handle(&InputEvent::Resized(Viewport::new(1000.0, 400.0))).unwrap();
        s.tick(0.016);
        assert_eq!(s.read("viewportHeight").unwrap(), Value::Scalar(400.0));
        assert_eq!(src.viewport().width, 1000.0);
    }

    #[test]
    fn timer_steps_elapsed_by_period() {
        let (mut s, mut src) = rig();
        src.advance_time(Duration::from_millis(250)).unwrap();
        s.tick(0.016);
        assert_eq!(s.read("elapsed").unwrap(), Value::Scalar(200.0));
    }

    #[test]
    fn stopped_timer_posts_nothing() {
        let (mut s, mut src) = rig();
        src.stop_timer();
        src.advance_time(Duration::from_secs(3)).unwrap();
        s.tick(0.016);
        assert_eq!(s.read("elapsed").unwrap(), Value::Scalar(0.0));
    }
}
