//! One running parallax scene: signals, derivations and the star field, advanced
//! together once per frame.

use std::time::Duration;

use thiserror::Error;

use crate::asset::AssetProbe;
use crate::coords::{Vec2, Viewport};
use crate::input::{InputEvent, ScrollContainer};
use crate::layout::{ConfigError, SceneConfig};
use crate::scene::{FrameSnapshot, Scene, SceneComposer, SceneError};
use crate::signal::{
    SignalError, SignalSnapshot, SignalSource, Smoother, Smoothing, TargetSender, Value, ELAPSED,
    POINTER, SCROLL_TOP, VIEWPORT_HEIGHT,
};
use crate::time::{FrameTime, IntervalTimer};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("viewport must have a positive size, got {0:?}")]
    InvalidViewport(Viewport),
}

/// Owns every piece of per-session state.
///
/// Input events only move signal targets. [`Session::tick`] is the single place where
/// springs integrate, derivations run and the frame snapshot is refreshed, so every
/// derived property in a frame sees the same signal values.
pub struct Session {
    smoother: Smoother,
    source: SignalSource,
    scene: Scene,
    signals: SignalSnapshot,
    running: bool,
}

impl Session {
    /// Registers the signals, composes the scene and starts the elapsed-time timer.
    ///
    /// Every registration error surfaces here, before the first tick.
    pub fn new(config: &SceneConfig, probe: &dyn AssetProbe, viewport: Viewport) -> Result<Self, SessionError> {
        config.validate()?;
        if !viewport.is_valid() {
            return Err(SessionError::InvalidViewport(viewport));
        }

        let mut smoother = Smoother::new();
        let spring = Smoothing::Spring(config.spring);
        smoother.register(SCROLL_TOP, Value::Scalar(0.0), spring)?;
        smoother.register(POINTER, Value::Vec2(Vec2::zero()), spring)?;
        smoother.register(ELAPSED, Value::Scalar(0.0), spring)?;
        smoother.register(VIEWPORT_HEIGHT, Value::Scalar(viewport.height), Smoothing::Immediate)?;

        let scene = SceneComposer::new(config, probe).compose(&smoother)?;

        let scroll = ScrollContainer::new(
            viewport.height,
            config.scroll.content_screens,
            config.scroll.line_height,
        );
        let timer = IntervalTimer::new(config.timer.period());
        let source = SignalSource::new(smoother.sender(), viewport, scroll, timer);

        log::info!(
            "session started: {} objects, viewport {}x{}",
            scene.objects().len(),
            viewport.width,
            viewport.height
        );

        let signals = smoother.snapshot();
        Ok(Self {
            smoother,
            source,
            scene,
            signals,
            running: true,
        })
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn smoother(&self) -> &Smoother {
        &self.smoother
    }

    #[inline]
    pub fn source(&self) -> &SignalSource {
        &self.source
    }

    /// Last frame's snapshot.
    #[inline]
    pub fn snapshot(&self) -> &FrameSnapshot {
        self.scene.snapshot()
    }

    /// Handle for producers outside the frame loop. Targets posted through it are
    /// applied at the start of the next tick.
    pub fn sender(&self) -> TargetSender {
        self.smoother.sender()
    }

    /// Feeds one input event to the signal source. Ignored after shutdown.
    pub fn handle_input(&mut self, ev: &InputEvent) -> Result<(), SignalError> {
        if !self.running {
            return Ok(());
        }
        self.source.handle(ev)
    }

    /// Scrolls the container to `offset` (clamped to its range). Ignored after shutdown.
    pub fn scroll_to(&mut self, offset: f32) -> Result<(), SignalError> {
        if !self.running {
            return Ok(());
        }
        self.source.scroll_to(offset)
    }

    /// Advances the session by one frame of `dt` and returns the new snapshot.
    pub fn tick(&mut self, dt: Duration) -> &FrameSnapshot {
        self.advance(dt.as_secs_f32(), dt)
    }

    /// Advances by one runtime frame. Springs integrate over the clamped delta; the
    /// elapsed timer follows unclamped wall time so stalls do not put it behind.
    pub fn tick_frame(&mut self, time: &FrameTime) -> &FrameSnapshot {
        self.advance(time.dt, time.wall)
    }

    fn advance(&mut self, dt: f32, wall: Duration) -> &FrameSnapshot {
        if self.running {
            if let Err(err) = self.source.advance_time(wall) {
                log::error!("elapsed-time update dropped: {err}");
            }
        }

        self.smoother.tick(dt);
        self.smoother.snapshot_into(&mut self.signals);
        self.scene.update(&self.signals)
    }

    /// Stops the elapsed-time timer and input handling. Idempotent.
    ///
    /// Springs already in motion keep settling if the caller keeps ticking.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.source.stop_timer();
        self.running = false;
        log::info!(
            "session stopped after {} frames",
            self.scene.snapshot().frame_index()
        );
    }
}
