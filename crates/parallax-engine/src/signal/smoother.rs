use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;

use super::sender::{Directory, Posted, TargetSender};
use super::spring::{SpringConfig, SpringState};
use super::{SignalError, SignalId, Value, ValueKind};
use crate::coords::Vec2;

/// How a signal's visible value follows its target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Smoothing {
    Spring(SpringConfig),
    /// Current value equals the target as soon as the target is applied.
    Immediate,
}

/// Dense handle to a registered signal. Valid for the smoother that issued it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SignalIndex(pub(crate) usize);

/// Current value of every signal, taken once per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSnapshot {
    values: Vec<Value>,
}

impl SignalSnapshot {
    #[inline]
    pub fn get(&self, index: SignalIndex) -> Option<Value> {
        self.values.get(index.0).copied()
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

#[derive(Debug)]
struct Channel {
    id: SignalId,
    kind: ValueKind,
    smoothing: Smoothing,
    spring: SpringState,
}

impl Channel {
    fn apply_target(&mut self, value: Value) {
        let lanes = to_lanes(value);
        match self.smoothing {
            Smoothing::Spring(_) => self.spring.set_target(lanes),
            Smoothing::Immediate => self.spring.jump(lanes),
        }
    }

    fn value(&self) -> Value {
        from_lanes(self.kind, self.spring.current())
    }
}

/// Owns every signal's spring state.
///
/// Writers set targets (`update`, or a [`TargetSender`] from another thread); the
/// visible value only moves inside [`Smoother::tick`], which the frame driver calls
/// once per frame.
pub struct Smoother {
    channels: Vec<Channel>,
    by_name: HashMap<SignalId, usize>,
    directory: Arc<Directory>,
    tx: mpsc::Sender<Posted>,
    rx: mpsc::Receiver<Posted>,
}

impl Smoother {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            channels: Vec::new(),
            by_name: HashMap::new(),
            directory: Arc::new(Directory::default()),
            tx,
            rx,
        }
    }

    /// Registers a scalar or 2D signal starting at rest at `initial`.
    pub fn register(
        &mut self,
        id: SignalId,
        initial: Value,
        smoothing: Smoothing,
    ) -> Result<SignalIndex, SignalError> {
        if self.by_name.contains_key(id.as_str()) {
            return Err(SignalError::DuplicateSignal(id));
        }

        let kind = initial.kind();
        if !matches!(kind, ValueKind::Scalar | ValueKind::Vec2) {
            return Err(SignalError::Unsmoothable { signal: id, kind });
        }

        let index = self.channels.len();
        let dims = if kind == ValueKind::Scalar { 1 } else { 2 };

        log::debug!("signal registered: {id} ({kind:?}, {smoothing:?})");

        self.by_name.insert(id.clone(), index);
        self.channels.push(Channel {
            id,
            kind,
            smoothing,
            spring: SpringState::new(dims, to_lanes(initial)),
        });
        self.directory = Arc::new(Directory::from_channels(
            self.channels.iter().map(|c| (c.id.clone(), c.kind)),
        ));

        Ok(SignalIndex(index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<SignalIndex> {
        self.by_name.get(name).copied().map(SignalIndex)
    }

    pub fn kind_of(&self, index: SignalIndex) -> Option<ValueKind> {
        self.channels.get(index.0).map(|c| c.kind)
    }

    /// Sets the target for `name`. Does not change the visible value of a spring signal.
    pub fn update(&mut self, name: &str, target: Value) -> Result<(), SignalError> {
        let channel = self.channel_mut(name, target.kind())?;
        channel.apply_target(target);
        Ok(())
    }

    /// Moves both the visible value and the target, discarding velocity.
    pub fn jump(&mut self, name: &str, value: Value) -> Result<(), SignalError> {
        let channel = self.channel_mut(name, value.kind())?;
        channel.spring.jump(to_lanes(value));
        Ok(())
    }

    /// Latest integrated value.
    pub fn read(&self, name: &str) -> Result<Value, SignalError> {
        self.by_name
            .get(name)
            .map(|&i| self.channels[i].value())
            .ok_or_else(|| SignalError::UnknownSignal(name.to_string()))
    }

    /// Spring state for inspection.
    pub fn spring(&self, name: &str) -> Result<&SpringState, SignalError> {
        self.by_name
            .get(name)
            .map(|&i| &self.channels[i].spring)
            .ok_or_else(|| SignalError::UnknownSignal(name.to_string()))
    }

    /// Handle for posting targets from elsewhere, including other threads.
    ///
    /// The handle knows the signals registered at the time it was created.
    pub fn sender(&self) -> TargetSender {
        TargetSender::new(self.tx.clone(), Arc::clone(&self.directory))
    }

    /// Applies queued targets (latest wins), then integrates every spring by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let channels = &mut self.channels;
        for posted in self.rx.try_iter() {
            if let Some(channel) = channels.get_mut(posted.index) {
                channel.apply_target(posted.value);
            }
        }

        for channel in channels.iter_mut() {
            if let Smoothing::Spring(cfg) = &channel.smoothing {
                channel.spring.step(cfg, dt);
            }
        }
    }

    pub fn snapshot(&self) -> SignalSnapshot {
        let mut snap = SignalSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Refills `out` without reallocating once warmed.
    pub fn snapshot_into(&self, out: &mut SignalSnapshot) {
        out.values.clear();
        out.values.extend(self.channels.iter().map(Channel::value));
    }

    fn channel_mut(&mut self, name: &str, found: ValueKind) -> Result<&mut Channel, SignalError> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| SignalError::UnknownSignal(name.to_string()))?;
        let channel = &mut self.channels[index];
        if channel.kind != found {
            return Err(SignalError::KindMismatch {
                signal: channel.id.clone(),
                expected: channel.kind,
                found,
            });
        }
        Ok(channel)
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new()
    }
}

fn to_lanes(value: Value) -> [f32; 2] {
    match value {
        Value::Scalar(v) => [v, 0.0],
        Value::Vec2(v) => [v.x, v.y],
        // Rejected at registration and by kind checks before reaching here.
        Value::Vec3(_) | Value::Color(_) => [0.0, 0.0],
    }
}

fn from_lanes(kind: ValueKind, lanes: [f32; 2]) -> Value {
    match kind {
        ValueKind::Vec2 => Value::Vec2(Vec2::new(lanes[0], lanes[1])),
        _ => Value::Scalar(lanes[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{POINTER, SCROLL_TOP, VIEWPORT_HEIGHT};

    fn smoother() -> Smoother {
        let mut s = Smoother::new();
        let spring = Smoothing::Spring(SpringConfig::default());
        s.register(SCROLL_TOP, Value::Scalar(0.0), spring).unwrap();
        s.register(POINTER, Value::Vec2(Vec2::zero()), spring).unwrap();
        s.register(VIEWPORT_HEIGHT, Value::Scalar(600.0), Smoothing::Immediate).unwrap();
        s
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn duplicate_registration_fails() {
        let mut s = smoother();
        let err = s
            .register(SCROLL_TOP, Value::Scalar(1.0), Smoothing::Immediate)
            .unwrap_err();
        assert_eq!(err, SignalError::DuplicateSignal(SCROLL_TOP));
    }

    #[test]
    fn colour_signals_are_rejected() {
        let mut s = Smoother::new();
        let err = s
            .register(SignalId::new("tint"), Value::Color(crate::paint::Color::WHITE), Smoothing::Immediate)
            .unwrap_err();
        assert!(matches!(err, SignalError::Unsmoothable { .. }));
    }

    // ── update / read ─────────────────────────────────────────────────────

    #[test]
    fn unknown_signal_is_reported() {
        let mut s = smoother();
        assert_eq!(
            s.update("nope", Value::Scalar(1.0)),
            Err(SignalError::UnknownSignal("nope".into()))
        );
        assert!(s.read("nope").is_err());
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let mut s = smoother();
        let err = s.update("pointer", Value::Scalar(1.0)).unwrap_err();
        assert!(matches!(err, SignalError::KindMismatch { expected: ValueKind::Vec2, .. }));
    }

    #[test]
    fn update_only_moves_value_on_tick() {
        let mut s = smoother();
        s.update("scrollTop", Value::Scalar(300.0)).unwrap();
        assert_eq!(s.read("scrollTop").unwrap(), Value::Scalar(0.0));
        s.tick(1.0 / 60.0);
        let v = s.read("scrollTop").unwrap().as_scalar().unwrap();
        assert!(v > 0.0 && v < 300.0);
    }

    #[test]
    fn immediate_signal_follows_target() {
        let mut s = smoother();
        s.update("viewportHeight", Value::Scalar(900.0)).unwrap();
        assert_eq!(s.read("viewportHeight").unwrap(), Value::Scalar(900.0));
    }

    #[test]
    fn jump_skips_the_spring() {
        let mut s = smoother();
        s.jump("pointer", Value::Vec2(Vec2::new(5.0, 6.0))).unwrap();
        assert_eq!(s.read("pointer").unwrap(), Value::Vec2(Vec2::new(5.0, 6.0)));
    }

    // ── queued targets ────────────────────────────────────────────────────

    #[test]
    fn queued_targets_apply_on_tick_latest_wins() {
        let mut s = smoother();
        let tx = s.sender();
        tx.post("viewportHeight", Value::Scalar(700.0)).unwrap();
        tx.post("viewportHeight", Value::Scalar(800.0)).unwrap();
        assert_eq!(s.read("viewportHeight").unwrap(), Value::Scalar(600.0));
        s.tick(0.016);
        assert_eq!(s.read("viewportHeight").unwrap(), Value::Scalar(800.0));
    }

    #[test]
    fn sender_works_across_threads() {
        let mut s = smoother();
        let tx = s.sender();
        std::thread::spawn(move || tx.post("viewportHeight", Value::Scalar(1.0)).unwrap())
            .join()
            .unwrap();
        s.tick(0.016);
        assert_eq!(s.read("viewportHeight").unwrap(), Value::Scalar(1.0));
    }

    // ── snapshot ──────────────────────────────────────────────────────────

    #[test]
    fn snapshot_follows_registration_order() {
        let s = smoother();
        let snap = s.snapshot();
        let idx = s.index_of("viewportHeight").unwrap();
        assert_eq!(snap.get(idx), Some(Value::Scalar(600.0)));
        assert_eq!(snap.values().len(), 3);
    }
}
