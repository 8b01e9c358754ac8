use std::borrow::{Borrow, Cow};
use std::fmt;

/// Name of a signal. Identity is by name; one live signal per name per smoother.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(Cow<'static, str>);

impl SignalId {
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SignalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for SignalId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for SignalId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vertical scroll offset in logical pixels.
pub const SCROLL_TOP: SignalId = SignalId::from_static("scrollTop");

/// Pointer offset from the viewport centre in logical pixels.
pub const POINTER: SignalId = SignalId::from_static("pointer");

/// Elapsed session time in milliseconds, stepped by the interval timer.
pub const ELAPSED: SignalId = SignalId::from_static("elapsed");

/// Viewport height in logical pixels. Not smoothed.
pub const VIEWPORT_HEIGHT: SignalId = SignalId::from_static("viewportHeight");
