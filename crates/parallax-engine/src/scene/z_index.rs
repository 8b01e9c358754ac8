use core::cmp::Ordering;

/// Paint layer of a renderable object. Higher values are painted over lower ones.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BACKGROUND: ZIndex = ZIndex(-1_000);
    pub const STARS: ZIndex = ZIndex(-100);
    pub const IMAGES: ZIndex = ZIndex(0);
    pub const MESSAGES: ZIndex = ZIndex(10);
    pub const TEXT: ZIndex = ZIndex(20);
    /// Full-frame passes run after everything else.
    pub const POST: ZIndex = ZIndex(1_000);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

impl Ord for ZIndex {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for ZIndex {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
