//! Scene tuning constants.
//!
//! Units: scroll and pointer values are logical pixels, time is milliseconds,
//! positions are scene units.

// Parallax
pub const PARALLAX_POINTER_DIVISOR: f32 = 50_000.0; // pointer px * factor → scene units
pub const PARALLAX_Y_STRETCH: f32 = 1.15; // applied to the layer's static y
pub const PARALLAX_SCROLL_GAIN: f32 = 2.0; // scene units per full scroll range, per unit factor
pub const IMAGE_DEPTH_DIVISOR: f32 = 2_000.0; // scroll px per scene unit of forward drift

// Visible scroll range, in viewport heights.
pub const SCROLL_MAX_SCREENS: f32 = 4.5;

// Fade envelopes
pub const IMAGE_FADE_IN_SPAN: f32 = 500.0;
pub const TITLE_FADE_OUT_SPAN: f32 = 200.0;

// Message layers
pub const MESSAGE_VISIBILITY_RADIUS: f32 = 2.0; // |y| at which a message is fully gone
pub const MESSAGE_VISIBILITY_MAX: f32 = 1.0;
pub const MESSAGE_DEPTH_MIN: f32 = -2.0;

// Glitch pulse. Its scroll gate is independent of the blink gate on purpose.
pub const GLITCH_START_MS: f32 = 2_000.0;
pub const GLITCH_RAMP_MS: f32 = 2_000.0;
pub const GLITCH_RATE_PER_MS: f32 = 1.0 / 1_333.0;
pub const GLITCH_SCROLL_GATE: f32 = 200.0;

// Hint label blink
pub const BLINK_START_MS: f32 = 4_000.0;
pub const BLINK_FADE_MS: f32 = 2_000.0;
pub const BLINK_HALF_PERIOD_MS: f32 = 1_000.0;
pub const BLINK_OUTER_PERIOD_MS: f32 = 10_000.0;
pub const BLINK_SCROLL_GATE: f32 = 200.0;

// Background colour stops, as fractions of the scroll range.
pub const BACKGROUND_STOPS: [(f32, &str); 4] = [
    (0.0, "#27282F"),
    (0.25, "#247BA0"),
    (0.8, "#70C1B3"),
    (1.0, "#f8f3f1"),
];

// Star field
pub const STAR_COUNT: usize = 1_000;
pub const STAR_SPREAD: f32 = 400.0; // stars fill [-spread, spread) on each axis
pub const STAR_SEED: u64 = 0x5eed_57a2;
pub const STAR_ANGLE_STEP_DEG: f32 = 0.01; // per tick
pub const STAR_ROTATION_AMPLITUDE: f32 = 5.0;
pub const STAR_DRIFT_DIVISOR: f32 = 20.0;
pub const STAR_COLOR: &str = "#ffdab9"; // peachpuff

// Text
pub const TITLE_TEXT: &str = "Test";
pub const TITLE_FONT_SIZE: f32 = 200.0;
pub const HINT_TEXT: &str = "向下缓慢滑动";
pub const HINT_FONT_SIZE: f32 = 40.0;
pub const HINT_COLOR: &str = "#cfcfcf";
pub const TEXT_DRIFT_DIVISOR: f32 = 200.0;

// Spot light
pub const LIGHT_INTENSITY: f32 = 1.2;
pub const LIGHT_POINTER_DIVISOR: f32 = 100.0;
pub const LIGHT_Z: f32 = 6.5;
