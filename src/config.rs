use log::Level;

use crate::scroll::smooth::SmoothScrollOptions;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose effect tracing when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

// Testimonial block
pub const VISIBILITY_THRESHOLD: f64 = 0.35;
pub const OBSERVER_THRESHOLDS: [f64; 3] = [0.15, VISIBILITY_THRESHOLD, 0.6];
pub const POINTER_MAGNET_DISTANCE: f64 = 160.0;
pub const POINTER_MAGNET_STRENGTH: f64 = 0.25;
pub const POINTER_AMBIENT_STRENGTH: f64 = 0.08;
pub const WORD_STAGGER_TIME: f64 = 0.06;
pub const WAVE_REPEAT_DELAY: f64 = 2.5;
pub const SWEEP_COOLDOWN_MS: f64 = 380.0;
pub const MAX_TILT_DEG: f64 = 6.0;
pub const IDLE_DELAY_MS: u32 = 1800;

// Smooth scrolling and anchors
pub const SMOOTH_SCROLL_DURATION: f64 = 1.4;
pub const ANCHOR_OFFSET: f64 = -80.0;
pub const ANCHOR_DURATION: f64 = 1.5;
pub const RESIZE_DEBOUNCE_MS: u32 = 250;

// Courses gallery
pub const GALLERY_SCROLL_DISTANCE: f64 = 2000.0;
pub const GALLERY_EXTRA_SPACE: f64 = 100.0;

// FAQ grid
pub const FAQ_COLUMNS: usize = 3;
pub const FAQ_DIAGONAL_STAGGER: f64 = 0.15;

// Shared reveal timing
pub const REVEAL_STAGGER: f64 = 0.15;

/// Motion settings for the testimonial block, resolved once when the page
/// starts and handed to the component that needs them.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub reduced_motion: bool,
    pub magnet_distance: f64,
    pub magnet_strength: f64,
    pub word_stagger: f64,
    pub sweep_cooldown_ms: f64,
    pub max_tilt_deg: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            magnet_distance: POINTER_MAGNET_DISTANCE,
            magnet_strength: POINTER_MAGNET_STRENGTH,
            word_stagger: WORD_STAGGER_TIME,
            sweep_cooldown_ms: SWEEP_COOLDOWN_MS,
            max_tilt_deg: MAX_TILT_DEG,
        }
    }
}

impl MotionConfig {
    /// Reads `prefers-reduced-motion` from the browser. Anything that fails
    /// along the way counts as "no preference".
    pub fn from_environment() -> Self {
        let reduced_motion = web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|query| query.matches())
            .unwrap_or(false);
        Self {
            reduced_motion,
            ..Self::default()
        }
    }
}

pub fn smooth_scroll_options() -> SmoothScrollOptions {
    SmoothScrollOptions {
        duration: SMOOTH_SCROLL_DURATION,
        mouse_multiplier: 1.0,
        touch_multiplier: 2.0,
        smooth_touch: true,
    }
}
