//! The per-frame pointer follower behind the testimonial visual.
//!
//! The loop keeps a smoothed copy of the pointer target, estimates how fast
//! it is moving, and turns both into a transform for the visual. Fast motion
//! fires a highlight sweep, at most once per cooldown window. Output goes
//! through [`TransformSink`] so none of this needs a browser.

use serde::Serialize;

use crate::config::{MotionConfig, POINTER_AMBIENT_STRENGTH};

pub const POSITION_BLEND: f64 = 0.12;
pub const VELOCITY_BLEND: f64 = 0.25;
/// Frame length assumed when there is no previous frame to measure against.
pub const DEFAULT_DT: f64 = 0.016;
/// Velocity (px/s) that counts as full speed.
pub const SPEED_REFERENCE: f64 = 600.0;
pub const SWEEP_THRESHOLD: f64 = 0.55;
pub const PERSPECTIVE: f64 = 800.0;

const TRANSLATE_FACTOR: f64 = 0.4;
const SCALE_POP: f64 = 0.03;
const TILT_NORMALIZER: f64 = 100.0;
const HIGHLIGHT_BASE_OPACITY: f64 = 0.55;
const HIGHLIGHT_SPEED_OPACITY: f64 = 0.35;
const DRIFT_RATE: f64 = 0.0004;
const DRIFT_AMPLITUDE: f64 = 8.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn lerp(self, to: Vec2, t: f64) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    fn scale(self, factor: f64) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
}

/// What the highlight shape supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// Opacity follows speed, but the shape cannot be stroke-swept.
    FadeOnly,
    Sweep,
}

pub trait TransformSink {
    fn apply_transform(&mut self, transform: VisualTransform);
    fn set_highlight_opacity(&mut self, opacity: f64);
    fn sweep(&mut self);
}

/// Payload of `morphic:cursor-magnet`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagnetEvent {
    pub strength: f64,
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub blob_center_x: f64,
    pub blob_center_y: f64,
}

#[derive(Clone, Debug)]
pub struct PointerLoop {
    reduced_motion: bool,
    magnet_distance: f64,
    magnet_strength: f64,
    sweep_cooldown_ms: f64,
    max_tilt_deg: f64,
    highlight: Highlight,
    running: bool,
    smoothed: Vec2,
    target: Vec2,
    velocity: Vec2,
    last_time: Option<f64>,
    last_sweep: Option<f64>,
    idle: bool,
}

impl PointerLoop {
    pub fn new(config: &MotionConfig, highlight: Highlight) -> Self {
        Self {
            reduced_motion: config.reduced_motion,
            magnet_distance: config.magnet_distance,
            magnet_strength: config.magnet_strength,
            sweep_cooldown_ms: config.sweep_cooldown_ms,
            max_tilt_deg: config.max_tilt_deg,
            highlight,
            running: false,
            smoothed: Vec2::ZERO,
            target: Vec2::ZERO,
            velocity: Vec2::ZERO,
            last_time: None,
            last_sweep: None,
            idle: true,
        }
    }

    /// Returns `false` when the loop must not run: reduced motion is on or it
    /// is already running.
    pub fn start(&mut self) -> bool {
        if self.reduced_motion || self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops the loop and drops all motion state. The next tick returns
    /// `false` without producing output.
    pub fn stop(&mut self) {
        self.running = false;
        self.smoothed = Vec2::ZERO;
        self.target = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.last_time = None;
        self.idle = true;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    #[cfg(test)]
    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    #[cfg(test)]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn speed(&self) -> f64 {
        (self.velocity.length() / SPEED_REFERENCE).min(1.0)
    }

    /// `pointer` is relative to the visual's top-left corner and `size` is
    /// the visual's box. Pointers near the centre pull harder and produce a
    /// magnet event.
    pub fn pointer_moved(&mut self, pointer: Vec2, size: Vec2) -> Option<MagnetEvent> {
        if !self.running {
            return None;
        }
        let center = size.scale(0.5);
        let offset = pointer.sub(center);
        let distance = offset.length();
        self.idle = false;
        if distance < self.magnet_distance {
            self.target = offset.scale(self.magnet_strength);
            Some(MagnetEvent {
                strength: distance / self.magnet_distance,
                pointer_x: pointer.x,
                pointer_y: pointer.y,
                blob_center_x: center.x,
                blob_center_y: center.y,
            })
        } else {
            self.target = offset.scale(POINTER_AMBIENT_STRENGTH);
            None
        }
    }

    pub fn pointer_left(&mut self) {
        self.target = Vec2::ZERO;
        self.idle = true;
    }

    /// Called by the idle timer once the pointer has been still long enough.
    pub fn mark_idle(&mut self) {
        self.idle = true;
    }

    /// Advances one frame. Returns whether another frame should be scheduled.
    pub fn tick<S: TransformSink>(&mut self, timestamp: f64, sink: &mut S) -> bool {
        if !self.running {
            return false;
        }
        let elapsed = self
            .last_time
            .map(|last| (timestamp - last) / 1000.0)
            .unwrap_or(0.0);
        self.last_time = Some(timestamp);
        let dt = if elapsed > 0.0 { elapsed } else { DEFAULT_DT };

        self.smoothed = self.smoothed.lerp(self.target, POSITION_BLEND);
        let instant = self.target.sub(self.smoothed).scale(1.0 / dt);
        self.velocity = self.velocity.lerp(instant, VELOCITY_BLEND);
        let speed = self.speed();

        let mut transform = VisualTransform {
            x: self.smoothed.x * TRANSLATE_FACTOR,
            y: self.smoothed.y * TRANSLATE_FACTOR,
            scale: 1.0 + speed * SCALE_POP,
            // pointer above centre tilts the top toward the viewer
            rotate_x: (self.smoothed.y / TILT_NORMALIZER) * -self.max_tilt_deg,
            rotate_y: (self.smoothed.x / TILT_NORMALIZER) * self.max_tilt_deg,
        };
        if self.idle {
            transform.y = (timestamp * DRIFT_RATE).sin() * DRIFT_AMPLITUDE;
        }
        sink.apply_transform(transform);

        if self.highlight != Highlight::None {
            sink.set_highlight_opacity(HIGHLIGHT_BASE_OPACITY + speed * HIGHLIGHT_SPEED_OPACITY);
            if self.highlight == Highlight::Sweep && speed > SWEEP_THRESHOLD && self.cooldown_elapsed(timestamp) {
                self.last_sweep = Some(timestamp);
                sink.sweep();
            }
        }
        true
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        self.last_sweep
            .map_or(true, |last| now - last >= self.sweep_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct Recorder {
        transforms: Vec<VisualTransform>,
        opacities: Vec<f64>,
        sweeps: usize,
    }

    impl TransformSink for Recorder {
        fn apply_transform(&mut self, transform: VisualTransform) {
            self.transforms.push(transform);
        }

        fn set_highlight_opacity(&mut self, opacity: f64) {
            self.opacities.push(opacity);
        }

        fn sweep(&mut self) {
            self.sweeps += 1;
        }
    }

    const SIZE: Vec2 = Vec2 { x: 400.0, y: 400.0 };

    fn running(highlight: Highlight) -> PointerLoop {
        let mut pointer = PointerLoop::new(&MotionConfig::default(), highlight);
        assert!(pointer.start());
        pointer
    }

    /// Pointer at `offset` from the centre of the visual.
    fn at(offset_x: f64, offset_y: f64) -> Vec2 {
        Vec2::new(200.0 + offset_x, 200.0 + offset_y)
    }

    #[test]
    fn smoothed_position_converges_geometrically() {
        let mut pointer = running(Highlight::None);
        let mut sink = Recorder::default();
        pointer.pointer_moved(at(100.0, 0.0), SIZE);
        let target = pointer.target();
        assert_abs_diff_eq!(target.x, 25.0, epsilon = 1e-9);

        let start = target.sub(pointer.smoothed()).length();
        let mut previous = start;
        for frame in 1..=60 {
            pointer.tick(frame as f64 * 16.0, &mut sink);
            let distance = target.sub(pointer.smoothed()).length();
            assert!(distance < previous, "frame {frame} did not get closer");
            assert_abs_diff_eq!(distance, start * 0.88f64.powi(frame), epsilon = 1e-9);
            previous = distance;
        }
        assert!(previous < start * 0.001);
    }

    #[test]
    fn first_frame_uses_default_dt() {
        let mut pointer = running(Highlight::None);
        let mut sink = Recorder::default();
        pointer.pointer_moved(at(100.0, 0.0), SIZE);
        pointer.tick(5000.0, &mut sink);
        // velocity = lerp(0, (25 - 3) / 0.016, 0.25)
        let expected = 0.25 * (25.0 - 3.0) / DEFAULT_DT;
        assert_abs_diff_eq!(pointer.velocity.x, expected, epsilon = 1e-6);
        assert!(pointer.speed() <= 1.0);
    }

    #[test]
    fn magnet_and_ambient_scaling() {
        let mut pointer = running(Highlight::None);
        let event = pointer.pointer_moved(at(60.0, 80.0), SIZE).expect("inside magnet radius");
        assert_abs_diff_eq!(pointer.target().x, 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pointer.target().y, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(event.strength, 100.0 / 160.0, epsilon = 1e-9);
        assert_eq!(event.blob_center_x, 200.0);
        assert_eq!(event.pointer_y, 280.0);

        assert!(pointer.pointer_moved(at(120.0, 160.0), SIZE).is_none());
        assert_abs_diff_eq!(pointer.target().x, 9.6, epsilon = 1e-9);
        assert_abs_diff_eq!(pointer.target().y, 12.8, epsilon = 1e-9);
    }

    #[test]
    fn leaving_resets_target_and_goes_idle() {
        let mut pointer = running(Highlight::None);
        pointer.pointer_moved(at(50.0, 50.0), SIZE);
        assert!(!pointer.is_idle());
        pointer.pointer_left();
        assert_eq!(pointer.target(), Vec2::ZERO);
        assert!(pointer.is_idle());
    }

    #[test]
    fn idle_frames_drift_instead_of_following() {
        let mut pointer = running(Highlight::None);
        let mut sink = Recorder::default();
        pointer.pointer_moved(at(0.0, 100.0), SIZE);
        for frame in 0..30 {
            pointer.tick(frame as f64 * 16.0, &mut sink);
        }
        let following = *sink.transforms.last().unwrap();
        assert_abs_diff_eq!(following.y, pointer.smoothed().y * 0.4, epsilon = 1e-9);

        // what the idle timer does after 1800ms without movement
        pointer.mark_idle();
        let ts = 2400.0;
        pointer.tick(ts, &mut sink);
        let drifting = *sink.transforms.last().unwrap();
        assert_abs_diff_eq!(drifting.y, (ts * 0.0004).sin() * 8.0, epsilon = 1e-9);
        assert!(drifting.y.abs() <= 8.0);
    }

    #[test]
    fn tilt_follows_pointer() {
        let mut pointer = running(Highlight::None);
        let mut sink = Recorder::default();
        pointer.pointer_moved(at(100.0, -100.0), SIZE);
        pointer.tick(0.0, &mut sink);
        let t = sink.transforms[0];
        assert!(t.rotate_y > 0.0);
        assert!(t.rotate_x > 0.0, "pointer above centre tilts up");
        assert!(t.scale > 1.0 && t.scale <= 1.03);
    }

    #[test]
    fn sweep_respects_cooldown() {
        let mut pointer = running(Highlight::Sweep);
        let mut sink = Recorder::default();
        // far outside the magnet radius: ambient target of 80
        pointer.pointer_moved(at(1000.0, 0.0), SIZE);
        pointer.tick(1000.0, &mut sink);
        assert!(pointer.speed() > SWEEP_THRESHOLD);
        assert_eq!(sink.sweeps, 1);

        pointer.tick(1200.0, &mut sink);
        assert!(pointer.speed() > SWEEP_THRESHOLD);
        assert_eq!(sink.sweeps, 1, "crossing inside the cooldown is suppressed");

        pointer.tick(1380.0, &mut sink);
        assert!(pointer.speed() > SWEEP_THRESHOLD);
        assert_eq!(sink.sweeps, 2);
    }

    #[test]
    fn highlight_modes() {
        let mut fade = running(Highlight::FadeOnly);
        let mut sink = Recorder::default();
        fade.pointer_moved(at(1000.0, 0.0), SIZE);
        fade.tick(0.0, &mut sink);
        assert!(fade.speed() > SWEEP_THRESHOLD);
        assert_eq!(sink.sweeps, 0);
        assert!(sink.opacities.iter().all(|o| (0.55..=0.91).contains(o)));

        let mut none = running(Highlight::None);
        let mut sink = Recorder::default();
        none.tick(0.0, &mut sink);
        assert!(sink.opacities.is_empty());
    }

    #[test]
    fn reduced_motion_never_runs() {
        let config = MotionConfig {
            reduced_motion: true,
            ..MotionConfig::default()
        };
        let mut pointer = PointerLoop::new(&config, Highlight::Sweep);
        let mut sink = Recorder::default();
        assert!(!pointer.start());
        assert!(pointer.pointer_moved(at(10.0, 10.0), SIZE).is_none());
        assert!(!pointer.tick(16.0, &mut sink));
        assert!(sink.transforms.is_empty());
        assert_eq!(pointer.target(), Vec2::ZERO);
    }

    #[test]
    fn stopped_loop_does_nothing() {
        let mut pointer = running(Highlight::Sweep);
        let mut sink = Recorder::default();
        pointer.pointer_moved(at(50.0, 0.0), SIZE);
        assert!(pointer.tick(0.0, &mut sink));
        pointer.stop();
        assert!(!pointer.tick(16.0, &mut sink));
        assert_eq!(sink.transforms.len(), 1);
        assert_eq!(pointer.smoothed(), Vec2::ZERO);
        assert!(pointer.pointer_moved(at(50.0, 0.0), SIZE).is_none());
    }

    #[test]
    fn start_is_not_reentrant() {
        let mut pointer = running(Highlight::None);
        assert!(!pointer.start());
        pointer.stop();
        assert!(pointer.start());
    }

    #[test]
    fn magnet_payload_uses_camel_case() {
        let event = MagnetEvent {
            strength: 0.5,
            pointer_x: 1.0,
            pointer_y: 2.0,
            blob_center_x: 3.0,
            blob_center_y: 4.0,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "strength": 0.5,
                "pointerX": 1.0,
                "pointerY": 2.0,
                "blobCenterX": 3.0,
                "blobCenterY": 4.0
            })
        );
    }
}
