//! Eased page scrolling: wheel and touch input move a target, and every frame
//! the page position glides toward it over a fixed duration.

use crate::motion::Ease;

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothScrollOptions {
    /// Seconds to reach a new target.
    pub duration: f64,
    pub mouse_multiplier: f64,
    pub touch_multiplier: f64,
    pub smooth_touch: bool,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self {
            duration: 1.4,
            mouse_multiplier: 1.0,
            touch_multiplier: 2.0,
            smooth_touch: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Glide {
    from: f64,
    to: f64,
    duration: f64,
    started_at: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct SmoothScroll {
    options: SmoothScrollOptions,
    current: f64,
    target: f64,
    limit: f64,
    glide: Option<Glide>,
}

impl SmoothScroll {
    pub fn new(options: SmoothScrollOptions, position: f64, limit: f64) -> Self {
        let limit = limit.max(0.0);
        let position = position.clamp(0.0, limit);
        Self {
            options,
            current: position,
            target: position,
            limit,
            glide: None,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.glide.is_some()
    }

    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        if let Some(glide) = &mut self.glide {
            glide.to = glide.to.clamp(0.0, self.limit);
        }
    }

    pub fn on_wheel(&mut self, delta: f64) {
        let target = self.target + delta * self.options.mouse_multiplier;
        self.glide_to(target, self.options.duration);
    }

    /// Returns whether the gesture was taken over; when it was not, the
    /// browser should scroll natively.
    pub fn on_touch(&mut self, delta: f64) -> bool {
        if !self.options.smooth_touch {
            return false;
        }
        let target = self.target + delta * self.options.touch_multiplier;
        self.glide_to(target, self.options.duration);
        true
    }

    pub fn scroll_to(&mut self, target: f64, duration: Option<f64>) {
        self.glide_to(target, duration.unwrap_or(self.options.duration));
    }

    /// Adopts a position the browser reached on its own (scrollbar drag,
    /// keyboard). Ignored while gliding, since the glide itself moves the page.
    pub fn sync_native(&mut self, position: f64) {
        if self.glide.is_none() {
            self.current = position.clamp(0.0, self.limit);
            self.target = self.current;
        }
    }

    /// Advances the glide to `time_ms`. Returns the position to write, or
    /// `None` when nothing is moving.
    pub fn raf(&mut self, time_ms: f64) -> Option<f64> {
        let glide = self.glide.as_mut()?;
        let started = *glide.started_at.get_or_insert(time_ms);
        let t = if glide.duration <= 0.0 {
            1.0
        } else {
            ((time_ms - started) / 1000.0 / glide.duration).min(1.0)
        };
        let eased = Ease::ExpoOut.apply(t);
        self.current = glide.from + (glide.to - glide.from) * eased;
        if t >= 1.0 {
            self.current = glide.to;
            self.glide = None;
        }
        Some(self.current)
    }

    fn glide_to(&mut self, target: f64, duration: f64) {
        self.target = target.clamp(0.0, self.limit);
        if (self.target - self.current).abs() < f64::EPSILON {
            self.glide = None;
            return;
        }
        self.glide = Some(Glide {
            from: self.current,
            to: self.target,
            duration,
            started_at: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn scroller() -> SmoothScroll {
        SmoothScroll::new(SmoothScrollOptions::default(), 0.0, 5000.0)
    }

    #[test]
    fn wheel_glides_to_target() {
        let mut s = scroller();
        s.on_wheel(400.0);
        assert_eq!(s.target(), 400.0);

        assert_eq!(s.raf(1000.0), Some(0.0));
        let mid = s.raf(1700.0).unwrap();
        assert!(mid > 300.0 && mid < 400.0, "{mid}");
        assert_eq!(s.raf(2400.0), Some(400.0));
        assert!(!s.is_animating());
        assert_eq!(s.raf(2500.0), None);
    }

    #[test]
    fn consecutive_wheel_deltas_accumulate() {
        let mut s = scroller();
        s.on_wheel(100.0);
        s.raf(0.0);
        s.raf(100.0);
        s.on_wheel(100.0);
        assert_eq!(s.target(), 200.0);
        let resumed = s.raf(200.0).unwrap();
        assert!(resumed > 0.0 && resumed < 200.0);
    }

    #[test]
    fn targets_are_clamped() {
        let mut s = scroller();
        s.on_wheel(-300.0);
        assert_eq!(s.target(), 0.0);
        assert!(!s.is_animating());
        s.scroll_to(9000.0, Some(1.5));
        assert_eq!(s.target(), 5000.0);
        s.set_limit(1000.0);
        assert_eq!(s.target(), 1000.0);
    }

    #[test]
    fn touch_uses_its_multiplier() {
        let mut s = scroller();
        assert!(s.on_touch(50.0));
        assert_eq!(s.target(), 100.0);

        let mut native = SmoothScroll::new(
            SmoothScrollOptions {
                smooth_touch: false,
                ..SmoothScrollOptions::default()
            },
            0.0,
            5000.0,
        );
        assert!(!native.on_touch(50.0));
        assert_eq!(native.target(), 0.0);
    }

    #[test]
    fn native_scroll_is_adopted_only_when_idle() {
        let mut s = scroller();
        s.sync_native(750.0);
        assert_eq!(s.current(), 750.0);
        s.on_wheel(100.0);
        s.sync_native(10.0);
        assert_eq!(s.target(), 850.0);
    }

    #[test]
    fn custom_duration_is_honoured() {
        let mut s = scroller();
        s.scroll_to(1000.0, Some(0.5));
        s.raf(0.0);
        assert_abs_diff_eq!(s.raf(500.0).unwrap(), 1000.0, epsilon = 1e-9);
        assert!(!s.is_animating());
    }
}
