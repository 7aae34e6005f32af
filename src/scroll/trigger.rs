//! Scroll trigger geometry: where an effect starts and ends in scroll space,
//! how far along it is, and how scrubbed progress catches up.

/// A point on the element lined up with a line across the viewport. Both are
/// fractions: `element` of the element's height (0 top, 1 bottom), `viewport`
/// of the viewport height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub element: f64,
    pub viewport: f64,
}

impl Position {
    pub const TOP_TOP: Position = Position { element: 0.0, viewport: 0.0 };
    pub const TOP_BOTTOM: Position = Position { element: 0.0, viewport: 1.0 };
    pub const BOTTOM_TOP: Position = Position { element: 1.0, viewport: 0.0 };

    /// Element top reaching `percent` of the viewport height.
    pub const fn top_at(percent: f64) -> Position {
        Position {
            element: 0.0,
            viewport: percent / 100.0,
        }
    }

    pub const fn center_at(percent: f64) -> Position {
        Position {
            element: 0.5,
            viewport: percent / 100.0,
        }
    }

    /// Scroll offset at which the two lines meet.
    fn scroll_for(&self, doc_top: f64, height: f64, viewport_h: f64) -> f64 {
        doc_top + self.element * height - self.viewport * viewport_h
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum End {
    At(Position),
    /// Fixed scroll distance past the start.
    Distance(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerBounds {
    pub start: f64,
    pub end: f64,
}

impl TriggerBounds {
    pub fn measure(doc_top: f64, height: f64, viewport_h: f64, start: Position, end: End) -> Self {
        let start = start.scroll_for(doc_top, height, viewport_h);
        let end = match end {
            End::At(position) => position.scroll_for(doc_top, height, viewport_h),
            End::Distance(distance) => start + distance,
        };
        Self { start, end }
    }

    pub fn progress(&self, scroll: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn is_past_start(&self, scroll: f64) -> bool {
        scroll >= self.start
    }
}

/// Progress of an element travelling right-to-left across the viewport,
/// from its left edge at the viewport's right edge to its right edge at the
/// viewport's left edge.
pub fn horizontal_progress(left: f64, width: f64, viewport_w: f64) -> f64 {
    let span = viewport_w + width;
    if span <= 0.0 {
        return 0.0;
    }
    ((viewport_w - left) / span).clamp(0.0, 1.0)
}

/// Fires once, the first time the scroll position passes the start.
#[derive(Clone, Debug, Default)]
pub struct OnceTrigger {
    fired: bool,
}

impl OnceTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn update(&mut self, bounds: &TriggerBounds, scroll: f64) -> bool {
        if self.fired || !bounds.is_past_start(scroll) {
            return false;
        }
        self.fired = true;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scrub {
    Immediate,
    /// Seconds the rendered progress takes to catch up with the scroll.
    Smooth(f64),
}

#[derive(Clone, Debug)]
pub struct ScrubState {
    scrub: Scrub,
    current: Option<f64>,
}

impl ScrubState {
    pub fn new(scrub: Scrub) -> Self {
        Self { scrub, current: None }
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Moves toward `target` for a frame `dt` seconds long. The first call
    /// lands on the target so a freshly measured scene starts in place.
    pub fn step(&mut self, target: f64, dt: f64) -> f64 {
        let next = match (self.scrub, self.current) {
            (Scrub::Immediate, _) | (_, None) => target,
            (Scrub::Smooth(secs), Some(current)) => {
                if secs <= 0.0 {
                    target
                } else {
                    let alpha = 1.0 - (-4.0 * dt.max(0.0) / secs).exp();
                    let next = current + (target - current) * alpha;
                    if (target - next).abs() < 1e-4 {
                        target
                    } else {
                        next
                    }
                }
            }
        };
        self.current = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn top_top_to_bottom_top_spans_element_height() {
        let bounds = TriggerBounds::measure(0.0, 900.0, 800.0, Position::TOP_TOP, End::At(Position::BOTTOM_TOP));
        assert_eq!(bounds, TriggerBounds { start: 0.0, end: 900.0 });
        assert_abs_diff_eq!(bounds.progress(450.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn percentage_lines_offset_the_start() {
        let bounds = TriggerBounds::measure(
            2000.0,
            400.0,
            1000.0,
            Position::top_at(85.0),
            End::At(Position::center_at(30.0)),
        );
        assert_abs_diff_eq!(bounds.start, 1150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.end, 1900.0, epsilon = 1e-9);
    }

    #[test]
    fn distance_end_is_relative_to_start() {
        let bounds = TriggerBounds::measure(3000.0, 800.0, 800.0, Position::TOP_TOP, End::Distance(2000.0));
        assert_eq!(bounds.end, 5000.0);
        assert_eq!(bounds.progress(2000.0), 0.0);
        assert_eq!(bounds.progress(4000.0), 0.5);
        assert_eq!(bounds.progress(9000.0), 1.0);
    }

    #[test]
    fn empty_span_is_a_step() {
        let bounds = TriggerBounds { start: 100.0, end: 100.0 };
        assert_eq!(bounds.progress(99.0), 0.0);
        assert_eq!(bounds.progress(100.0), 1.0);
    }

    #[test]
    fn once_trigger_fires_a_single_time() {
        let bounds = TriggerBounds { start: 500.0, end: 500.0 };
        let mut trigger = OnceTrigger::new();
        assert!(!trigger.update(&bounds, 100.0));
        assert!(trigger.update(&bounds, 600.0));
        assert!(!trigger.update(&bounds, 100.0));
        assert!(!trigger.update(&bounds, 700.0));
        assert!(trigger.has_fired());
    }

    #[test]
    fn horizontal_progress_crosses_viewport() {
        assert_eq!(horizontal_progress(1200.0, 600.0, 1200.0), 0.0);
        assert_abs_diff_eq!(horizontal_progress(300.0, 600.0, 1200.0), 0.5, epsilon = 1e-9);
        assert_eq!(horizontal_progress(-600.0, 600.0, 1200.0), 1.0);
    }

    #[test]
    fn smooth_scrub_converges() {
        let mut scrub = ScrubState::new(Scrub::Smooth(0.5));
        assert_eq!(scrub.step(0.0, 0.016), 0.0);
        let mut last = 0.0;
        for _ in 0..10 {
            let next = scrub.step(1.0, 0.016);
            assert!(next > last && next < 1.0);
            last = next;
        }
        for _ in 0..200 {
            scrub.step(1.0, 0.016);
        }
        assert_eq!(scrub.current(), Some(1.0));
    }

    #[test]
    fn immediate_scrub_follows_exactly() {
        let mut scrub = ScrubState::new(Scrub::Immediate);
        scrub.step(0.1, 0.016);
        assert_eq!(scrub.step(0.8, 0.016), 0.8);
    }
}
