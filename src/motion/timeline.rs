//! Time math for tweens and timelines. Nothing in here touches the DOM: a
//! track addresses its element by index into whatever target list the player
//! holds, and sampling reports eased progress per track.

use super::easing::Ease;
use super::style::Prop;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    /// Seconds.
    pub duration: f64,
    /// Seconds before the tween starts, on top of its position in a timeline.
    pub delay: f64,
    pub ease: Ease,
    pub yoyo: bool,
    pub repeat: u32,
}

impl TweenSpec {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            delay: 0.0,
            ease: Ease::default(),
            yoyo: false,
            repeat: 0,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Plays forward then backward, `repeat` extra times in total.
    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.yoyo = true;
        self.repeat = repeat;
        self
    }

    pub fn total(&self) -> f64 {
        self.delay + self.duration * (self.repeat as f64 + 1.0)
    }

    pub fn has_started(&self, t: f64) -> bool {
        t >= self.delay
    }

    /// Eased progress at `t` seconds after the tween was scheduled.
    pub fn progress_at(&self, t: f64) -> f64 {
        let local = t - self.delay;
        if local < 0.0 {
            return 0.0;
        }
        let cycles = self.repeat as f64 + 1.0;
        if self.duration <= 0.0 || local >= self.duration * cycles {
            return self.final_progress();
        }
        let iteration = (local / self.duration).floor();
        let frac = (local - iteration * self.duration) / self.duration;
        if self.yoyo && iteration as u64 % 2 == 1 {
            self.ease.apply(1.0 - frac)
        } else {
            self.ease.apply(frac)
        }
    }

    fn final_progress(&self) -> f64 {
        if self.yoyo && self.repeat % 2 == 1 {
            0.0
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub target: usize,
    pub prop: Prop,
    /// `None` takes the element's value at the moment the track starts.
    pub from: Option<f64>,
    pub to: f64,
    /// Offset from the timeline start, seconds.
    pub at: f64,
    pub spec: TweenSpec,
}

impl Track {
    pub fn end(&self) -> f64 {
        self.at + self.spec.total()
    }

    pub fn value(&self, from: f64, progress: f64) -> f64 {
        from + (self.to - from) * progress
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    tracks: Vec<Track>,
    repeat: Repeat,
    repeat_delay: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            repeat: Repeat::Count(0),
            repeat_delay: 0.0,
        }
    }

    pub fn with_repeat(mut self, repeat: Repeat, repeat_delay: f64) -> Self {
        self.repeat = repeat;
        self.repeat_delay = repeat_delay;
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Tweens `target` from its current values to `props`.
    pub fn add(&mut self, target: usize, props: &[(Prop, f64)], spec: TweenSpec, at: f64) -> &mut Self {
        for &(prop, to) in props {
            self.tracks.push(Track {
                target,
                prop,
                from: None,
                to,
                at,
                spec,
            });
        }
        self
    }

    /// Like [`Timeline::add`] with explicit start values. Props missing from
    /// `from` start at their current value.
    pub fn add_from_to(
        &mut self,
        target: usize,
        from: &[(Prop, f64)],
        to: &[(Prop, f64)],
        spec: TweenSpec,
        at: f64,
    ) -> &mut Self {
        for &(prop, to) in to {
            let from = from.iter().find(|(p, _)| *p == prop).map(|(_, v)| *v);
            self.tracks.push(Track {
                target,
                prop,
                from,
                to,
                at,
                spec,
            });
        }
        self
    }

    /// Same tween on every target, each starting `each` seconds after the
    /// previous one.
    pub fn stagger(
        &mut self,
        targets: impl IntoIterator<Item = usize>,
        props: &[(Prop, f64)],
        spec: TweenSpec,
        at: f64,
        each: f64,
    ) -> &mut Self {
        for (i, target) in targets.into_iter().enumerate() {
            self.add(target, props, spec, at + each * i as f64);
        }
        self
    }

    /// End time of the most recently added track.
    pub fn last_end(&self) -> f64 {
        self.tracks.last().map(Track::end).unwrap_or(0.0)
    }

    pub fn cycle_duration(&self) -> f64 {
        self.tracks.iter().map(Track::end).fold(0.0, f64::max)
    }

    pub fn total_duration(&self) -> Option<f64> {
        match self.repeat {
            Repeat::Count(n) => {
                Some(self.cycle_duration() * (n as f64 + 1.0) + self.repeat_delay * n as f64)
            }
            Repeat::Infinite => None,
        }
    }

    pub fn is_complete(&self, elapsed: f64) -> bool {
        self.total_duration().map_or(false, |total| elapsed >= total)
    }

    /// Position inside the current cycle. During a repeat delay the end of
    /// the cycle is held.
    pub fn local_time(&self, elapsed: f64) -> f64 {
        let cycle = self.cycle_duration();
        if self.is_complete(elapsed) {
            return cycle;
        }
        let period = cycle + self.repeat_delay;
        if period <= 0.0 {
            return cycle;
        }
        let iteration = (elapsed.max(0.0) / period).floor();
        (elapsed - iteration * period).min(cycle)
    }

    /// Calls `emit(index, track, progress)` for every track that has started
    /// at timeline time `t`, in insertion order.
    pub fn sample(&self, t: f64, mut emit: impl FnMut(usize, &Track, f64)) {
        for (index, track) in self.tracks.iter().enumerate() {
            let local = t - track.at;
            if local < 0.0 || !track.spec.has_started(local) {
                continue;
            }
            emit(index, track, track.spec.progress_at(local));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tween_progress_respects_delay() {
        let spec = TweenSpec::new(1.0).ease(Ease::Linear).delay(0.5);
        assert_eq!(spec.progress_at(0.25), 0.0);
        assert!(!spec.has_started(0.25));
        assert_abs_diff_eq!(spec.progress_at(1.0), 0.5, epsilon = 1e-9);
        assert_eq!(spec.progress_at(3.0), 1.0);
        assert_abs_diff_eq!(spec.total(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let spec = TweenSpec::new(0.5).ease(Ease::Linear).yoyo(1);
        assert_abs_diff_eq!(spec.progress_at(0.25), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(spec.progress_at(0.6), 0.8, epsilon = 1e-9);
        assert_eq!(spec.progress_at(1.0), 0.0);
        assert_abs_diff_eq!(spec.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let spec = TweenSpec::new(0.0);
        assert_eq!(spec.progress_at(0.0), 1.0);
    }

    #[test]
    fn stagger_offsets_starts() {
        let mut tl = Timeline::new();
        tl.stagger(0..4, &[(Prop::Opacity, 1.0)], TweenSpec::new(0.5), 0.0, 0.06);
        let starts: Vec<f64> = tl.tracks().iter().map(|t| t.at).collect();
        assert_abs_diff_eq!(starts[3], 0.18, epsilon = 1e-9);
        assert_abs_diff_eq!(tl.cycle_duration(), 0.68, epsilon = 1e-9);
    }

    #[test]
    fn unstarted_tracks_are_not_sampled() {
        let mut tl = Timeline::new();
        tl.add(0, &[(Prop::Opacity, 1.0)], TweenSpec::new(0.35), 0.0);
        tl.add(0, &[(Prop::Opacity, 0.0)], TweenSpec::new(0.5), 0.7);

        let mut seen = Vec::new();
        tl.sample(0.5, |index, _, _| seen.push(index));
        assert_eq!(seen, vec![0]);

        seen.clear();
        tl.sample(0.8, |index, _, _| seen.push(index));
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn repeat_delay_holds_the_end() {
        let mut tl = Timeline::new().with_repeat(Repeat::Infinite, 2.5);
        tl.add(0, &[(Prop::Glow, 1.0)], TweenSpec::new(1.0), 0.0);
        assert_abs_diff_eq!(tl.local_time(0.4), 0.4, epsilon = 1e-9);
        assert_abs_diff_eq!(tl.local_time(2.0), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tl.local_time(3.6), 0.1, epsilon = 1e-9);
        assert!(!tl.is_complete(1e6));
        assert_eq!(tl.total_duration(), None);
    }

    #[test]
    fn counted_repeat_completes() {
        let mut tl = Timeline::new().with_repeat(Repeat::Count(1), 1.0);
        tl.add(0, &[(Prop::X, 10.0)], TweenSpec::new(2.0), 0.0);
        assert_eq!(tl.total_duration(), Some(5.0));
        assert!(!tl.is_complete(4.9));
        assert!(tl.is_complete(5.0));
        assert_abs_diff_eq!(tl.local_time(6.0), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn from_to_keeps_explicit_starts() {
        let mut tl = Timeline::new();
        tl.add_from_to(
            0,
            &[(Prop::DashOffset, 100.0)],
            &[(Prop::DashOffset, 20.0), (Prop::Opacity, 1.0)],
            TweenSpec::new(0.5),
            0.0,
        );
        assert_eq!(tl.tracks()[0].from, Some(100.0));
        assert_eq!(tl.tracks()[1].from, None);
        assert_abs_diff_eq!(tl.tracks()[0].value(100.0, 0.5), 60.0, epsilon = 1e-9);
    }
}
