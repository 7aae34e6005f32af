use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use web_sys::Element;

use super::style::{Prop, StyleState};
use super::timeline::{Timeline, TweenSpec};
use crate::dom;
use crate::frame::FrameLoop;

/// An element together with the style values the animator has written to it.
pub struct AnimatedElement {
    el: Element,
    state: RefCell<StyleState>,
    transformed: Cell<bool>,
}

impl AnimatedElement {
    pub fn new(el: Element) -> Rc<Self> {
        Rc::new(Self {
            el,
            state: RefCell::new(StyleState::default()),
            transformed: Cell::new(false),
        })
    }

    pub fn element(&self) -> &Element {
        &self.el
    }

    pub fn get(&self, prop: Prop) -> f64 {
        self.state.borrow().get(prop)
    }

    /// Writes `props` straight away, without tweening.
    pub fn set(&self, props: &[(Prop, f64)]) {
        for &(prop, value) in props {
            self.write(prop, value);
        }
        self.flush();
    }

    pub fn set_perspective(&self, perspective: Option<f64>) {
        self.state.borrow_mut().perspective = perspective;
        self.transformed.set(true);
    }

    /// Forgets glow and writes the cleared colour.
    pub fn clear_glow(&self) {
        self.state.borrow_mut().glow = None;
        dom::clear_style(&self.el, "color");
        dom::clear_style(&self.el, "text-shadow");
    }

    fn write(&self, prop: Prop, value: f64) {
        if prop.is_transform() {
            self.transformed.set(true);
        }
        self.state.borrow_mut().set(prop, value);
    }

    pub fn flush(&self) {
        let state = self.state.borrow();
        if self.transformed.get() {
            dom::set_style(&self.el, "transform", &state.transform_css());
        }
        if let Some(opacity) = state.opacity {
            dom::set_style(&self.el, "opacity", &format!("{}", opacity));
        }
        if state.glow.is_some() {
            match state.glow_css() {
                Some((color, shadow)) => {
                    dom::set_style(&self.el, "color", &color);
                    dom::set_style(&self.el, "text-shadow", &shadow);
                }
                None => {
                    dom::clear_style(&self.el, "color");
                    dom::clear_style(&self.el, "text-shadow");
                }
            }
        }
        if let Some(offset) = state.dash_offset {
            dom::set_style(&self.el, "stroke-dashoffset", &format!("{}", offset));
        }
        if let Some(width) = state.width_percent {
            dom::set_style(&self.el, "width", &format!("{}%", width));
        }
    }
}

/// Applies `timeline` at local time `t`, resolving missing start values from
/// the targets the first time each track runs.
fn render(
    targets: &[Rc<AnimatedElement>],
    timeline: &Timeline,
    froms: &mut [Option<f64>],
    muted: &[bool],
    t: f64,
) {
    timeline.sample(t, |index, track, progress| {
        if muted.get(index).copied().unwrap_or(false) {
            return;
        }
        let Some(target) = targets.get(track.target) else {
            return;
        };
        let from = *froms[index].get_or_insert_with(|| target.get(track.prop));
        target.write(track.prop, track.value(from, progress));
    });
    for target in targets {
        target.flush();
    }
}

struct Playing {
    id: u64,
    targets: Vec<Rc<AnimatedElement>>,
    timeline: Timeline,
    froms: Vec<Option<f64>>,
    muted: Vec<bool>,
    started_at: Option<f64>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl Playing {
    fn mute(&mut self, target: &Rc<AnimatedElement>, prop: Prop) {
        for (index, track) in self.timeline.tracks().iter().enumerate() {
            let same_target = self
                .targets
                .get(track.target)
                .map_or(false, |t| Rc::ptr_eq(t, target));
            if same_target && track.prop == prop {
                self.muted[index] = true;
            }
        }
    }

    fn touches(&self, target: &Rc<AnimatedElement>) -> bool {
        self.targets.iter().any(|t| Rc::ptr_eq(t, target))
    }

    fn fully_muted(&self) -> bool {
        self.muted.iter().all(|m| *m)
    }
}

#[derive(Default)]
struct Inner {
    playing: RefCell<Vec<Playing>>,
    frame: RefCell<Option<FrameLoop>>,
    next_id: Cell<u64>,
}

impl Inner {
    fn tick(&self, timestamp: f64) -> bool {
        let mut playing = std::mem::take(&mut *self.playing.borrow_mut());
        let mut finished = Vec::new();
        playing.retain_mut(|p| {
            let started = *p.started_at.get_or_insert(timestamp);
            let elapsed = (timestamp - started) / 1000.0;
            let t = p.timeline.local_time(elapsed);
            render(&p.targets, &p.timeline, &mut p.froms, &p.muted, t);
            if p.timeline.is_complete(elapsed) {
                finished.push(p.on_complete.take());
                false
            } else {
                true
            }
        });
        {
            let mut current = self.playing.borrow_mut();
            playing.append(&mut current);
            *current = playing;
        }
        // Callbacks may start or kill animations, so they run last.
        for callback in finished.into_iter().flatten() {
            callback();
        }
        !self.playing.borrow().is_empty()
    }

    fn kill(&self, id: u64) {
        self.playing.borrow_mut().retain(|p| p.id != id);
    }
}

/// Plays timelines on a shared animation frame loop. The loop only runs while
/// something is playing.
#[derive(Clone, Default)]
pub struct Animator {
    inner: Rc<Inner>,
}

impl PartialEq for Animator {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&self, targets: Vec<Rc<AnimatedElement>>, timeline: Timeline) -> TweenHandle {
        self.play_inner(targets, timeline, None)
    }

    pub fn play_then<F>(&self, targets: Vec<Rc<AnimatedElement>>, timeline: Timeline, on_complete: F) -> TweenHandle
    where
        F: FnOnce() + 'static,
    {
        self.play_inner(targets, timeline, Some(Box::new(on_complete)))
    }

    pub fn to(&self, target: &Rc<AnimatedElement>, props: &[(Prop, f64)], spec: TweenSpec) -> TweenHandle {
        let mut timeline = Timeline::new();
        timeline.add(0, props, spec, 0.0);
        self.play(vec![target.clone()], timeline)
    }

    pub fn to_then<F>(
        &self,
        target: &Rc<AnimatedElement>,
        props: &[(Prop, f64)],
        spec: TweenSpec,
        on_complete: F,
    ) -> TweenHandle
    where
        F: FnOnce() + 'static,
    {
        let mut timeline = Timeline::new();
        timeline.add(0, props, spec, 0.0);
        self.play_then(vec![target.clone()], timeline, on_complete)
    }

    pub fn from_to(
        &self,
        target: &Rc<AnimatedElement>,
        from: &[(Prop, f64)],
        to: &[(Prop, f64)],
        spec: TweenSpec,
    ) -> TweenHandle {
        let mut timeline = Timeline::new();
        timeline.add_from_to(0, from, to, spec, 0.0);
        self.play(vec![target.clone()], timeline)
    }

    /// Tweens `props`, first taking them away from anything already animating
    /// them on `target`.
    pub fn to_overwrite(&self, target: &Rc<AnimatedElement>, props: &[(Prop, f64)], spec: TweenSpec) -> TweenHandle {
        self.overwrite(target, props.iter().map(|(p, _)| *p));
        self.to(target, props, spec)
    }

    pub fn overwrite(&self, target: &Rc<AnimatedElement>, props: impl IntoIterator<Item = Prop>) {
        let mut playing = self.inner.playing.borrow_mut();
        for prop in props {
            for p in playing.iter_mut() {
                p.mute(target, prop);
            }
        }
        playing.retain(|p| !p.fully_muted());
    }

    /// Kills every animation that writes to `target`.
    pub fn kill_tweens_of(&self, target: &Rc<AnimatedElement>) {
        self.inner.playing.borrow_mut().retain(|p| !p.touches(target));
    }

    fn play_inner(
        &self,
        targets: Vec<Rc<AnimatedElement>>,
        timeline: Timeline,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> TweenHandle {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        let froms = timeline.tracks().iter().map(|t| t.from).collect();
        let muted = vec![false; timeline.tracks().len()];
        self.inner.playing.borrow_mut().push(Playing {
            id,
            targets,
            timeline,
            froms,
            muted,
            started_at: None,
            on_complete,
        });
        self.ensure_running();
        TweenHandle {
            id,
            animator: Rc::downgrade(&self.inner),
        }
    }

    fn ensure_running(&self) {
        let running = self
            .inner
            .frame
            .borrow()
            .as_ref()
            .map_or(false, FrameLoop::is_running);
        if running {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let frame = FrameLoop::start(move |timestamp| match weak.upgrade() {
            Some(inner) => inner.tick(timestamp),
            None => false,
        });
        *self.inner.frame.borrow_mut() = Some(frame);
    }
}

/// Handle to a playing timeline.
#[derive(Clone)]
pub struct TweenHandle {
    id: u64,
    animator: Weak<Inner>,
}

impl TweenHandle {
    pub fn kill(&self) {
        if let Some(inner) = self.animator.upgrade() {
            inner.kill(self.id);
        }
    }
}

/// A timeline driven by an external progress value instead of the clock.
pub struct Scrubbed {
    targets: Vec<Rc<AnimatedElement>>,
    timeline: Timeline,
    froms: Vec<Option<f64>>,
    muted: Vec<bool>,
}

impl Scrubbed {
    pub fn new(targets: Vec<Rc<AnimatedElement>>, timeline: Timeline) -> Self {
        let froms = timeline.tracks().iter().map(|t| t.from).collect();
        let muted = vec![false; timeline.tracks().len()];
        Self {
            targets,
            timeline,
            froms,
            muted,
        }
    }

    pub fn render(&mut self, progress: f64) {
        let t = progress.clamp(0.0, 1.0) * self.timeline.cycle_duration();
        render(&self.targets, &self.timeline, &mut self.froms, &self.muted, t);
    }
}
