//! The animated testimonial block: a quote revealed word by word, a wave of
//! colour running through it, sparkles, and a visual that leans toward the
//! pointer.

pub mod activation;
pub mod pointer;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Math};
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, SvgGeometryElement,
};

use crate::config::{self, MotionConfig};
use crate::dom::{self, Listener};
use crate::error::{EffectError, EffectResult};
use crate::frame::FrameLoop;
use crate::motion::{AnimatedElement, Animator, Ease, Prop, Repeat, Timeline, TweenHandle, TweenSpec};
use activation::{Activated, Activation};
use pointer::{Highlight, PointerLoop, TransformSink, Vec2, VisualTransform};

pub const ENTER_EVENT: &str = "morphic:enter";
pub const LEAVE_EVENT: &str = "morphic:leave";
pub const MAGNET_EVENT: &str = "morphic:cursor-magnet";

/// The elements the block animates. Everything but the section is optional.
pub struct TestimonialParts {
    pub section: Element,
    pub quote: Option<Element>,
    pub title: Option<Element>,
    pub words: Vec<Element>,
    /// Receives pointer events.
    pub visual: Option<Element>,
    /// Tilted and translated every frame.
    pub shape: Option<Element>,
    pub highlight: Option<Element>,
    pub sparks: Vec<Element>,
}

impl TestimonialParts {
    pub fn collect(section: Element) -> Self {
        let first = |selector| dom::query(&section, selector).ok();
        let quote = first(".morphic-quote");
        let mut words = dom::query_all(&section, ".morphic-word");
        if words.is_empty() {
            if let Some(quote) = &quote {
                words = split_into_words(quote);
            }
        }
        let sparks = match first(".spark-layer") {
            Some(layer) => dom::query_all(&layer, ".spark"),
            None => Vec::new(),
        };
        Self {
            title: first(".morphic-title"),
            visual: first(".tooth-orb"),
            shape: first(".tooth-simple, .tooth2d-outline, .tooth-shape"),
            highlight: first(".tooth2d-highlight, .tooth-shine"),
            quote,
            words,
            sparks,
            section,
        }
    }
}

/// Replaces the quote's text with one `.morphic-word` span per word.
fn split_into_words(quote: &Element) -> Vec<Element> {
    let Ok(document) = dom::document() else {
        return Vec::new();
    };
    let text = quote.text_content().unwrap_or_default();
    quote.set_inner_html("");
    let mut spans = Vec::new();
    for word in text.split_whitespace() {
        let Ok(span) = document.create_element("span") else {
            continue;
        };
        span.set_class_name("morphic-word");
        span.set_text_content(Some(&format!("{} ", word)));
        if quote.append_child(&span).is_ok() {
            spans.push(span);
        }
    }
    spans
}

/// Writes the loop's output to the shape and highlight elements.
struct DomSink {
    animator: Animator,
    shape: Rc<AnimatedElement>,
    highlight: Option<Rc<AnimatedElement>>,
    path_length: Option<f64>,
}

impl TransformSink for DomSink {
    fn apply_transform(&mut self, t: VisualTransform) {
        self.shape.set(&[
            (Prop::X, t.x),
            (Prop::Y, t.y),
            (Prop::Scale, t.scale),
            (Prop::RotateX, t.rotate_x),
            (Prop::RotateY, t.rotate_y),
        ]);
    }

    fn set_highlight_opacity(&mut self, opacity: f64) {
        if let Some(highlight) = &self.highlight {
            self.animator.to_overwrite(
                highlight,
                &[(Prop::Opacity, opacity)],
                TweenSpec::new(0.25).ease(Ease::SineOut),
            );
        }
    }

    fn sweep(&mut self) {
        let (Some(highlight), Some(length)) = (&self.highlight, self.path_length) else {
            return;
        };
        debug!("highlight sweep");
        self.animator.overwrite(highlight, [Prop::DashOffset]);
        let mut timeline = Timeline::new();
        timeline
            .add_from_to(
                0,
                &[(Prop::DashOffset, length)],
                &[(Prop::DashOffset, length * 0.2)],
                TweenSpec::new(0.5).ease(Ease::Power2Out),
                0.0,
            )
            .add(
                0,
                &[(Prop::DashOffset, length * 0.9)],
                TweenSpec::new(0.6).ease(Ease::SineIn),
                0.5,
            );
        self.animator.play(vec![highlight.clone()], timeline);
    }
}

/// Prepares the highlight for stroke sweeps and returns its path length.
fn prepare_sweep(highlight: &Rc<AnimatedElement>) -> EffectResult<f64> {
    let geometry = highlight
        .element()
        .dyn_ref::<SvgGeometryElement>()
        .ok_or(EffectError::NotAPath)?;
    let length = geometry.get_total_length() as f64;
    if length <= 0.0 {
        return Err(EffectError::NotAPath);
    }
    dom::set_style(highlight.element(), "stroke-dasharray", &format!("{}", length));
    highlight.set(&[(Prop::DashOffset, length * 0.9)]);
    Ok(length)
}

/// A spark between twinkles: hidden, at its base scale.
fn spark_rest(base_scale: f64) -> [(Prop, f64); 2] {
    [(Prop::Scale, base_scale), (Prop::Opacity, 0.0)]
}

/// One twinkle: fade in while swelling, fade out just before the swell ends.
fn sparkle_timeline(base_scale: f64, repeat_delay: f64) -> Timeline {
    let mut timeline = Timeline::new().with_repeat(Repeat::Infinite, repeat_delay);
    timeline
        .add(0, &[(Prop::Opacity, 1.0)], TweenSpec::new(0.35).ease(Ease::SineOut), 0.0)
        .add(
            0,
            &[(Prop::Scale, base_scale * 1.8)],
            TweenSpec::new(0.9).ease(Ease::SineInOut),
            0.0,
        );
    let fade_at = timeline.last_end() - 0.2;
    timeline.add(0, &[(Prop::Opacity, 0.0)], TweenSpec::new(0.5).ease(Ease::SineIn), fade_at);
    timeline
}

type ObserverCallback = Closure<dyn FnMut(Array)>;

/// One mounted testimonial block. The component that mounts it owns the
/// handle and must call [`MorphicTestimonial::destroy`] when it goes away.
pub struct MorphicTestimonial {
    parts: TestimonialParts,
    config: MotionConfig,
    animator: Animator,
    words: Vec<Rc<AnimatedElement>>,
    title: Option<Rc<AnimatedElement>>,
    shape: Option<Rc<AnimatedElement>>,
    highlight: Option<Rc<AnimatedElement>>,
    sparks: Vec<Rc<AnimatedElement>>,
    path_length: Option<f64>,
    activation: RefCell<Activation>,
    pointer: Rc<RefCell<PointerLoop>>,
    frame: RefCell<Option<FrameLoop>>,
    pointer_listeners: RefCell<Vec<Listener>>,
    idle_timer: Rc<RefCell<Option<Timeout>>>,
    reveal: RefCell<Vec<TweenHandle>>,
    wave: RefCell<Option<TweenHandle>>,
    sparkles: RefCell<Vec<TweenHandle>>,
    observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    destroyed: Cell<bool>,
}

impl MorphicTestimonial {
    pub fn mount(parts: TestimonialParts, config: MotionConfig, animator: Animator) -> Rc<Self> {
        let words: Vec<_> = parts.words.iter().cloned().map(AnimatedElement::new).collect();
        let title = parts.title.clone().map(AnimatedElement::new);
        let shape = parts.shape.clone().map(AnimatedElement::new);
        let highlight = parts.highlight.clone().map(AnimatedElement::new);
        let sparks = parts.sparks.iter().cloned().map(AnimatedElement::new).collect();

        let path_length = match (&highlight, config.reduced_motion) {
            (Some(highlight), false) => match prepare_sweep(highlight) {
                Ok(length) => Some(length),
                Err(e) => {
                    warn!("testimonial sweep disabled: {}", e);
                    None
                }
            },
            _ => None,
        };
        let highlight_mode = match (&highlight, path_length) {
            (None, _) => Highlight::None,
            (Some(_), None) => Highlight::FadeOnly,
            (Some(_), Some(_)) => Highlight::Sweep,
        };

        let block = Rc::new(Self {
            pointer: Rc::new(RefCell::new(PointerLoop::new(&config, highlight_mode))),
            parts,
            config,
            animator,
            words,
            title,
            shape,
            highlight,
            sparks,
            path_length,
            activation: RefCell::new(Activation::default()),
            frame: RefCell::new(None),
            pointer_listeners: RefCell::new(Vec::new()),
            idle_timer: Rc::new(RefCell::new(None)),
            reveal: RefCell::new(Vec::new()),
            wave: RefCell::new(None),
            sparkles: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            destroyed: Cell::new(false),
        });
        block.setup();
        block
    }

    fn setup(self: &Rc<Self>) {
        if let Some(quote) = &self.parts.quote {
            let _ = quote.set_attribute("aria-live", "polite");
            if self.config.reduced_motion {
                dom::set_style(quote, "opacity", "1");
            }
        }
        if self.config.reduced_motion {
            info!("testimonial: reduced motion, animations off");
            return;
        }
        for word in &self.words {
            word.set(&[(Prop::Opacity, 0.0)]);
        }
        self.sparkle();
        if let Err(e) = self.observe() {
            warn!("testimonial visibility observer unavailable: {}", e);
        }
        self.maybe_auto_activate();
        if let Some(section) = self.parts.section.dyn_ref::<HtmlElement>() {
            let _ = section.dataset().set("morphic", "initialized");
        }
        info!("testimonial initialized with {} words", self.words.len());
    }

    fn observe(self: &Rc<Self>) -> EffectResult<()> {
        let weak = Rc::downgrade(self);
        let callback: ObserverCallback = Closure::wrap(Box::new(move |entries: Array| {
            let (Some(block), Ok(entry)) = (
                weak.upgrade(),
                entries.get(0).dyn_into::<IntersectionObserverEntry>(),
            ) else {
                return;
            };
            if activation::should_activate(entry.intersection_ratio(), config::VISIBILITY_THRESHOLD) {
                block.activate();
            } else {
                block.deactivate();
            }
        }) as Box<dyn FnMut(Array)>);

        let thresholds: Array = config::OBSERVER_THRESHOLDS
            .iter()
            .map(|t| JsValue::from_f64(*t))
            .collect();
        let options = IntersectionObserverInit::new();
        options.set_threshold(&thresholds);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        observer.observe(&self.parts.section);
        *self.observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    fn maybe_auto_activate(self: &Rc<Self>) {
        let rect = self.parts.section.get_bounding_client_rect();
        let (_, viewport_h) = dom::viewport();
        if activation::initially_visible(rect.top(), rect.bottom(), viewport_h, config::VISIBILITY_THRESHOLD) {
            self.activate();
        }
    }

    pub fn is_active(&self) -> bool {
        self.activation.borrow().is_active()
    }

    pub fn activate(self: &Rc<Self>) {
        if self.destroyed.get() {
            return;
        }
        let Some(activated) = self.activation.borrow_mut().activate() else {
            return;
        };
        info!("testimonial active");
        dom::dispatch(&self.parts.section, ENTER_EVENT);
        if self.config.reduced_motion {
            return;
        }
        match activated {
            Activated::Reveal => self.reveal_words(),
            Activated::Wave => self.start_wave(),
        }
        self.attach_pointer();
        self.start_interactive_loop();
    }

    pub fn deactivate(&self) {
        if !self.activation.borrow_mut().deactivate() {
            return;
        }
        info!("testimonial inactive");
        dom::dispatch(&self.parts.section, LEAVE_EVENT);
        if self.config.reduced_motion {
            return;
        }
        self.detach_pointer();
        self.stop_interactive_loop();
        self.stop_wave();
        if let Some(shape) = &self.shape {
            self.animator.to(
                shape,
                &[
                    (Prop::X, 0.0),
                    (Prop::Y, 0.0),
                    (Prop::RotateX, 0.0),
                    (Prop::RotateY, 0.0),
                    (Prop::Scale, 1.0),
                ],
                TweenSpec::new(0.5).ease(Ease::Power2Out),
            );
        }
    }

    /// Tears everything down. No frame, timer, observer or animation started
    /// by this block survives the call.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        if let Some((observer, _callback)) = self.observer.borrow_mut().take() {
            observer.disconnect();
        }
        for handle in self.reveal.borrow_mut().drain(..) {
            handle.kill();
        }
        for handle in self.sparkles.borrow_mut().drain(..) {
            handle.kill();
        }
        if let Some(wave) = self.wave.borrow_mut().take() {
            wave.kill();
        }
        self.stop_interactive_loop();
        self.detach_pointer();
        for target in self.shape.iter().chain(self.highlight.iter()) {
            self.animator.kill_tweens_of(target);
        }
        if let Some(section) = self.parts.section.dyn_ref::<HtmlElement>() {
            let _ = section.dataset().set("morphic", "");
        }
        info!("testimonial destroyed");
    }

    fn reveal_words(self: &Rc<Self>) {
        let mut words = Timeline::new();
        words.stagger(
            0..self.words.len(),
            &[(Prop::Opacity, 1.0)],
            TweenSpec::new(0.5).ease(Ease::Power2Out),
            0.0,
            self.config.word_stagger,
        );
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.animator.play_then(self.words.clone(), words, move || {
            if let Some(block) = weak.upgrade() {
                if block.is_active() {
                    block.start_wave();
                }
            }
        });
        let mut reveal = self.reveal.borrow_mut();
        reveal.push(handle);
        if let Some(title) = &self.title {
            reveal.push(self.animator.to(
                title,
                &[(Prop::Scale, 1.04), (Prop::Glow, 1.0)],
                TweenSpec::new(0.5).ease(Ease::Power2Out).yoyo(1),
            ));
        }
    }

    fn start_wave(&self) {
        if self.config.reduced_motion || self.destroyed.get() {
            return;
        }
        if let Some(wave) = self.wave.borrow_mut().take() {
            wave.kill();
        }
        let mut timeline = Timeline::new().with_repeat(Repeat::Infinite, config::WAVE_REPEAT_DELAY);
        timeline.stagger(
            0..self.words.len(),
            &[(Prop::Glow, 1.0)],
            TweenSpec::new(0.6).ease(Ease::SineInOut).yoyo(1),
            0.0,
            0.04,
        );
        *self.wave.borrow_mut() = Some(self.animator.play(self.words.clone(), timeline));
    }

    fn stop_wave(&self) {
        if let Some(wave) = self.wave.borrow_mut().take() {
            wave.kill();
        }
        for word in &self.words {
            word.clear_glow();
        }
    }

    fn sparkle(&self) {
        let mut sparkles = self.sparkles.borrow_mut();
        for spark in &self.sparks {
            let base_scale = 0.4 + Math::random() * 0.6;
            spark.set(&spark_rest(base_scale));
            let timeline = sparkle_timeline(base_scale, 2.0 + Math::random() * 2.0);
            sparkles.push(self.animator.play(vec![spark.clone()], timeline));
        }
    }

    fn start_interactive_loop(&self) {
        if self.frame.borrow().as_ref().map_or(false, FrameLoop::is_running) {
            return;
        }
        let Some(shape) = self.shape.clone() else {
            return;
        };
        if !self.pointer.borrow_mut().start() {
            return;
        }
        shape.set_perspective(Some(pointer::PERSPECTIVE));
        let mut sink = DomSink {
            animator: self.animator.clone(),
            shape,
            highlight: self.highlight.clone(),
            path_length: self.path_length,
        };
        let pointer = self.pointer.clone();
        let frame = FrameLoop::start(move |timestamp| pointer.borrow_mut().tick(timestamp, &mut sink));
        *self.frame.borrow_mut() = Some(frame);
    }

    fn stop_interactive_loop(&self) {
        self.pointer.borrow_mut().stop();
        if let Some(frame) = self.frame.borrow_mut().take() {
            frame.stop();
        }
    }

    fn attach_pointer(&self) {
        let Some(visual) = self.parts.visual.clone() else {
            return;
        };
        if !self.pointer_listeners.borrow().is_empty() {
            return;
        }
        let mut listeners = Vec::new();

        let on_move = {
            let pointer = self.pointer.clone();
            let idle_timer = self.idle_timer.clone();
            let section = self.parts.section.clone();
            let target = visual.clone();
            move |event: web_sys::Event| {
                let Ok(event) = event.dyn_into::<MouseEvent>() else {
                    return;
                };
                let rect = target.get_bounding_client_rect();
                let position = Vec2::new(
                    event.client_x() as f64 - rect.left(),
                    event.client_y() as f64 - rect.top(),
                );
                let magnet = pointer
                    .borrow_mut()
                    .pointer_moved(position, Vec2::new(rect.width(), rect.height()));
                if let Some(magnet) = magnet {
                    if let Err(e) = dom::dispatch_detail(&section, MAGNET_EVENT, &magnet) {
                        debug!("magnet event not sent: {}", e);
                    }
                }
                let pointer = Rc::downgrade(&pointer);
                // replacing the timeout cancels the previous one
                *idle_timer.borrow_mut() = Some(Timeout::new(config::IDLE_DELAY_MS, move || {
                    if let Some(pointer) = pointer.upgrade() {
                        pointer.borrow_mut().mark_idle();
                    }
                }));
            }
        };
        let on_leave = {
            let pointer = self.pointer.clone();
            let idle_timer = self.idle_timer.clone();
            move |_: web_sys::Event| {
                idle_timer.borrow_mut().take();
                pointer.borrow_mut().pointer_left();
            }
        };

        match Listener::new(&visual, "pointermove", on_move) {
            Ok(listener) => listeners.push(listener),
            Err(e) => warn!("testimonial pointer tracking unavailable: {}", e),
        }
        match Listener::new(&visual, "pointerleave", on_leave) {
            Ok(listener) => listeners.push(listener),
            Err(e) => warn!("testimonial pointer leave unavailable: {}", e),
        }
        *self.pointer_listeners.borrow_mut() = listeners;
    }

    fn detach_pointer(&self) {
        self.pointer_listeners.borrow_mut().clear();
        self.idle_timer.borrow_mut().take();
    }
}

impl Drop for MorphicTestimonial {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::style::StyleState;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sparks_fade_in_from_hidden() {
        let mut state = StyleState::default();
        for (prop, value) in spark_rest(0.7) {
            state.set(prop, value);
        }
        let timeline = sparkle_timeline(0.7, 3.0);
        let fade_in = &timeline.tracks()[0];
        assert_eq!(fade_in.prop, Prop::Opacity);

        let from = fade_in.from.unwrap_or_else(|| state.get(fade_in.prop));
        assert_abs_diff_eq!(from, 0.0);
        assert_abs_diff_eq!(fade_in.value(from, 0.0), 0.0);
        assert_abs_diff_eq!(fade_in.value(from, 0.5), 0.5);
    }

    #[test]
    fn sparks_fade_out_before_the_swell_ends() {
        let timeline = sparkle_timeline(0.5, 2.0);
        let tracks = timeline.tracks();
        assert_abs_diff_eq!(tracks[1].to, 0.9, epsilon = 1e-9);
        assert_eq!(tracks[2].prop, Prop::Opacity);
        assert_abs_diff_eq!(tracks[2].to, 0.0);
        assert_abs_diff_eq!(tracks[2].at, 0.7, epsilon = 1e-9);
    }
}
