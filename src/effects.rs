//! Page-wide effect services shared through Yew context, plus the
//! fade-and-slide entrance every section uses.

use std::rc::Rc;

use log::warn;
use web_sys::Element;

use crate::config::{self, MotionConfig};
use crate::dom;
use crate::error::EffectResult;
use crate::motion::{AnimatedElement, Animator, Ease, Prop, TweenSpec};
use crate::scroll::scene;
use crate::scroll::trigger::Position;
use crate::scroll::{ScrollDriver, Subscription};

/// Handed down from the landing page to every section.
#[derive(Clone, PartialEq)]
pub struct PageEffects {
    pub scroll: ScrollDriver,
    pub animator: Animator,
    pub motion: MotionConfig,
}

impl PageEffects {
    pub fn start() -> EffectResult<Self> {
        Ok(Self {
            scroll: ScrollDriver::start(config::smooth_scroll_options())?,
            animator: Animator::new(),
            motion: MotionConfig::from_environment(),
        })
    }

    pub fn destroy(&self) {
        self.scroll.destroy();
    }
}

/// Offset an element starts from before it slides into place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entrance {
    pub x: f64,
    pub y: f64,
    pub fade: bool,
}

impl Entrance {
    pub const RISE: Entrance = Entrance::rise(30.0);

    pub const fn rise(y: f64) -> Entrance {
        Entrance { x: 0.0, y, fade: true }
    }

    pub const fn slide(x: f64) -> Entrance {
        Entrance { x, y: 0.0, fade: true }
    }

    pub const FADE: Entrance = Entrance { x: 0.0, y: 0.0, fade: true };

    pub fn hidden(&self) -> Vec<(Prop, f64)> {
        self.props(0.0, self.x, self.y)
    }

    pub fn shown(&self) -> Vec<(Prop, f64)> {
        self.props(1.0, 0.0, 0.0)
    }

    fn props(&self, opacity: f64, x: f64, y: f64) -> Vec<(Prop, f64)> {
        let mut props = Vec::with_capacity(3);
        if self.fade {
            props.push((Prop::Opacity, opacity));
        }
        if self.x != 0.0 {
            props.push((Prop::X, x));
        }
        if self.y != 0.0 {
            props.push((Prop::Y, y));
        }
        props
    }
}

/// The standard entrance tween: 0.8 s power3.out after `delay`.
pub fn entrance_spec(delay: f64) -> TweenSpec {
    TweenSpec::new(0.8).ease(Ease::Power3Out).delay(delay)
}

/// Delay of the `index`th item in a row that reveals one after another.
pub fn staggered(index: usize, each: f64) -> f64 {
    index as f64 * each
}

/// One element waiting for its entrance.
pub struct Staged {
    pub target: Rc<AnimatedElement>,
    pub entrance: Entrance,
    pub spec: TweenSpec,
    /// Adds the `active` class once the entrance has finished.
    pub mark_active: bool,
    on_shown: Option<Rc<dyn Fn()>>,
}

impl Staged {
    pub fn new(el: Element, entrance: Entrance, spec: TweenSpec) -> Self {
        Self {
            target: AnimatedElement::new(el),
            entrance,
            spec,
            mark_active: false,
            on_shown: None,
        }
    }

    pub fn marking_active(mut self) -> Self {
        self.mark_active = true;
        self
    }

    /// Calls `f` once the entrance has finished, for components that render
    /// their revealed state themselves.
    pub fn notifying<F>(mut self, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_shown = Some(Rc::new(f));
        self
    }

    pub fn hide(&self) {
        self.target.set(&self.entrance.hidden());
    }

    pub fn play(&self, animator: &Animator) {
        let shown = self.entrance.shown();
        if !self.mark_active && self.on_shown.is_none() {
            animator.to(&self.target, &shown, self.spec);
            return;
        }
        let el = self.mark_active.then(|| self.target.element().clone());
        let on_shown = self.on_shown.clone();
        animator.to_then(&self.target, &shown, self.spec, move || {
            if let Some(el) = el {
                dom::add_class(&el, "active");
            }
            if let Some(on_shown) = on_shown {
                on_shown();
            }
        });
    }
}

/// Hides `staged` now and plays their entrances the first time the scroll
/// passes `start` on `trigger`.
pub fn reveal_on_enter(
    effects: &PageEffects,
    trigger: Element,
    start: Position,
    staged: Vec<Staged>,
) -> Subscription {
    for item in &staged {
        item.hide();
    }
    let animator = effects.animator.clone();
    scene::on_enter(&effects.scroll, trigger, start, move || {
        for item in &staged {
            item.play(&animator);
        }
    })
}

/// Logs a failed wiring step; sections keep rendering without the effect.
pub fn log_wiring<T>(section: &str, result: EffectResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} effects disabled: {}", section, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rise_hides_below_and_shows_in_place() {
        assert_eq!(Entrance::RISE.hidden(), vec![(Prop::Opacity, 0.0), (Prop::Y, 30.0)]);
        assert_eq!(Entrance::RISE.shown(), vec![(Prop::Opacity, 1.0), (Prop::Y, 0.0)]);
    }

    #[test]
    fn slide_only_touches_x() {
        let entrance = Entrance::slide(-20.0);
        assert_eq!(entrance.hidden(), vec![(Prop::Opacity, 0.0), (Prop::X, -20.0)]);
        assert_eq!(Entrance::FADE.shown(), vec![(Prop::Opacity, 1.0)]);
    }

    #[test]
    fn stagger_delays() {
        assert_abs_diff_eq!(staggered(0, 0.15), 0.0);
        assert_abs_diff_eq!(staggered(3, 0.15), 0.45, epsilon = 1e-9);
        assert_abs_diff_eq!(entrance_spec(0.3).total(), 1.1, epsilon = 1e-9);
    }
}
