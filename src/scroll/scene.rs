use std::cell::RefCell;

use web_sys::Element;

use super::trigger::{End, OnceTrigger, Position, Scrub, ScrubState, TriggerBounds};
use super::{ScrollDriver, ScrollFrame, Subscription};
use crate::dom;
use crate::motion::Scrubbed;

pub fn measure(trigger: &Element, start: Position, end: End, frame: &ScrollFrame) -> TriggerBounds {
    TriggerBounds::measure(
        dom::document_top(trigger),
        dom::layout_height(trigger),
        frame.viewport_h,
        start,
        end,
    )
}

/// Bounds that are re-measured whenever the driver refreshes.
pub struct MeasuredBounds {
    trigger: Element,
    start: Position,
    end: End,
    cached: Option<(u32, TriggerBounds)>,
}

impl MeasuredBounds {
    pub fn new(trigger: Element, start: Position, end: End) -> Self {
        Self {
            trigger,
            start,
            end,
            cached: None,
        }
    }

    pub fn get(&mut self, frame: &ScrollFrame) -> TriggerBounds {
        match self.cached {
            Some((generation, bounds)) if generation == frame.generation => bounds,
            _ => {
                let bounds = measure(&self.trigger, self.start, self.end, frame);
                self.cached = Some((frame.generation, bounds));
                bounds
            }
        }
    }
}

/// A timeline whose playhead follows scroll progress through a trigger.
pub struct ScrubScene {
    bounds: MeasuredBounds,
    scrub: ScrubState,
    timeline: Scrubbed,
    rendered: Option<f64>,
}

impl ScrubScene {
    pub fn new(trigger: Element, start: Position, end: End, scrub: Scrub, timeline: Scrubbed) -> Self {
        Self {
            bounds: MeasuredBounds::new(trigger, start, end),
            scrub: ScrubState::new(scrub),
            timeline,
            rendered: None,
        }
    }

    pub fn update(&mut self, frame: &ScrollFrame) {
        let target = self.bounds.get(frame).progress(frame.scroll_y);
        let progress = self.scrub.step(target, frame.dt);
        if self.rendered != Some(progress) {
            self.timeline.render(progress);
            self.rendered = Some(progress);
        }
    }

    pub fn attach(self, driver: &ScrollDriver) -> Subscription {
        let scene = RefCell::new(self);
        driver.subscribe(move |frame| scene.borrow_mut().update(frame))
    }
}

/// Runs `on_enter` the first time the scroll passes `start` on `trigger`.
pub fn on_enter<F>(driver: &ScrollDriver, trigger: Element, start: Position, on_enter: F) -> Subscription
where
    F: FnOnce() + 'static,
{
    let bounds = RefCell::new(MeasuredBounds::new(trigger, start, End::Distance(0.0)));
    let once = RefCell::new(OnceTrigger::new());
    let callback = RefCell::new(Some(on_enter));
    driver.subscribe(move |frame| {
        if once.borrow().has_fired() {
            return;
        }
        let bounds = bounds.borrow_mut().get(frame);
        if once.borrow_mut().update(&bounds, frame.scroll_y) {
            if let Some(callback) = callback.borrow_mut().take() {
                callback();
            }
        }
    })
}
