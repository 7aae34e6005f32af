//! Page scrolling: the smooth-scroll driver, trigger geometry and the scenes
//! that tie effects to scroll progress.

pub mod scene;
pub mod smooth;
pub mod trigger;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, TouchEvent, WheelEvent};

use crate::dom::{self, Listener};
use crate::error::EffectResult;
use crate::frame::FrameLoop;
use smooth::{SmoothScroll, SmoothScrollOptions};

/// What scroll subscribers see every animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollFrame {
    pub scroll_y: f64,
    pub viewport_w: f64,
    pub viewport_h: f64,
    /// Frame timestamp, ms.
    pub time: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Bumped on every refresh; subscribers re-measure when it changes.
    pub generation: u32,
}

type Subscriber = Rc<dyn Fn(&ScrollFrame)>;

struct DriverInner {
    smooth: RefCell<SmoothScroll>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_id: Cell<u64>,
    generation: Cell<u32>,
    last_time: Cell<Option<f64>>,
    touch_y: Cell<Option<f64>>,
    listeners: RefCell<Vec<Listener>>,
    frame: RefCell<Option<FrameLoop>>,
}

impl DriverInner {
    fn on_frame(&self, time: f64) {
        let dt = match self.last_time.replace(Some(time)) {
            Some(last) if time > last => (time - last) / 1000.0,
            _ => 0.016,
        };
        let glide = self.smooth.borrow_mut().raf(time);
        if let Some(y) = glide {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, y);
            }
        }
        let (viewport_w, viewport_h) = dom::viewport();
        let frame = ScrollFrame {
            scroll_y: glide.unwrap_or_else(dom::scroll_y),
            viewport_w,
            viewport_h,
            time,
            dt,
            generation: self.generation.get(),
        };
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| s.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&frame);
        }
    }

    fn update_limit(&self) {
        let (_, viewport_h) = dom::viewport();
        let height = dom::document()
            .ok()
            .and_then(|d| d.document_element())
            .map(|root| root.scroll_height() as f64)
            .unwrap_or(0.0);
        self.smooth.borrow_mut().set_limit(height - viewport_h);
    }
}

/// Smooth-scrolls the window and feeds every scroll-linked effect from one
/// frame loop.
#[derive(Clone)]
pub struct ScrollDriver {
    inner: Rc<DriverInner>,
}

impl PartialEq for ScrollDriver {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ScrollDriver {
    pub fn start(options: SmoothScrollOptions) -> EffectResult<Self> {
        let window = dom::window()?;
        let inner = Rc::new(DriverInner {
            smooth: RefCell::new(SmoothScroll::new(options, dom::scroll_y(), f64::MAX)),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            generation: Cell::new(0),
            last_time: Cell::new(None),
            touch_y: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            frame: RefCell::new(None),
        });
        inner.update_limit();

        let mut listeners = Vec::new();
        {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::active(&window, "wheel", move |event| {
                let (Some(inner), Ok(wheel)) = (weak.upgrade(), event.dyn_into::<WheelEvent>()) else {
                    return;
                };
                // pinch-zoom on trackpads arrives as ctrl+wheel
                if wheel.ctrl_key() {
                    return;
                }
                wheel.prevent_default();
                let delta = match wheel.delta_mode() {
                    WheelEvent::DOM_DELTA_LINE => wheel.delta_y() * 16.0,
                    WheelEvent::DOM_DELTA_PAGE => wheel.delta_y() * dom::viewport().1,
                    _ => wheel.delta_y(),
                };
                inner.update_limit();
                inner.smooth.borrow_mut().on_wheel(delta);
            })?);
        }
        {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::new(&window, "touchstart", move |event| {
                let (Some(inner), Ok(touch)) = (weak.upgrade(), event.dyn_into::<TouchEvent>()) else {
                    return;
                };
                inner.touch_y.set(touch.touches().get(0).map(|t| t.client_y() as f64));
            })?);
        }
        {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::active(&window, "touchmove", move |event| {
                let (Some(inner), Ok(touch)) = (weak.upgrade(), event.dyn_into::<TouchEvent>()) else {
                    return;
                };
                let Some(y) = touch.touches().get(0).map(|t| t.client_y() as f64) else {
                    return;
                };
                if let Some(last) = inner.touch_y.replace(Some(y)) {
                    if inner.smooth.borrow_mut().on_touch(last - y) {
                        touch.prevent_default();
                    }
                }
            })?);
        }
        {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::new(&window, "touchend", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.touch_y.set(None);
                }
            })?);
        }
        {
            let weak = Rc::downgrade(&inner);
            listeners.push(Listener::new(&window, "scroll", move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.smooth.borrow_mut().sync_native(dom::scroll_y());
                }
            })?);
        }
        *inner.listeners.borrow_mut() = listeners;

        let weak = Rc::downgrade(&inner);
        let frame = FrameLoop::start(move |time| match weak.upgrade() {
            Some(inner) => {
                inner.on_frame(time);
                true
            }
            None => false,
        });
        *inner.frame.borrow_mut() = Some(frame);

        Ok(Self { inner })
    }

    pub fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(&ScrollFrame) + 'static,
    {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        Subscription {
            id,
            driver: Rc::downgrade(&self.inner),
        }
    }

    /// Makes every subscriber re-measure on the next frame.
    pub fn refresh(&self) {
        self.inner.update_limit();
        self.inner.generation.set(self.inner.generation.get().wrapping_add(1));
        debug!("scroll refresh, generation {}", self.inner.generation.get());
    }

    pub fn scroll_to(&self, y: f64, duration: Option<f64>) {
        self.inner.update_limit();
        self.inner.smooth.borrow_mut().scroll_to(y, duration);
    }

    pub fn scroll_to_element(&self, el: &Element, offset: f64, duration: f64) {
        let top = el.get_bounding_client_rect().top() + dom::scroll_y();
        self.scroll_to(top + offset, Some(duration));
    }

    /// Stops the frame loop and removes the input listeners.
    pub fn destroy(&self) {
        if let Some(frame) = self.inner.frame.borrow_mut().take() {
            frame.stop();
        }
        self.inner.listeners.borrow_mut().clear();
        self.inner.subscribers.borrow_mut().clear();
    }
}

/// Unsubscribes when dropped.
pub struct Subscription {
    id: u64,
    driver: Weak<DriverInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.driver.upgrade() {
            inner.subscribers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
