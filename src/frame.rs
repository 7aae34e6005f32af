use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameClosure = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop that keeps rescheduling itself while its
/// callback returns `true` and the loop has not been stopped.
///
/// Stopping only flips a flag and cancels the pending request; a tick that is
/// already queued sees the flag and returns without touching anything.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    pending: Rc<Cell<Option<i32>>>,
    closure: Rc<RefCell<Option<FrameClosure>>>,
}

impl FrameLoop {
    pub fn start<F>(mut on_frame: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let running = Rc::new(Cell::new(true));
        let pending = Rc::new(Cell::new(None));
        let closure: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));

        let tick = {
            let running = running.clone();
            let pending = pending.clone();
            let closure = closure.clone();
            Closure::wrap(Box::new(move |timestamp: f64| {
                pending.set(None);
                if !running.get() || !on_frame(timestamp) {
                    running.set(false);
                    // Last reference to ourselves; freed once this call returns.
                    closure.borrow_mut().take();
                    return;
                }
                if let Some(cb) = closure.borrow().as_ref() {
                    pending.set(request(cb));
                }
            }) as Box<dyn FnMut(f64)>)
        };

        pending.set(request(&tick));
        if pending.get().is_none() {
            running.set(false);
        } else {
            *closure.borrow_mut() = Some(tick);
        }

        Self {
            running,
            pending,
            closure,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let (Some(window), Some(handle)) = (web_sys::window(), self.pending.take()) {
            let _ = window.cancel_animation_frame(handle);
        }
        self.closure.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request(callback: &FrameClosure) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}
