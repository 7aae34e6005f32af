use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, CssStyleDeclaration, CustomEvent, CustomEventInit, Document, Element,
    Event, EventTarget, HtmlElement, SvgElement, Window,
};

use crate::error::{EffectError, EffectResult};

pub fn window() -> EffectResult<Window> {
    web_sys::window().ok_or(EffectError::NoWindow)
}

pub fn document() -> EffectResult<Document> {
    window()?.document().ok_or(EffectError::NoDocument)
}

/// Viewport `(width, height)` in CSS px.
pub fn viewport() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (0.0, 0.0);
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

/// Inline style of an HTML or SVG element.
pub fn style_of(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<SvgElement>().map(|svg| svg.style())
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(style) = style_of(el) {
        let _ = style.set_property(property, value);
    }
}

pub fn clear_style(el: &Element, property: &str) {
    if let Some(style) = style_of(el) {
        let _ = style.remove_property(property);
    }
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn query(root: &Element, selector: &'static str) -> EffectResult<Element> {
    root.query_selector(selector)?
        .ok_or(EffectError::MissingElement(selector))
}

/// First match anywhere in the document.
pub fn query_document(selector: &'static str) -> EffectResult<Element> {
    document()?
        .query_selector(selector)?
        .ok_or(EffectError::MissingElement(selector))
}

pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Top edge of `el` in document coordinates, ignoring transforms. Scroll
/// measurements use this so an animated ancestor does not shift them.
pub fn document_top(el: &Element) -> f64 {
    let Some(mut current) = el.dyn_ref::<HtmlElement>().cloned() else {
        return el.get_bounding_client_rect().top() + scroll_y();
    };
    let mut top = 0.0;
    loop {
        top += current.offset_top() as f64;
        match current.offset_parent().and_then(|p| p.dyn_into::<HtmlElement>().ok()) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    top
}

pub fn layout_height(el: &Element) -> f64 {
    match el.dyn_ref::<HtmlElement>() {
        Some(html) => html.offset_height() as f64,
        None => el.get_bounding_client_rect().height(),
    }
}

pub fn dispatch(target: &EventTarget, name: &str) {
    if let Ok(event) = Event::new(name) {
        let _ = target.dispatch_event(&event);
    }
}

/// Dispatches a `CustomEvent` whose `detail` is `payload` serialized to a
/// plain JS object.
pub fn dispatch_detail<T: Serialize>(target: &EventTarget, name: &str, payload: &T) -> EffectResult<()> {
    let detail = serde_wasm_bindgen::to_value(payload).map_err(|e| EffectError::Js(e.to_string()))?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(name, &init)?;
    target.dispatch_event(&event)?;
    Ok(())
}

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, callback: F) -> EffectResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    /// Registers with `passive: false` so the callback may `prevent_default`.
    pub fn active<F>(target: &EventTarget, event: &'static str, callback: F) -> EffectResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
