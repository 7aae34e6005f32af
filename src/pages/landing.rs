use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;

use crate::components::{
    courses::Courses, cta::CallToAction, faq::Faq, footer::Footer, gallery::Gallery, hero::Hero,
    pricing::Pricing, testimonial::Testimonial, videos::VideoStories,
};
use crate::config;
use crate::dom::{self, Listener};
use crate::effects::{self, PageEffects};
use crate::error::EffectResult;

/// In-page anchor target of a link, `None` for anything that is not `#id`.
pub fn anchor_target(href: &str) -> Option<&str> {
    (href.len() > 1 && href.starts_with('#')).then_some(href)
}

/// Listeners that outlive a single section: resize refresh and anchor
/// scrolling.
struct PageListeners {
    _resize: Listener,
    _anchors: Listener,
}

impl PageListeners {
    fn install(page: &PageEffects) -> EffectResult<Self> {
        let window = dom::window()?;
        let document = dom::document()?;

        let resize = {
            let scroll = page.scroll.clone();
            let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
            Listener::new(&window, "resize", move |_| {
                let scroll = scroll.clone();
                // replacing the timeout cancels the previous one
                *pending.borrow_mut() = Some(Timeout::new(config::RESIZE_DEBOUNCE_MS, move || scroll.refresh()));
            })?
        };

        let anchors = {
            let scroll = page.scroll.clone();
            let lookup = document.clone();
            Listener::new(&document, "click", move |event| {
                let Some(link) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("a[href^=\"#\"]").ok().flatten())
                else {
                    return;
                };
                let href = link.get_attribute("href").unwrap_or_default();
                let Some(selector) = anchor_target(&href) else {
                    return;
                };
                if let Ok(Some(target)) = lookup.query_selector(selector) {
                    event.prevent_default();
                    debug!("scrolling to {}", selector);
                    scroll.scroll_to_element(&target, config::ANCHOR_OFFSET, config::ANCHOR_DURATION);
                }
            })?
        };

        Ok(Self {
            _resize: resize,
            _anchors: anchors,
        })
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let page = use_state(|| effects::log_wiring("page", PageEffects::start()));

    use_effect_with_deps(
        move |page| {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
            let listeners = page
                .as_ref()
                .and_then(|page| effects::log_wiring("page listeners", PageListeners::install(page)));
            let page = page.clone();
            move || {
                drop(listeners);
                if let Some(page) = page {
                    info!("landing page unmounted");
                    page.destroy();
                }
            }
        },
        (*page).clone(),
    );

    let sections = html! {
        <main class="landing">
            <Hero />
            <Courses />
            <Faq />
            <Gallery />
            <VideoStories />
            <Testimonial />
            <Pricing />
            <CallToAction />
            <Footer />
        </main>
    };

    match (*page).clone() {
        Some(page) => html! {
            <ContextProvider<PageEffects> context={page}>
                { sections }
            </ContextProvider<PageEffects>>
        },
        None => sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_need_an_id() {
        assert_eq!(anchor_target("#faq"), Some("#faq"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/pricing"), None);
        assert_eq!(anchor_target(""), None);
    }
}
