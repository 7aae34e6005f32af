use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent, Node};
use yew::prelude::*;

use crate::dom::{self, Listener};

const LINKS: [(&str, &str); 5] = [
    ("#courses", "Courses"),
    ("#portfolio", "Cases"),
    ("#testimonials", "Stories"),
    ("#pricing", "Pricing"),
    ("#faq", "FAQ"),
];

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let nav_ref = use_node_ref();

    // body class follows the menu so the page underneath stops scrolling
    use_effect_with_deps(
        |open| {
            if let Some(body) = dom::document().ok().and_then(|d| d.body()) {
                dom::toggle_class(&body, "menu-open", *open);
            }
            || ()
        },
        *menu_open,
    );

    {
        let menu_open = menu_open.clone();
        let nav_ref = nav_ref.clone();
        use_effect_with_deps(
            move |_| {
                let listener = dom::document().ok().and_then(|document| {
                    Listener::new(&document, "click", move |event| {
                        let (Some(nav), Some(target)) = (
                            nav_ref.cast::<Element>(),
                            event.target().and_then(|t| t.dyn_into::<Node>().ok()),
                        ) else {
                            return;
                        };
                        if !nav.contains(Some(&target)) {
                            menu_open.set(false);
                        }
                    })
                    .ok()
                });
                move || drop(listener)
            },
            (),
        );
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            debug!("mobile menu {}", if *menu_open { "closed" } else { "opened" });
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let active = (*menu_open).then_some("active");

    html! {
        <nav class="top-nav" ref={nav_ref}>
            <div class="nav-content">
                <a href="#top" class="nav-logo">{"Brightline Dental Academy"}</a>
                <button
                    class={classes!("mobile-menu-btn", active)}
                    aria-label="Menu"
                    aria-expanded={menu_open.to_string()}
                    onclick={toggle_menu}
                >
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <ul class={classes!("nav-menu", active)}>
                    { for LINKS.iter().map(|(href, label)| html! {
                        <li><a href={*href} onclick={close_menu.clone()}>{*label}</a></li>
                    }) }
                </ul>
            </div>
        </nav>
    }
}
