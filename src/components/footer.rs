use web_sys::Element;
use yew::prelude::*;

use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::motion::{Ease, TweenSpec};
use crate::scroll::trigger::Position;
use crate::scroll::Subscription;

fn wire(page: &PageEffects, footer: &Element) -> Option<Subscription> {
    let columns = dom::query_all(footer, ".footer-grid > div");
    if columns.is_empty() {
        return None;
    }
    let mut staged: Vec<Staged> = columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            Staged::new(column, Entrance::rise(20.0), effects::entrance_spec(effects::staggered(index, 0.1)))
        })
        .collect();
    if let Ok(bottom) = dom::query(footer, ".footer-bottom") {
        staged.push(Staged::new(
            bottom,
            Entrance::FADE,
            TweenSpec::new(0.8).ease(Ease::Power3Out).delay(0.5),
        ));
    }
    Some(effects::reveal_on_enter(page, footer.clone(), Position::top_at(80.0), staged))
}

#[function_component(Footer)]
pub fn footer() -> Html {
    let footer = use_node_ref();
    let page = use_context::<PageEffects>();

    {
        let footer = footer.clone();
        use_effect_with_deps(
            move |page| {
                let wired = match (page, footer.cast::<Element>()) {
                    (Some(page), Some(footer)) => wire(page, &footer),
                    _ => None,
                };
                move || drop(wired)
            },
            page,
        );
    }

    html! {
        <footer class="footer" ref={footer}>
            <div class="footer-grid">
                <div>
                    <h4>{"Brightline Dental Academy"}</h4>
                    <p>{"Hands-on courses for dentists, hygienists and their teams."}</p>
                </div>
                <div>
                    <h4>{"Courses"}</h4>
                    <ul>
                        <li><a href="#courses">{"Programme"}</a></li>
                        <li><a href="#pricing">{"Pricing"}</a></li>
                    </ul>
                </div>
                <div>
                    <h4>{"Academy"}</h4>
                    <ul>
                        <li><a href="#portfolio">{"Cases"}</a></li>
                        <li><a href="#faq">{"FAQ"}</a></li>
                    </ul>
                </div>
                <div>
                    <h4>{"Contact"}</h4>
                    <p>{"hello@brightline.academy"}</p>
                </div>
            </div>
            <div class="footer-bottom">
                <p>{"© Brightline Dental Academy"}</p>
            </div>
        </footer>
    }
}
