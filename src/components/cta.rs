use log::info;
use web_sys::Element;
use yew::prelude::*;

use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::motion::{Ease, TweenSpec};
use crate::scroll::trigger::Position;
use crate::scroll::Subscription;

const FEATURES: [&str; 3] = ["Small groups", "Real patient cases", "Mentor follow-up"];

fn wire(page: &PageEffects, section: &Element) -> Option<Subscription> {
    let content = dom::query(section, ".cta-content").ok()?;
    let form = dom::query(section, ".cta-form").ok()?;

    let mut staged = Vec::new();
    if let Ok(heading) = dom::query(&content, "h2") {
        staged.push(Staged::new(heading, Entrance::RISE, effects::entrance_spec(0.0)).marking_active());
    }
    if let Ok(paragraph) = dom::query(&content, "p") {
        staged.push(Staged::new(paragraph, Entrance::RISE, effects::entrance_spec(0.2)).marking_active());
    }
    staged.push(Staged::new(form, Entrance::RISE, effects::entrance_spec(0.3)).marking_active());
    for (index, feature) in dom::query_all(section, ".cta-feature").into_iter().enumerate() {
        let spec = TweenSpec::new(0.6)
            .ease(Ease::Power3Out)
            .delay(0.4 + effects::staggered(index, 0.1));
        staged.push(Staged::new(feature, Entrance::slide(-20.0), spec).marking_active());
    }
    Some(effects::reveal_on_enter(page, section.clone(), Position::top_at(70.0), staged))
}

#[function_component(CallToAction)]
pub fn call_to_action() -> Html {
    let section = use_node_ref();
    let page = use_context::<PageEffects>();
    let sent = use_state(|| false);

    {
        let section = section.clone();
        use_effect_with_deps(
            move |page| {
                let wired = match (page, section.cast::<Element>()) {
                    (Some(page), Some(section)) => wire(page, &section),
                    _ => None,
                };
                move || drop(wired)
            },
            page,
        );
    }

    let onsubmit = {
        let sent = sent.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            info!("course brochure requested");
            sent.set(true);
        })
    };

    html! {
        <section class="cta-section" id="contact" ref={section}>
            <div class="cta-content">
                <h2>{"Ready for your next course?"}</h2>
                <p>{"Leave your email and we send the full programme with dates and seat counts."}</p>
                <ul class="cta-features">
                    { for FEATURES.iter().map(|feature| html! { <li class="cta-feature">{*feature}</li> }) }
                </ul>
            </div>
            <form class="cta-form" onsubmit={onsubmit}>
                <input type="email" name="email" placeholder="you@practice.com" required=true />
                <button type="submit" class="btn" disabled={*sent}>
                    { if *sent { "Sent, check your inbox" } else { "Send me the programme" } }
                </button>
            </form>
        </section>
    }
}
