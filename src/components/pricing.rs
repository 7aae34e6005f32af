use web_sys::Element;
use yew::prelude::*;

use crate::config;
use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::scroll::trigger::Position;
use crate::scroll::Subscription;

struct Plan {
    name: &'static str,
    price: &'static str,
    features: &'static [&'static str],
    featured: bool,
}

const PLANS: [Plan; 3] = [
    Plan {
        name: "Single course",
        price: "€890",
        features: &["One course of your choice", "Course materials", "CPD certificate"],
        featured: false,
    },
    Plan {
        name: "Season pass",
        price: "€2 400",
        features: &["Any three courses", "Mentor follow-up call", "Case review forum"],
        featured: true,
    },
    Plan {
        name: "Practice team",
        price: "€6 900",
        features: &["Up to six team members", "Private course day", "Shared planning session"],
        featured: false,
    },
];

fn wire(page: &PageEffects, section: &Element) -> Vec<Subscription> {
    let mut subscriptions: Vec<Subscription> = dom::query_all(section, ".pricing-card")
        .into_iter()
        .enumerate()
        .map(|(index, card)| {
            let staged = Staged::new(
                card.clone(),
                Entrance::RISE,
                effects::entrance_spec(effects::staggered(index, config::REVEAL_STAGGER)),
            )
            .marking_active();
            effects::reveal_on_enter(page, card, Position::top_at(85.0), vec![staged])
        })
        .collect();

    if let Ok(guarantee) = dom::query(section, ".pricing-guarantee") {
        let staged = Staged::new(guarantee.clone(), Entrance::rise(20.0), effects::entrance_spec(0.3))
            .marking_active();
        subscriptions.push(effects::reveal_on_enter(page, guarantee, Position::top_at(85.0), vec![staged]));
    }
    subscriptions
}

#[function_component(Pricing)]
pub fn pricing() -> Html {
    let section = use_node_ref();
    let page = use_context::<PageEffects>();

    {
        let section = section.clone();
        use_effect_with_deps(
            move |page| {
                let wired = match (page, section.cast::<Element>()) {
                    (Some(page), Some(section)) => wire(page, &section),
                    _ => Vec::new(),
                };
                move || drop(wired)
            },
            page,
        );
    }

    html! {
        <section class="pricing-section" id="pricing" ref={section}>
            <h2 class="section-title">{"Pricing"}</h2>
            <div class="pricing-grid">
                { for PLANS.iter().map(|plan| html! {
                    <div class={classes!("pricing-card", plan.featured.then_some("featured"))}>
                        <h3>{plan.name}</h3>
                        <div class="price">{plan.price}</div>
                        <ul>
                            { for plan.features.iter().map(|feature| html! { <li>{*feature}</li> }) }
                        </ul>
                        <a href="#contact" class="btn">{"Book a seat"}</a>
                    </div>
                }) }
            </div>
            <p class="pricing-guarantee">{"Not what you expected after day one? We refund the course in full."}</p>
        </section>
    }
}
