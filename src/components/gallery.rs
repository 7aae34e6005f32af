use web_sys::Element;
use yew::prelude::*;

use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::error::EffectResult;
use crate::motion::{AnimatedElement, Ease, Prop, Scrubbed, Timeline, TweenSpec};
use crate::scroll::scene::ScrubScene;
use crate::scroll::trigger::{End, Position, Scrub};
use crate::scroll::Subscription;

const CASES: [(&str, &str); 4] = [
    ("Full-arch rehabilitation", "Six implants, one provisional day and a patient who smiles in photos again."),
    ("Minimal-prep veneers", "Eight veneers bonded without a single injection."),
    ("Orthodontic retreatment", "Aligners closing the spaces a fixed appliance left behind."),
    ("Trauma recovery", "A fractured central incisor restored in one long appointment."),
];

/// Side the text slides in from: even items from the right.
pub fn content_offset(index: usize) -> f64 {
    if index % 2 == 0 {
        50.0
    } else {
        -50.0
    }
}

fn wire_item(page: &PageEffects, index: usize, item: &Element) -> EffectResult<Vec<Subscription>> {
    let container = AnimatedElement::new(dom::query(item, ".gallery-image-container")?);
    let image = AnimatedElement::new(dom::query(item, ".gallery-image")?);
    let content_el = dom::query(item, ".gallery-content")?;
    let content = AnimatedElement::new(content_el.clone());

    dom::set_style(item, "opacity", "1");
    container.set(&[(Prop::Scale, 0.8)]);
    image.set(&[(Prop::Scale, 1.2)]);
    content.set(&[(Prop::Opacity, 0.0), (Prop::X, content_offset(index))]);

    let mut timeline = Timeline::new();
    timeline
        .add(0, &[(Prop::Scale, 1.0)], TweenSpec::new(1.0).ease(Ease::Power2Out), 0.0)
        .add(1, &[(Prop::Scale, 1.0)], TweenSpec::new(1.5).ease(Ease::Power2Out), 0.0)
        .add(
            2,
            &[(Prop::X, 0.0), (Prop::Opacity, 1.0)],
            TweenSpec::new(1.0).ease(Ease::Power2Out),
            0.2,
        );
    let scene = ScrubScene::new(
        item.clone(),
        Position::top_at(70.0),
        End::At(Position::center_at(30.0)),
        Scrub::Smooth(0.6),
        Scrubbed::new(vec![container, image, content], timeline),
    )
    .attach(&page.scroll);

    let text: Vec<Staged> = [".gallery-number", "h3", "p"]
        .into_iter()
        .filter_map(|selector| dom::query(&content_el, selector).ok())
        .enumerate()
        .map(|(i, el)| {
            Staged::new(
                el,
                Entrance::RISE,
                TweenSpec::new(0.8).ease(Ease::Power3Out).delay(effects::staggered(i, 0.1)),
            )
        })
        .collect();
    let text = effects::reveal_on_enter(page, content_el, Position::top_at(70.0), text);

    Ok(vec![scene, text])
}

fn wire(page: &PageEffects, section: &Element) -> Vec<Subscription> {
    dom::query_all(section, ".gallery-item")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| effects::log_wiring("gallery item", wire_item(page, index, item)))
        .flatten()
        .collect()
}

#[function_component(Gallery)]
pub fn gallery() -> Html {
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
        <section class="portfolio-section" id="portfolio" ref={section}>
            <h2 class="section-title">{"Cases from our mentors"}</h2>
            { for CASES.iter().enumerate().map(|(i, (title, text))| html! {
                <article class={classes!("gallery-item", (i % 2 == 1).then_some("reverse"))} key={i}>
                    <div class="gallery-image-container">
                        <img class="gallery-image" src={format!("/assets/case-{}.webp", i + 1)} alt={*title} />
                    </div>
                    <div class="gallery-content">
                        <span class="gallery-number">{format!("{:02}", i + 1)}</span>
                        <h3>{*title}</h3>
                        <p>{*text}</p>
                    </div>
                </article>
            }) }
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_alternates_sides() {
        assert_eq!(content_offset(0), 50.0);
        assert_eq!(content_offset(1), -50.0);
        assert_eq!(content_offset(2), 50.0);
    }
}
