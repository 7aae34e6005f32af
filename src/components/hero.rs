use std::rc::Rc;

use log::info;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::dom::{self, Listener};
use crate::effects::{self, PageEffects};
use crate::error::EffectResult;
use crate::motion::{AnimatedElement, Ease, Prop, Scrubbed, Timeline, TweenSpec};
use crate::scroll::scene::ScrubScene;
use crate::scroll::trigger::{End, Position, Scrub};
use crate::scroll::Subscription;

/// Maps a pointer coordinate to [-1, 1] across `extent`.
pub fn normalize_pointer(coord: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    (coord / extent).clamp(0.0, 1.0) * 2.0 - 1.0
}

struct HeroParts {
    section: Rc<AnimatedElement>,
    bg: Rc<AnimatedElement>,
    content: Rc<AnimatedElement>,
    heading: Rc<AnimatedElement>,
    lead: Rc<AnimatedElement>,
    button: Rc<AnimatedElement>,
    image: Rc<AnimatedElement>,
}

impl HeroParts {
    fn collect(section: &Element) -> EffectResult<Self> {
        let content = dom::query(section, ".hero-content")?;
        Ok(Self {
            bg: AnimatedElement::new(dom::query(section, ".hero-bg-image")?),
            image: AnimatedElement::new(dom::query(section, ".hero-image")?),
            heading: AnimatedElement::new(dom::query(&content, "h1")?),
            lead: AnimatedElement::new(dom::query(&content, "p")?),
            button: AnimatedElement::new(dom::query(&content, ".btn")?),
            content: AnimatedElement::new(content),
            section: AnimatedElement::new(section.clone()),
        })
    }
}

/// Everything the hero keeps alive while mounted.
struct HeroEffects {
    _scenes: Vec<Subscription>,
    _pointer: Listener,
}

impl HeroEffects {
    fn wire(effects: &PageEffects, section: &Element) -> EffectResult<Self> {
        let parts = HeroParts::collect(section)?;
        let animator = &effects.animator;

        parts.bg.set(&[(Prop::Opacity, 0.0)]);
        parts.image.set(&[(Prop::Opacity, 0.0)]);
        parts.content.set(&[(Prop::Opacity, 0.0), (Prop::Y, 20.0)]);
        let mut intro = Timeline::new();
        intro.add(0, &[(Prop::Opacity, 1.0)], TweenSpec::new(1.5).ease(Ease::Power2Out), 0.0);
        let at = intro.last_end() - 0.8;
        intro.add(1, &[(Prop::Opacity, 1.0)], TweenSpec::new(1.2).ease(Ease::Power3Out), at);
        let at = intro.last_end() - 0.8;
        intro.add(
            2,
            &[(Prop::Opacity, 1.0), (Prop::Y, 0.0)],
            TweenSpec::new(1.2).ease(Ease::Power3Out),
            at,
        );
        animator.play(vec![parts.bg.clone(), parts.image.clone(), parts.content.clone()], intro);

        let linear = TweenSpec::new(0.5).ease(Ease::Linear);
        let mut parallax = Timeline::new();
        parallax
            .add(0, &[(Prop::YPercent, 30.0), (Prop::Scale, 1.1)], linear, 0.0)
            .add(1, &[(Prop::YPercent, -80.0)], linear, 0.0)
            .add(2, &[(Prop::YPercent, -60.0)], linear, 0.0)
            .add(3, &[(Prop::YPercent, -40.0)], linear, 0.0)
            .add(4, &[(Prop::YPercent, 15.0), (Prop::Scale, 0.85)], linear, 0.0);
        let parallax = Scrubbed::new(
            vec![
                parts.bg.clone(),
                parts.heading.clone(),
                parts.lead.clone(),
                parts.button.clone(),
                parts.image.clone(),
            ],
            parallax,
        );
        let mut scenes = vec![ScrubScene::new(
            section.clone(),
            Position::TOP_TOP,
            End::At(Position::BOTTOM_TOP),
            Scrub::Smooth(0.5),
            parallax,
        )
        .attach(&effects.scroll)];

        // the hero fades back as the next section comes up underneath it
        match dom::query_document(".courses-section") {
            Ok(courses) => {
                let mut exit = Timeline::new();
                exit.add(
                    0,
                    &[(Prop::Opacity, 0.7), (Prop::Scale, 0.95)],
                    TweenSpec::new(0.5).ease(Ease::Power1In),
                    0.0,
                );
                scenes.push(
                    ScrubScene::new(
                        courses,
                        Position::TOP_BOTTOM,
                        End::At(Position::top_at(70.0)),
                        Scrub::Immediate,
                        Scrubbed::new(vec![parts.section.clone()], exit),
                    )
                    .attach(&effects.scroll),
                );
            }
            Err(e) => info!("hero exit skipped: {}", e),
        }

        let pointer = {
            let animator = animator.clone();
            Listener::new(section, "pointermove", move |event| {
                let Ok(event) = event.dyn_into::<MouseEvent>() else {
                    return;
                };
                let (width, height) = dom::viewport();
                let x = normalize_pointer(event.client_x() as f64, width);
                let y = normalize_pointer(event.client_y() as f64, height);
                let follow = TweenSpec::new(1.0).ease(Ease::Power3Out);
                animator.to_overwrite(&parts.bg, &[(Prop::X, x * 20.0), (Prop::Y, y * 20.0)], follow);
                animator.to_overwrite(
                    &parts.image,
                    &[
                        (Prop::X, x * -15.0),
                        (Prop::Y, y * -15.0),
                        (Prop::RotateY, x * 5.0),
                        (Prop::RotateX, y * -5.0),
                    ],
                    follow,
                );
                animator.to_overwrite(&parts.heading, &[(Prop::X, x * 10.0)], follow);
            })?
        };

        Ok(Self {
            _scenes: scenes,
            _pointer: pointer,
        })
    }
}

#[function_component(Hero)]
pub fn hero() -> Html {
    let section = use_node_ref();
    let page = use_context::<PageEffects>();

    {
        let section = section.clone();
        use_effect_with_deps(
            move |page| {
                let wired = match (page, section.cast::<Element>()) {
                    (Some(page), Some(section)) => effects::log_wiring("hero", HeroEffects::wire(page, &section)),
                    _ => None,
                };
                move || drop(wired)
            },
            page,
        );
    }

    html! {
        <section class="hero-section" id="top" ref={section}>
            <div class="hero-bg-image"></div>
            <div class="hero-inner">
                <div class="hero-content">
                    <h1>{"Hands-on dentistry courses for the whole team"}</h1>
                    <p>{"Small groups, real patients and mentors who still practise every week."}</p>
                    <a href="#courses" class="btn">{"Browse courses"}</a>
                </div>
                <img class="hero-image" src="/assets/hero-smile.webp" alt="Dentist explaining a treatment plan" />
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_maps_to_unit_range() {
        assert_eq!(normalize_pointer(0.0, 1200.0), -1.0);
        assert_eq!(normalize_pointer(600.0, 1200.0), 0.0);
        assert_eq!(normalize_pointer(1200.0, 1200.0), 1.0);
    }

    #[test]
    fn pointer_outside_the_viewport_is_clamped() {
        assert_eq!(normalize_pointer(-50.0, 800.0), -1.0);
        assert_eq!(normalize_pointer(2000.0, 800.0), 1.0);
        assert_eq!(normalize_pointer(10.0, 0.0), 0.0);
    }
}
