use log::info;
use web_sys::Element;
use yew::prelude::*;

use crate::effects::PageEffects;
use crate::testimonial::{MorphicTestimonial, TestimonialParts};

const QUOTE: &str = "I came for the implant course and left with a calmer way of working. \
    My patients noticed before I did.";

const TOOTH_PATH: &str = "M60 20 C40 20 28 34 30 56 C32 78 40 96 44 118 C46 130 56 132 58 118 \
    C60 104 62 96 70 96 C78 96 80 104 82 118 C84 132 94 130 96 118 C100 96 108 78 110 56 \
    C112 34 100 20 80 20 C74 20 72 24 70 24 C68 24 66 20 60 20 Z";

const SHINE_PATH: &str = "M44 40 C46 32 54 28 62 30";

#[function_component(Testimonial)]
pub fn testimonial() -> Html {
    let section = use_node_ref();
    let page = use_context::<PageEffects>();

    {
        let section = section.clone();
        use_effect_with_deps(
            move |page| {
                let block = match (page, section.cast::<Element>()) {
                    (Some(page), Some(section)) => Some(MorphicTestimonial::mount(
                        TestimonialParts::collect(section),
                        page.motion.clone(),
                        page.animator.clone(),
                    )),
                    _ => {
                        info!("testimonial mounted without page effects");
                        None
                    }
                };
                move || {
                    if let Some(block) = block {
                        block.destroy();
                    }
                }
            },
            page,
        );
    }

    html! {
        <section class="morphic-testimonial" id="morphic-testimonial" ref={section}>
            <div class="morphic-text">
                <h2 class="morphic-title">{"Why they come back"}</h2>
                <blockquote class="morphic-quote">
                    { for QUOTE.split_whitespace().map(|word| html! {
                        <span class="morphic-word">{format!("{} ", word)}</span>
                    }) }
                </blockquote>
                <cite class="morphic-author">{"Dr. Lena Horvath, returning student"}</cite>
            </div>
            <div class="tooth-orb">
                <svg class="tooth-visual" viewBox="0 0 140 150" aria-hidden="true">
                    <path class="tooth-shape" d={TOOTH_PATH} />
                    <path class="tooth-shine" d={SHINE_PATH} />
                </svg>
                <div class="spark-layer" aria-hidden="true">
                    { for (0..6).map(|i| html! { <span class={classes!("spark", format!("spark-{}", i + 1))}></span> }) }
                </div>
            </div>
        </section>
    }
}
