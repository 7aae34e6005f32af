use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use web_sys::Element;
use yew::prelude::*;

use crate::config;
use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::error::EffectResult;
use crate::motion::{AnimatedElement, Animator, Ease, Prop, Scrubbed, Timeline, TweenSpec};
use crate::scroll::scene::{MeasuredBounds, ScrubScene};
use crate::scroll::trigger::{self, End, Position, Scrub, ScrubState};
use crate::scroll::{ScrollFrame, Subscription};

struct Course {
    title: &'static str,
    summary: &'static str,
    meta: &'static str,
}

const COURSES: [Course; 5] = [
    Course {
        title: "Composite artistry",
        summary: "Layering, shade matching and finishing on anterior restorations.",
        meta: "2 days · 12 seats",
    },
    Course {
        title: "Guided implant surgery",
        summary: "From scan to surgical guide, with two supervised placements.",
        meta: "3 days · 8 seats",
    },
    Course {
        title: "Endodontics refresh",
        summary: "Rotary systems, irrigation protocols and retreatment cases.",
        meta: "1 day · 16 seats",
    },
    Course {
        title: "Clear aligner planning",
        summary: "Case selection, staging and attachments you can defend.",
        meta: "2 days · 14 seats",
    },
    Course {
        title: "Team hygiene day",
        summary: "Periodontal charting and patient coaching for the whole practice.",
        meta: "1 day · 20 seats",
    },
];

/// Two-digit counter label.
pub fn pad2(n: usize) -> String {
    format!("{:02}", n)
}

/// Index shown by the counter, `None` once progress reaches the very end.
pub fn current_slide(progress: f64, total: usize) -> Option<usize> {
    let index = (progress * total as f64).floor() as usize;
    (index < total).then_some(index)
}

pub fn is_slide_active(progress: f64, total: usize, index: usize) -> bool {
    let offset = progress * total as f64 - index as f64;
    offset > -0.5 && offset < 0.5
}

/// How far the slide strip travels left over the pinned scroll.
pub fn slider_distance(strip_width: f64, viewport_w: f64) -> f64 {
    strip_width - viewport_w + config::GALLERY_EXTRA_SPACE
}

struct Slide {
    el: Element,
    content: Option<Rc<AnimatedElement>>,
    bg: Option<Rc<AnimatedElement>>,
    bg_scrub: ScrubState,
    active: Option<bool>,
}

impl Slide {
    fn new(el: Element) -> Self {
        Self {
            content: dom::query(&el, ".slide-content").ok().map(AnimatedElement::new),
            bg: dom::query(&el, ".slide-bg").ok().map(AnimatedElement::new),
            bg_scrub: ScrubState::new(Scrub::Smooth(0.5)),
            active: None,
            el,
        }
    }

    fn set_active(&mut self, animator: &Animator, active: bool) {
        if self.active == Some(active) {
            return;
        }
        self.active = Some(active);
        dom::toggle_class(&self.el, "active", active);
        let Some(content) = &self.content else {
            return;
        };
        if active {
            animator.to_overwrite(
                content,
                &[(Prop::Opacity, 1.0), (Prop::Y, 0.0)],
                TweenSpec::new(0.5).ease(Ease::Power2Out),
            );
        } else {
            animator.to_overwrite(
                content,
                &[(Prop::Opacity, 0.0), (Prop::Y, 20.0)],
                TweenSpec::new(0.3).ease(Ease::Power2In),
            );
        }
    }

    /// Background drift while the slide crosses the viewport.
    fn parallax(&mut self, frame: &ScrollFrame) {
        let Some(bg) = &self.bg else {
            return;
        };
        let rect = self.el.get_bounding_client_rect();
        let target = trigger::horizontal_progress(rect.left(), rect.width(), frame.viewport_w);
        let progress = self.bg_scrub.step(target, frame.dt);
        bg.set(&[(Prop::XPercent, -20.0 * progress)]);
    }
}

/// The pinned horizontal slider: strip position, progress bar, counter and
/// per-slide state, all from one scroll subscription.
struct Slider {
    animator: Animator,
    bounds: MeasuredBounds,
    scrub: ScrubState,
    strip: Rc<AnimatedElement>,
    strip_el: Element,
    distance: Option<(u32, f64)>,
    fill: Option<Rc<AnimatedElement>>,
    progress_box: Option<Rc<AnimatedElement>>,
    counter: Option<Element>,
    slides: Vec<Slide>,
    entered: bool,
    rendered: Option<(u32, f64)>,
}

impl Slider {
    fn new(animator: Animator, section: &Element) -> EffectResult<Self> {
        let pin = dom::query(section, ".horizontal-slider-pin")?;
        let strip_el = dom::query(section, "#slidesContainer")?;
        let slides: Vec<Slide> = dom::query_all(section, ".slide").into_iter().map(Slide::new).collect();
        if let Ok(total) = dom::query(section, ".total") {
            total.set_text_content(Some(&pad2(slides.len())));
        }
        let progress_box = dom::query(section, ".slider-progress-container").ok().map(AnimatedElement::new);
        if let Some(progress_box) = &progress_box {
            progress_box.set(&[(Prop::Opacity, 0.0)]);
        }
        for slide in &slides {
            if let Some(content) = &slide.content {
                content.set(&[(Prop::Opacity, 0.0), (Prop::Y, 20.0)]);
            }
        }
        Ok(Self {
            animator,
            bounds: MeasuredBounds::new(pin, Position::TOP_TOP, End::Distance(config::GALLERY_SCROLL_DISTANCE)),
            scrub: ScrubState::new(Scrub::Smooth(1.0)),
            strip: AnimatedElement::new(strip_el.clone()),
            strip_el,
            distance: None,
            fill: dom::query(section, ".progress-fill").ok().map(AnimatedElement::new),
            progress_box,
            counter: dom::query(section, ".current").ok(),
            slides,
            entered: false,
            rendered: None,
        })
    }

    fn distance(&mut self, frame: &ScrollFrame) -> f64 {
        match self.distance {
            Some((generation, distance)) if generation == frame.generation => distance,
            _ => {
                let width = self.strip_el.scroll_width() as f64;
                let distance = slider_distance(width, frame.viewport_w);
                self.distance = Some((frame.generation, distance));
                distance
            }
        }
    }

    fn update(&mut self, frame: &ScrollFrame) {
        let bounds = self.bounds.get(frame);
        if !self.entered && bounds.is_past_start(frame.scroll_y) {
            self.enter();
        }
        let progress = self.scrub.step(bounds.progress(frame.scroll_y), frame.dt);
        if self.rendered != Some((frame.generation, progress)) {
            self.rendered = Some((frame.generation, progress));
            let distance = self.distance(frame);
            self.strip.set(&[(Prop::X, -distance * progress)]);
            if self.entered {
                self.progress_changed(progress);
            }
        }
        for slide in &mut self.slides {
            slide.parallax(frame);
        }
    }

    fn enter(&mut self) {
        self.entered = true;
        debug!("course slider entered");
        if let Some(progress_box) = &self.progress_box {
            self.animator.to(progress_box, &[(Prop::Opacity, 1.0)], TweenSpec::new(0.5));
        }
        if let Some(first) = self.slides.first_mut() {
            first.set_active(&self.animator, true);
        }
    }

    fn progress_changed(&mut self, progress: f64) {
        if let Some(fill) = &self.fill {
            self.animator
                .to_overwrite(fill, &[(Prop::WidthPercent, progress * 100.0)], TweenSpec::new(0.1));
        }
        let total = self.slides.len();
        if let (Some(counter), Some(index)) = (&self.counter, current_slide(progress, total)) {
            counter.set_text_content(Some(&pad2(index + 1)));
        }
        for (index, slide) in self.slides.iter_mut().enumerate() {
            slide.set_active(&self.animator, is_slide_active(progress, total, index));
        }
    }
}

struct CoursesEffects {
    _subscriptions: Vec<Subscription>,
}

impl CoursesEffects {
    fn wire(page: &PageEffects, section: &Element) -> EffectResult<Self> {
        let mut subscriptions = Vec::new();

        let target = AnimatedElement::new(section.clone());
        let mut transition = Timeline::new();
        transition
            .add_from_to(
                0,
                &[(Prop::Y, 100.0), (Prop::Opacity, 0.5), (Prop::Scale, 0.98)],
                &[(Prop::Y, 0.0), (Prop::Opacity, 1.0), (Prop::Scale, 1.0)],
                TweenSpec::new(0.5).ease(Ease::Power2Out),
                0.0,
            )
            .add(
                0,
                &[(Prop::Y, 0.0), (Prop::Opacity, 1.0), (Prop::Scale, 1.0)],
                TweenSpec::new(0.5).ease(Ease::Power2InOut),
                0.5,
            );
        subscriptions.push(
            ScrubScene::new(
                section.clone(),
                Position::TOP_BOTTOM,
                End::At(Position::top_at(50.0)),
                Scrub::Immediate,
                Scrubbed::new(vec![target], transition),
            )
            .attach(&page.scroll),
        );

        let mut header = Vec::new();
        if let Ok(title) = dom::query(section, ".section-title") {
            header.push(Staged::new(title, Entrance::RISE, effects::entrance_spec(0.0)));
        }
        if let Ok(subtitle) = dom::query(section, ".section-subtitle") {
            header.push(Staged::new(subtitle, Entrance::RISE, effects::entrance_spec(0.2)));
        }
        subscriptions.push(effects::reveal_on_enter(
            page,
            section.clone(),
            Position::top_at(80.0),
            header,
        ));

        let slider = RefCell::new(Slider::new(page.animator.clone(), section)?);
        subscriptions.push(page.scroll.subscribe(move |frame| slider.borrow_mut().update(frame)));

        Ok(Self {
            _subscriptions: subscriptions,
        })
    }
}

#[function_component(Courses)]
pub fn courses() -> Html {
    let section = use_node_ref();
    let page = use_context::<PageEffects>();

    {
        let section = section.clone();
        use_effect_with_deps(
            move |page| {
                let wired = match (page, section.cast::<Element>()) {
                    (Some(page), Some(section)) => effects::log_wiring("courses", CoursesEffects::wire(page, &section)),
                    _ => None,
                };
                move || drop(wired)
            },
            page,
        );
    }

    let pin_style = format!("height: calc(100vh + {}px)", config::GALLERY_SCROLL_DISTANCE);

    html! {
        <section class="courses-section" id="courses" ref={section}>
            <header class="section-header">
                <h2 class="section-title">{"Courses"}</h2>
                <p class="section-subtitle">{"Scroll through this season's programme."}</p>
            </header>
            <div class="horizontal-slider-pin" style={pin_style}>
                <div class="horizontal-slider-container">
                    <div class="slider-progress-container">
                        <div class="slider-progress"><div class="progress-fill"></div></div>
                        <div class="slider-counter">
                            <span class="current">{"01"}</span>
                            {" / "}
                            <span class="total">{pad2(COURSES.len())}</span>
                        </div>
                    </div>
                    <div class="slides-wrapper" id="slidesWrapper">
                        <div class="slides-container" id="slidesContainer">
                            { for COURSES.iter().enumerate().map(|(i, course)| html! {
                                <article class="slide" key={i}>
                                    <div class={classes!("slide-bg", format!("slide-bg-{}", i + 1))}></div>
                                    <div class="slide-content">
                                        <span class="slide-number">{pad2(i + 1)}</span>
                                        <h3>{course.title}</h3>
                                        <p>{course.summary}</p>
                                        <span class="slide-meta">{course.meta}</span>
                                    </div>
                                </article>
                            }) }
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_zero_padded() {
        assert_eq!(pad2(5), "05");
        assert_eq!(pad2(12), "12");
    }

    #[test]
    fn counter_follows_progress() {
        assert_eq!(current_slide(0.0, 5), Some(0));
        assert_eq!(current_slide(0.39, 5), Some(1));
        assert_eq!(current_slide(0.99, 5), Some(4));
        assert_eq!(current_slide(1.0, 5), None);
    }

    #[test]
    fn one_slide_active_around_its_position() {
        // 5 slides: slide 1 owns progress*5 in (0.5, 1.5)
        assert!(is_slide_active(0.2, 5, 1));
        assert!(!is_slide_active(0.2, 5, 0));
        assert!(!is_slide_active(0.2, 5, 2));
        assert!(is_slide_active(0.0, 5, 0));
        let active = (0..5).filter(|i| is_slide_active(0.47, 5, *i)).count();
        assert_eq!(active, 1);
    }

    #[test]
    fn strip_travel_leaves_extra_space() {
        assert_eq!(slider_distance(5000.0, 1200.0), 3900.0);
    }
}
