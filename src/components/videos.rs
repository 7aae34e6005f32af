use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use web_sys::{Element, HtmlMediaElement, MouseEvent};
use yew::prelude::*;

use crate::config;
use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::error::EffectResult;
use crate::motion::{AnimatedElement, Animator, Ease, Prop, Timeline, TweenSpec};
use crate::scroll::trigger::Position;
use crate::scroll::Subscription;

struct Story {
    name: &'static str,
    role: &'static str,
    video: &'static str,
    likes: u32,
}

static STORIES: [Story; 3] = [
    Story {
        name: "Dr. Aino Virtanen",
        role: "General dentist",
        video: "/assets/stories/aino.mp4",
        likes: 214,
    },
    Story {
        name: "Dr. Samuel Reed",
        role: "Implantologist",
        video: "/assets/stories/samuel.mp4",
        likes: 187,
    },
    Story {
        name: "Maria Costa",
        role: "Dental hygienist",
        video: "/assets/stories/maria.mp4",
        likes: 342,
    },
];

/// Which story plays after the play button of `clicked` is pressed.
pub fn next_playing(playing: Option<usize>, clicked: usize) -> Option<usize> {
    if playing == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Scale pop on the like counter.
fn pulse(animator: &Animator, target: &Rc<AnimatedElement>) {
    animator.overwrite(target, [Prop::Scale]);
    animator.from_to(
        target,
        &[(Prop::Scale, 1.0)],
        &[(Prop::Scale, 1.3)],
        TweenSpec::new(0.3).ease(Ease::BackOut(1.7)).yoyo(1),
    );
}

/// A heart that pops up over the video and removes itself.
fn heart_burst(animator: &Animator, wrapper: &Element) -> EffectResult<()> {
    let heart = dom::document()?.create_element("div")?;
    heart.set_class_name("instagram-heart");
    heart.set_inner_html("<i class=\"fas fa-heart\"></i>");
    for (property, value) in [
        ("position", "absolute"),
        ("top", "50%"),
        ("left", "50%"),
        ("margin", "-40px 0 0 -40px"),
        ("color", "white"),
        ("font-size", "80px"),
        ("z-index", "10"),
        ("pointer-events", "none"),
    ] {
        dom::set_style(&heart, property, value);
    }
    wrapper.append_child(&heart)?;

    let target = AnimatedElement::new(heart.clone());
    target.set(&[(Prop::Opacity, 0.0)]);
    let mut burst = Timeline::new();
    burst.add(
        0,
        &[(Prop::Opacity, 1.0), (Prop::Scale, 1.2)],
        TweenSpec::new(0.3).ease(Ease::BackOut(1.7)),
        0.0,
    );
    let at = burst.last_end();
    burst.add(
        0,
        &[(Prop::Opacity, 0.0), (Prop::Scale, 0.5)],
        TweenSpec::new(0.3).delay(0.5),
        at,
    );
    animator.play_then(vec![target], burst, move || heart.remove());
    Ok(())
}

#[derive(Properties, PartialEq)]
struct VideoCardProps {
    index: usize,
    playing: bool,
    on_play: Callback<usize>,
    on_ended: Callback<usize>,
}

#[function_component(VideoCard)]
fn video_card(props: &VideoCardProps) -> Html {
    let story = &STORIES[props.index];
    let page = use_context::<PageEffects>();
    let likes = use_state(|| story.likes);
    let video_ref = use_node_ref();
    let wrapper_ref = use_node_ref();
    let like_ref = use_node_ref();
    let like_target: Rc<RefCell<Option<Rc<AnimatedElement>>>> = use_mut_ref(|| None);

    let pulse_likes = {
        let page = page.clone();
        let like_ref = like_ref.clone();
        let like_target = like_target.clone();
        move || {
            let (Some(page), Some(el)) = (&page, like_ref.cast::<Element>()) else {
                return;
            };
            let target = like_target
                .borrow_mut()
                .get_or_insert_with(|| AnimatedElement::new(el))
                .clone();
            pulse(&page.animator, &target);
        }
    };

    {
        let video_ref = video_ref.clone();
        let pulse_likes = pulse_likes.clone();
        use_effect_with_deps(
            move |playing| {
                if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                    if *playing {
                        video.set_muted(false);
                        if let Err(e) = video.play() {
                            warn!("video did not start: {:?}", e);
                        }
                        pulse_likes();
                    } else if !video.paused() {
                        let _ = video.pause();
                    }
                }
                || ()
            },
            props.playing,
        );
    }

    let on_play = {
        let on_play = props.on_play.clone();
        let index = props.index;
        Callback::from(move |_: MouseEvent| on_play.emit(index))
    };

    let on_like = {
        let likes = likes.clone();
        let wrapper_ref = wrapper_ref.clone();
        Callback::from(move |_: MouseEvent| {
            likes.set(*likes + 1);
            if let (Some(page), Some(wrapper)) = (&page, wrapper_ref.cast::<Element>()) {
                if let Err(e) = heart_burst(&page.animator, &wrapper) {
                    debug!("heart burst skipped: {}", e);
                }
            }
            pulse_likes();
        })
    };

    let on_ended = {
        let on_ended = props.on_ended.clone();
        let index = props.index;
        Callback::from(move |_: Event| on_ended.emit(index))
    };

    let overlay_style = if props.playing { "opacity: 0" } else { "opacity: 1" };

    html! {
        <div class="video-testimonial">
            <div class="video-wrapper" ref={wrapper_ref}>
                <video
                    ref={video_ref}
                    src={story.video}
                    playsinline=true
                    muted=true
                    preload="metadata"
                    ondblclick={on_like}
                    onended={on_ended}
                />
                <div class="video-overlay" style={overlay_style}>
                    <button class="play-btn" aria-label="Play" onclick={on_play.clone()}>
                        <i class="fas fa-play"></i>
                    </button>
                </div>
                if props.playing {
                    <button class="pause-btn" aria-label="Pause" onclick={on_play}></button>
                }
            </div>
            <div class="video-meta">
                <span class="video-author">{story.name}</span>
                <span class="video-role">{story.role}</span>
                <span class="video-like-count" ref={like_ref}>
                    <i class="fas fa-heart"></i>{format!(" {}", *likes)}
                </span>
            </div>
        </div>
    }
}

fn wire(page: &PageEffects, section: &Element) -> Vec<Subscription> {
    dom::query_all(section, ".video-testimonial")
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
        .collect()
}

#[function_component(VideoStories)]
pub fn video_stories() -> Html {
    let playing = use_state(|| None::<usize>);
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

    let on_play = {
        let playing = playing.clone();
        Callback::from(move |index: usize| playing.set(next_playing(*playing, index)))
    };
    let on_ended = {
        let playing = playing.clone();
        Callback::from(move |index: usize| {
            if *playing == Some(index) {
                playing.set(None);
            }
        })
    };

    html! {
        <section class="testimonials-section" id="testimonials" ref={section}>
            <h2 class="section-title">{"Stories from the chair"}</h2>
            <div class="video-grid">
                { for (0..STORIES.len()).map(|index| html! {
                    <VideoCard
                        key={index}
                        index={index}
                        playing={*playing == Some(index)}
                        on_play={on_play.clone()}
                        on_ended={on_ended.clone()}
                    />
                }) }
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_video_plays_at_a_time() {
        assert_eq!(next_playing(None, 1), Some(1));
        assert_eq!(next_playing(Some(1), 2), Some(2));
    }

    #[test]
    fn clicking_the_playing_video_pauses_it() {
        assert_eq!(next_playing(Some(2), 2), None);
    }
}
