use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::config;
use crate::dom;
use crate::effects::{self, Entrance, PageEffects, Staged};
use crate::motion::{Ease, TweenSpec};
use crate::scroll::trigger::Position;
use crate::scroll::Subscription;

const QUESTIONS: [(&str, &str); 6] = [
    (
        "Do I need my own loupes?",
        "No. Every seat comes with loupes and a headlight for the practical sessions.",
    ),
    (
        "Are the courses accredited?",
        "Each course counts toward verifiable CPD hours and you receive a certificate on the last day.",
    ),
    (
        "Can the whole practice book together?",
        "Yes. Team bookings of four or more get a private slot and a shared planning session.",
    ),
    (
        "What if I have to cancel?",
        "Cancel up to 14 days before the start and we refund in full, or move you to a later date.",
    ),
    (
        "Who are the mentors?",
        "Practising clinicians who still see patients every week, not full-time lecturers.",
    ),
    (
        "Is lunch included?",
        "Lunch and coffee are included on every course day.",
    ),
];

/// Reveal delay for the `index`th item of a grid with `columns` columns:
/// items on the same diagonal reveal together.
pub fn diagonal_delay(index: usize, columns: usize, step: f64) -> f64 {
    let columns = columns.max(1);
    let row = index / columns;
    let col = index % columns;
    (row + col) as f64 * step
}

/// Opening the open item closes it; opening another closes the rest.
pub fn toggle(open: Option<usize>, clicked: usize) -> Option<usize> {
    if open == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

/// Classes of a question item. `active` marks a finished reveal and must
/// survive the accordion opening and closing.
pub fn item_classes(open: bool, revealed: bool) -> Vec<&'static str> {
    let mut classes = vec!["faq-item"];
    if revealed {
        classes.push("active");
    }
    if open {
        classes.push("open");
    }
    classes
}

#[derive(Properties, PartialEq)]
struct FaqItemProps {
    index: usize,
    question: &'static str,
    answer: &'static str,
    open: bool,
    on_toggle: Callback<usize>,
}

fn wire(page: &PageEffects, index: usize, item: Element, revealed: UseStateHandle<bool>) -> Subscription {
    let delay = diagonal_delay(index, config::FAQ_COLUMNS, config::FAQ_DIAGONAL_STAGGER);
    let staged = Staged::new(
        item.clone(),
        Entrance { x: 20.0, y: 30.0, fade: true },
        TweenSpec::new(0.8).ease(Ease::Power3Out).delay(delay),
    )
    .notifying(move || revealed.set(true));
    effects::reveal_on_enter(page, item, Position::top_at(85.0), vec![staged])
}

#[function_component(FaqItem)]
fn faq_item(props: &FaqItemProps) -> Html {
    let item_ref = use_node_ref();
    let answer_ref = use_node_ref();
    let revealed = use_state(|| false);
    let page = use_context::<PageEffects>();

    {
        let item_ref = item_ref.clone();
        let revealed = revealed.clone();
        let index = props.index;
        use_effect_with_deps(
            move |page| {
                let wired = match (page, item_ref.cast::<Element>()) {
                    (Some(page), Some(item)) => Some(wire(page, index, item, revealed)),
                    _ => None,
                };
                move || drop(wired)
            },
            page,
        );
    }

    // max-height follows the content so the CSS transition has a target
    {
        let answer_ref = answer_ref.clone();
        use_effect_with_deps(
            move |open| {
                if let Some(answer) = answer_ref.cast::<Element>() {
                    if *open {
                        dom::set_style(&answer, "max-height", &format!("{}px", answer.scroll_height()));
                    } else {
                        dom::clear_style(&answer, "max-height");
                    }
                }
                || ()
            },
            props.open,
        );
    }

    let toggle = {
        let on_toggle = props.on_toggle.clone();
        let index = props.index;
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            on_toggle.emit(index);
        })
    };

    html! {
        <div class={classes!(item_classes(props.open, *revealed))} ref={item_ref}>
            <button class="faq-question" onclick={toggle}>
                <span class="question-text">{props.question}</span>
                <span class="toggle-icon">{if props.open { "−" } else { "+" }}</span>
            </button>
            <div class="faq-answer" ref={answer_ref}>
                <p>{props.answer}</p>
            </div>
        </div>
    }
}

#[function_component(Faq)]
pub fn faq() -> Html {
    let open = use_state(|| None::<usize>);

    let on_toggle = {
        let open = open.clone();
        Callback::from(move |index: usize| open.set(toggle(*open, index)))
    };

    html! {
        <section class="faq-section" id="faq">
            <h2 class="section-title">{"Frequently asked questions"}</h2>
            <div class="faq-grid">
                { for QUESTIONS.iter().enumerate().map(|(index, (question, answer))| html! {
                    <FaqItem
                        key={index}
                        index={index}
                        question={*question}
                        answer={*answer}
                        open={*open == Some(index)}
                        on_toggle={on_toggle.clone()}
                    />
                }) }
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn diagonal_stagger_on_three_columns() {
        let delays: Vec<f64> = (0..6).map(|i| diagonal_delay(i, 3, 0.15)).collect();
        // row 0: 0, 1, 2 steps; row 1: 1, 2, 3 steps
        let expected = [0.0, 0.15, 0.3, 0.15, 0.3, 0.45];
        for (delay, expected) in delays.iter().zip(expected) {
            assert_abs_diff_eq!(*delay, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_column_staggers_by_row() {
        assert_abs_diff_eq!(diagonal_delay(4, 1, 0.15), 0.6, epsilon = 1e-9);
        assert_abs_diff_eq!(diagonal_delay(4, 0, 0.15), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn only_one_answer_open() {
        assert_eq!(toggle(None, 2), Some(2));
        assert_eq!(toggle(Some(2), 4), Some(4));
        assert_eq!(toggle(Some(4), 4), None);
    }

    #[test]
    fn revealed_items_stay_active_while_toggling() {
        assert_eq!(item_classes(false, false), vec!["faq-item"]);
        assert_eq!(item_classes(true, true), vec!["faq-item", "active", "open"]);
        assert_eq!(item_classes(false, true), vec!["faq-item", "active"]);
    }
}
