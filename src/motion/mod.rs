//! Tweening: easing curves, timelines and the frame-driven player that
//! writes them to elements.

pub mod animator;
pub mod easing;
pub mod style;
pub mod timeline;

pub use animator::{AnimatedElement, Animator, Scrubbed, TweenHandle};
pub use easing::Ease;
pub use style::Prop;
pub use timeline::{Repeat, Timeline, TweenSpec};
