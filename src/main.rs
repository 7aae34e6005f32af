use log::info;
use yew::prelude::*;

mod config;
mod dom;
mod effects;
mod error;
mod frame;
mod motion;
mod scroll;
mod testimonial;

mod components {
    pub mod courses;
    pub mod cta;
    pub mod faq;
    pub mod footer;
    pub mod gallery;
    pub mod hero;
    pub mod nav;
    pub mod pricing;
    pub mod testimonial;
    pub mod videos;
}
mod pages {
    pub mod landing;
}

use components::nav::Nav;
use pages::landing::Landing;

#[function_component]
fn App() -> Html {
    html! {
        <>
            <Nav />
            <Landing />
        </>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page");
    yew::Renderer::<App>::new().render();
}
