//! Chart gallery entry point

use leptos::prelude::*;
use viz_components::Gallery;
use viz_state::provide_gallery_state;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("Starting chart gallery");
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    provide_gallery_state();

    view! { <Gallery /> }
}
