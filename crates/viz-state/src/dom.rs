//! Mount point lookup

use viz_core::{VizError, VizResult};
use wasm_bindgen::JsCast;

/// Resolve a CSS selector to the element a chart mounts under
pub fn resolve_mount(selector: &str) -> VizResult<web_sys::HtmlElement> {
    let not_found = || VizError::MountNotFound(selector.to_string());

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(not_found)?;

    document
        .query_selector(selector)
        .map_err(|err| {
            tracing::warn!("Invalid mount selector {}: {:?}", selector, err);
            not_found()
        })?
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(not_found)
}
