//! Browser pointer events to typed `PointerEvent`s.
//!
//! Hit-testing is left to the browser: a datum element carries its index in
//! a `data-index` attribute and the event target is walked up to it.

use viz_core::{Point, PointerEvent, PointerKind};
use wasm_bindgen::JsCast;

/// Attribute holding the datum index on rendered elements
pub const DATA_INDEX_ATTR: &str = "data-index";

/// Convert a DOM pointer event into chart-local terms
pub fn pointer_event(ev: &web_sys::PointerEvent, kind: PointerKind) -> PointerEvent {
    let client = Point::new(ev.client_x() as f64, ev.client_y() as f64);
    let page = Point::new(ev.page_x() as f64, ev.page_y() as f64);
    let element = ev
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok());

    let local = element
        .as_ref()
        .and_then(|el| el.closest("svg").ok().flatten())
        .map(|svg| {
            let rect = svg.get_bounding_client_rect();
            let viewbox = svg.get_attribute("viewBox").and_then(|vb| parse_viewbox(&vb));
            to_local(client, (rect.left(), rect.top(), rect.width(), rect.height()), viewbox)
        })
        .unwrap_or(client);

    PointerEvent {
        pointer_id: ev.pointer_id(),
        kind,
        local,
        page,
        target: element.as_ref().and_then(datum_index),
    }
}

/// Keep receiving moves for this pointer after it leaves the element
pub fn capture_pointer(ev: &web_sys::PointerEvent) {
    let current = ev
        .current_target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok());
    if let Some(el) = current {
        if let Err(err) = el.set_pointer_capture(ev.pointer_id()) {
            tracing::debug!("Pointer capture refused: {:?}", err);
        }
    }
}

fn datum_index(element: &web_sys::Element) -> Option<usize> {
    let holder = element
        .closest(&format!("[{}]", DATA_INDEX_ATTR))
        .ok()
        .flatten()?;
    holder.get_attribute(DATA_INDEX_ATTR)?.parse().ok()
}

/// `(min_x, min_y, width, height)` of an SVG viewBox
pub fn parse_viewbox(value: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Some((*x, *y, *w, *h)),
        _ => None,
    }
}

/// Map a client point into the SVG user space of an element drawn at
/// `rect = (left, top, width, height)`
pub fn to_local(
    client: Point,
    rect: (f64, f64, f64, f64),
    viewbox: Option<(f64, f64, f64, f64)>,
) -> Point {
    let (left, top, width, height) = rect;
    let offset = client - Point::new(left, top);
    match viewbox {
        Some((vx, vy, vw, vh)) if width > 0.0 && height > 0.0 => {
            Point::new(vx + offset.x * vw / width, vy + offset.y * vh / height)
        }
        _ => offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewbox() {
        assert_eq!(parse_viewbox("0 0 500 250"), Some((0.0, 0.0, 500.0, 250.0)));
        assert_eq!(parse_viewbox("0,0,10,10"), Some((0.0, 0.0, 10.0, 10.0)));
        assert_eq!(parse_viewbox("0 0 0 10"), None);
        assert_eq!(parse_viewbox("bogus"), None);
    }

    #[test]
    fn test_to_local_scales_viewbox() {
        let client = Point::new(110.0, 70.0);
        let rect = (10.0, 20.0, 250.0, 250.0);
        assert_eq!(to_local(client, rect, None), Point::new(100.0, 50.0));
        assert_eq!(
            to_local(client, rect, Some((0.0, 0.0, 500.0, 500.0))),
            Point::new(200.0, 100.0)
        );
    }
}
