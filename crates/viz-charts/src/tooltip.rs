//! Hover tooltip shared by the charts

use leptos::prelude::*;
use viz_core::{Point, PointerEvent, PointerKind, colors};

/// Offset of the tooltip from the pointer, in page pixels
pub const TOOLTIP_OFFSET: f64 = 5.0;

/// z-index of a visible tooltip
pub const TOOLTIP_Z_FRONT: i32 = 99999;

/// Tooltip presentation state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipState {
    pub visible: bool,
    pub content: String,
    pub left: f64,
    pub top: f64,
    pub z_index: i32,
}

impl TooltipState {
    pub fn show(&mut self, content: impl Into<String>, page: Point) {
        self.content = content.into();
        self.visible = true;
        self.z_index = TOOLTIP_Z_FRONT;
        self.follow(page);
    }

    pub fn follow(&mut self, page: Point) {
        self.left = page.x + TOOLTIP_OFFSET;
        self.top = page.y + TOOLTIP_OFFSET;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.z_index = 0;
    }

    /// React to a pointer event. `content` renders the hovered datum; a
    /// datum without content hides the tooltip.
    pub fn handle(&mut self, event: &PointerEvent, content: impl FnOnce(usize) -> Option<String>) {
        match (event.kind, event.target) {
            (PointerKind::Enter | PointerKind::Move, Some(index)) => match content(index) {
                Some(text) => self.show(text, event.page),
                None => self.hide(),
            },
            (PointerKind::Move, None) if self.visible => self.follow(event.page),
            (PointerKind::Leave, _) => self.hide(),
            _ => {}
        }
    }

    pub fn style(&self) -> String {
        format!(
            "position: absolute; left: {}px; top: {}px; z-index: {}; opacity: {}; \
             pointer-events: none; padding: 4px 8px; border-radius: 4px; \
             background: {}; color: #fff; font-size: 12px; white-space: nowrap;",
            self.left,
            self.top,
            self.z_index,
            if self.visible { 1 } else { 0 },
            colors::TOOLTIP_BG,
        )
    }
}

/// Tooltip overlay element
#[component]
pub fn Tooltip(#[prop(into)] state: Signal<TooltipState>) -> impl IntoView {
    view! {
        <div class="viz-tooltip" style=move || state.with(|s| s.style())>
            {move || state.with(|s| s.content.clone())}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: PointerKind, target: Option<usize>, page: Point) -> PointerEvent {
        let event = PointerEvent::new(1, kind, Point::ORIGIN).with_page(page);
        match target {
            Some(t) => event.on(t),
            None => event,
        }
    }

    #[test]
    fn test_enter_move_leave() {
        let mut tooltip = TooltipState::default();
        let labels = ["a", "b"];
        let content = |i: usize| labels.get(i).map(|l| format!("{}: {}", l, i));

        tooltip.handle(&event(PointerKind::Enter, Some(1), Point::new(10.0, 20.0)), content);
        assert!(tooltip.visible);
        assert_eq!(tooltip.content, "b: 1");
        assert_eq!((tooltip.left, tooltip.top), (15.0, 25.0));
        assert_eq!(tooltip.z_index, TOOLTIP_Z_FRONT);

        tooltip.handle(&event(PointerKind::Move, None, Point::new(30.0, 40.0)), content);
        assert_eq!((tooltip.left, tooltip.top), (35.0, 45.0));

        tooltip.handle(&event(PointerKind::Leave, Some(1), Point::ORIGIN), content);
        assert!(!tooltip.visible);
        assert_eq!(tooltip.z_index, 0);
        assert!(tooltip.style().contains("opacity: 0"));
    }

    #[test]
    fn test_missing_datum_hides() {
        let mut tooltip = TooltipState::default();
        tooltip.show("x", Point::ORIGIN);
        tooltip.handle(&event(PointerKind::Move, Some(9), Point::ORIGIN), |_| None);
        assert!(!tooltip.visible);
    }
}
