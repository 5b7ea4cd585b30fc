//! Force-laid-out bubble chart.
//!
//! Circles settle under collision, a weak charge and a pull toward the
//! centre. Bubbles can be dragged, and a click cycles the bubble's radius.
//!
//! Clicks are recognised from the pointer stream rather than DOM `click`
//! events: the svg captures the pointer on press, so the browser's click
//! never reaches the circle. A press and release on the same bubble that
//! travels no further than [`CLICK_SLOP`] is a click.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{ChartDimensions, Tooltip, TooltipState, capture_pointer, colors, pointer_event};
use leptos::prelude::*;
use viz_core::{
    BubbleDatum, Point, PointerEvent, PointerId, PointerKind, RADIUS_SCALE, VizResult, next_radius,
    validate_bubbles,
};
use viz_force::{
    Collide, DRAG_REHEAT_ALPHA, DragController, DragOutcome, ManyBody, Position, SimHandle,
    SimNode, Simulation, SimulationConfig, TimerClock, run_tick_loop,
};
use wasm_bindgen_futures::spawn_local;

/// Pointer travel, in chart pixels, up to which a press-release is a click
pub const CLICK_SLOP: f64 = 3.0;

/// Bubble chart configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleConfig {
    pub width: f64,
    pub height: f64,
    /// Pixels per unit of dataset radius
    pub radius_scale: f64,
    pub collide_strength: f64,
    pub collide_iterations: usize,
    /// Many-body strength
    pub charge: f64,
    /// Strength of the x/y pull toward the centre
    pub pull: f64,
    pub simulation: SimulationConfig,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            radius_scale: RADIUS_SCALE,
            collide_strength: 1.0,
            collide_iterations: 50,
            charge: 5.0,
            pull: 0.1,
            simulation: SimulationConfig::default(),
        }
    }
}

impl BubbleConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_collide_iterations(mut self, iterations: usize) -> Self {
        self.collide_iterations = iterations;
        self
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn dimensions(&self) -> ChartDimensions {
        ChartDimensions::new(self.width, self.height)
    }
}

/// One rendered bubble
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleCircle {
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    /// Radius in pixels
    pub r: f64,
    pub label: String,
}

/// Circles for the current simulation state
pub fn bubble_circles(sim: &Simulation<BubbleDatum>, radius_scale: f64) -> Vec<BubbleCircle> {
    sim.nodes()
        .iter()
        .map(|node| BubbleCircle {
            index: node.index,
            cx: node.x,
            cy: node.y,
            r: node.r * radius_scale,
            label: node.data.label.clone(),
        })
        .collect()
}

// ============================================================================
// SCENE
// ============================================================================

/// Where a pointer went down and whether it has since moved past the slop
#[derive(Debug, Clone, Copy)]
struct Press {
    at: Point,
    moved: bool,
}

/// Bubble chart state: the simulation plus drag sessions
pub struct BubbleScene {
    config: BubbleConfig,
    sim: Rc<RefCell<Simulation<BubbleDatum>>>,
    drag: DragController,
    presses: HashMap<PointerId, Press>,
}

impl BubbleScene {
    pub fn new(data: Vec<BubbleDatum>, config: BubbleConfig) -> VizResult<Self> {
        validate_bubbles(&data)?;

        let center = config.dimensions().center();
        let mut sim = Simulation::new(config.simulation.clone())
            .with_center(center)
            .with_force(
                "collide",
                Collide::new(config.radius_scale)
                    .strength(config.collide_strength)
                    .iterations(config.collide_iterations),
            )
            .with_force("charge", ManyBody::new(config.charge))
            .with_force("x", Position::x(center.x).strength(config.pull))
            .with_force("y", Position::y(center.y).strength(config.pull));

        let nodes = data
            .into_iter()
            .map(|datum| {
                let position = datum.x.zip(datum.y).map(|(x, y)| viz_core::Point::new(x, y));
                SimNode::new(datum.clone(), datum.r).with_position(position)
            })
            .collect();
        sim.start(nodes);

        tracing::info!("Bubble chart built with {} bubbles", sim.len());
        Ok(Self {
            config,
            sim: Rc::new(RefCell::new(sim)),
            drag: DragController::new().with_reheat_alpha(DRAG_REHEAT_ALPHA),
            presses: HashMap::new(),
        })
    }

    pub fn config(&self) -> &BubbleConfig {
        &self.config
    }

    pub fn simulation(&self) -> Rc<RefCell<Simulation<BubbleDatum>>> {
        self.sim.clone()
    }

    pub fn len(&self) -> usize {
        self.sim.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sim.borrow().is_empty()
    }

    pub fn circles(&self) -> Vec<BubbleCircle> {
        bubble_circles(&self.sim.borrow(), self.config.radius_scale)
    }

    /// Current dataset with live positions and radii
    pub fn dataset(&self) -> Vec<BubbleDatum> {
        self.sim
            .borrow()
            .nodes()
            .iter()
            .map(|node| BubbleDatum {
                x: Some(node.x),
                y: Some(node.y),
                r: node.r,
                label: node.data.label.clone(),
            })
            .collect()
    }

    /// Cycle the bubble's radius and let the layout adapt
    pub fn click(&mut self, index: usize) -> Option<f64> {
        let mut sim = self.sim.borrow_mut();
        let r = next_radius(sim.node(index)?.r);
        sim.set_radius(index, r);
        sim.reheat(DRAG_REHEAT_ALPHA);
        tracing::debug!("Bubble {} radius -> {}", index, r);
        Some(r)
    }

    /// Feed a pointer event to the drag state. A release that ends a press
    /// without real movement clicks the bubble.
    pub fn pointer(&mut self, event: &PointerEvent) -> DragOutcome {
        let outcome = self.drag.handle(&mut self.sim.borrow_mut(), event);
        match outcome {
            DragOutcome::Started(_) => {
                self.presses.insert(
                    event.pointer_id,
                    Press {
                        at: event.local,
                        moved: false,
                    },
                );
            }
            DragOutcome::Dragged(_) => {
                if let Some(press) = self.presses.get_mut(&event.pointer_id) {
                    let travel = event.local - press.at;
                    press.moved |= travel.x.hypot(travel.y) > CLICK_SLOP;
                }
            }
            DragOutcome::Ended(index) => {
                let press = self.presses.remove(&event.pointer_id);
                let clicked = event.kind == PointerKind::Up && press.is_some_and(|p| !p.moved);
                if clicked {
                    self.click(index);
                }
            }
            DragOutcome::Ignored => {}
        }
        outcome
    }

    /// Tooltip text: label and radius
    pub fn tooltip_text(&self, index: usize) -> Option<String> {
        let sim = self.sim.borrow();
        let node = sim.node(index)?;
        Some(format!("{} {}", node.data.label, node.r))
    }

    /// Release every drag, e.g. on teardown
    pub fn cancel_drags(&mut self) {
        self.presses.clear();
        self.drag.cancel_all(&mut self.sim.borrow_mut());
    }
}

// ============================================================================
// COMPONENT
// ============================================================================

/// Bubble chart component. Owns the tick loop for its scene and stops it on
/// cleanup.
#[component]
pub fn BubbleChart(scene: BubbleScene) -> impl IntoView {
    let dims = scene.config().dimensions();
    let scale = scene.config().radius_scale;
    let count = scene.len();

    let circles = RwSignal::new(scene.circles());
    let hovered = RwSignal::new(None::<usize>);
    let tooltip = RwSignal::new(TooltipState::default());

    let handle = SimHandle::new();
    spawn_local(run_tick_loop(
        scene.simulation(),
        handle.clone(),
        TimerClock::default(),
        move |_, sim| circles.set(bubble_circles(sim, scale)),
    ));

    let scene = StoredValue::new_local(scene);
    {
        let handle = handle.clone();
        on_cleanup(move || handle.stop());
    }

    let on_pointer = move |ev: web_sys::PointerEvent, kind: PointerKind| {
        let event = pointer_event(&ev, kind);
        if kind == PointerKind::Down && event.target.is_some() {
            capture_pointer(&ev);
        }
        let mut outcome = DragOutcome::Ignored;
        scene.update_value(|s| outcome = s.pointer(&event));
        if matches!(outcome, DragOutcome::Ended(_)) {
            circles.set(scene.with_value(|s| s.circles()));
        }
    };

    let bubbles = (0..count)
        .map(|i| {
            let attr = move |f: fn(&BubbleCircle) -> f64| circles.with(|c| c.get(i).map(f).unwrap_or(0.0));
            view! {
                <circle
                    data-index=i
                    class="bubble"
                    class:hover=move || hovered.get() == Some(i)
                    cx=move || attr(|c| c.cx)
                    cy=move || attr(|c| c.cy)
                    r=move || attr(|c| c.r)
                    fill=move || if hovered.get() == Some(i) { colors::BUBBLE_HOVER } else { colors::BUBBLE }
                    on:pointermove=move |ev: web_sys::PointerEvent| {
                        let event = pointer_event(&ev, PointerKind::Move);
                        hovered.set(Some(i));
                        let text = scene.with_value(|s| s.tooltip_text(i));
                        tooltip.update(|t| t.handle(&event.on(i), |_| text));
                    }
                    on:pointerleave=move |ev: web_sys::PointerEvent| {
                        let event = pointer_event(&ev, PointerKind::Leave);
                        hovered.set(None);
                        tooltip.update(|t| t.handle(&event, |_| None));
                    }
                />
            }
        })
        .collect_view();

    view! {
        <div class="viz-bubble-chart">
            <svg
                width=dims.width
                height=dims.height
                viewBox=dims.viewbox()
                on:pointerdown=move |ev| on_pointer(ev, PointerKind::Down)
                on:pointermove=move |ev| on_pointer(ev, PointerKind::Move)
                on:pointerup=move |ev| on_pointer(ev, PointerKind::Up)
                on:pointercancel=move |ev| on_pointer(ev, PointerKind::Cancel)
            >
                {bubbles}
            </svg>
            <Tooltip state=tooltip />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::{Point, samples};

    fn scene() -> BubbleScene {
        BubbleScene::new(samples::bubbles(), BubbleConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert!(BubbleScene::new(Vec::new(), BubbleConfig::default()).is_err());
    }

    #[test]
    fn test_circles_scaled() {
        let scene = scene();
        let circles = scene.circles();
        assert_eq!(circles.len(), 10);
        assert_eq!(circles[0].r, 50.0);
        assert_eq!(circles[0].label, "rust");
        assert!(circles.iter().all(|c| c.cx.is_finite() && c.cy.is_finite()));
    }

    #[test]
    fn test_click_cycles_radius() {
        let mut scene = scene();
        scene.simulation().borrow_mut().run_until_settled(1_000);

        assert_eq!(scene.click(0), Some(6.0));
        assert_eq!(scene.circles()[0].r, 60.0);
        assert!(scene.simulation().borrow().is_running());
        assert_eq!(scene.click(0), Some(1.0));
        assert_eq!(scene.click(3), Some(1.0));
        assert_eq!(scene.click(99), None);
        assert_eq!(scene.tooltip_text(0).as_deref(), Some("rust 1"));
    }

    fn press_release(scene: &mut BubbleScene, index: usize, moves: &[Point], release: PointerKind) {
        let at = scene.circles()[index].clone();
        let start = Point::new(at.cx, at.cy);
        scene.pointer(&PointerEvent::new(1, PointerKind::Down, start).on(index));
        for &to in moves {
            scene.pointer(&PointerEvent::new(1, PointerKind::Move, to));
        }
        let end = moves.last().copied().unwrap_or(start);
        scene.pointer(&PointerEvent::new(1, release, end));
    }

    #[test]
    fn test_press_release_cycles_radius() {
        let mut scene = scene();
        press_release(&mut scene, 2, &[], PointerKind::Up);
        assert_eq!(scene.circles()[2].r, 50.0);
        assert!(scene.simulation().borrow().is_running());

        // Jitter within the slop still counts as a click
        let c = scene.circles()[2].clone();
        press_release(&mut scene, 2, &[Point::new(c.cx + 1.0, c.cy + 1.0)], PointerKind::Up);
        assert_eq!(scene.circles()[2].r, 60.0);
    }

    #[test]
    fn test_drag_release_keeps_radius() {
        let mut scene = scene();
        press_release(&mut scene, 2, &[Point::new(10.0, 10.0)], PointerKind::Up);
        assert_eq!(scene.circles()[2].r, 40.0);

        press_release(&mut scene, 2, &[], PointerKind::Cancel);
        assert_eq!(scene.circles()[2].r, 40.0);
    }

    #[test]
    fn test_dataset_tracks_layout() {
        let scene = scene();
        scene.simulation().borrow_mut().run_until_settled(1_000);
        let data = scene.dataset();
        assert_eq!(data.len(), 10);
        assert!(data.iter().all(|d| d.x.is_some() && d.y.is_some()));
        assert_eq!(data[5].label, "zig");
    }
}
