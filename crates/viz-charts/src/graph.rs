//! Force-directed graph: nodes coloured by group, joined by springs

use std::cell::RefCell;
use std::rc::Rc;

use crate::{ChartDimensions, Tooltip, TooltipState, capture_pointer, colors, pointer_event};
use leptos::prelude::*;
use viz_core::{GraphData, GraphNode, PointerEvent, PointerKind, RADIUS_SCALE, ResolvedLink, VizResult};
use viz_force::{
    Collide, DragController, DragOutcome, Link, ManyBody, Position, SimHandle, SimNode, Simulation,
    SimulationConfig, TimerClock, run_tick_loop,
};
use wasm_bindgen_futures::spawn_local;

/// Force-directed graph configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    pub width: f64,
    pub height: f64,
    pub radius_scale: f64,
    pub link_distance: f64,
    /// Many-body strength; negative repels
    pub charge: f64,
    pub pull: f64,
    pub simulation: SimulationConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            radius_scale: RADIUS_SCALE,
            link_distance: 30.0,
            charge: -30.0,
            pull: 0.05,
            simulation: SimulationConfig::default(),
        }
    }
}

impl GraphConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_link_distance(mut self, distance: f64) -> Self {
        self.link_distance = distance;
        self
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn dimensions(&self) -> ChartDimensions {
        ChartDimensions::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphCircle {
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
}

/// Positions of every node and link for one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphFrame {
    pub circles: Vec<GraphCircle>,
    pub lines: Vec<GraphLine>,
}

impl GraphFrame {
    fn capture(
        sim: &Simulation<GraphNode>,
        links: &[ResolvedLink],
        groups: &[String],
        radius_scale: f64,
    ) -> Self {
        let nodes = sim.nodes();
        let circles = nodes
            .iter()
            .map(|node| {
                let group = groups.iter().position(|g| *g == node.data.group).unwrap_or(0);
                GraphCircle {
                    index: node.index,
                    cx: node.x,
                    cy: node.y,
                    r: node.r * radius_scale,
                    color: colors::category10(group),
                }
            })
            .collect();

        let lines = links
            .iter()
            .filter_map(|link| {
                let s = nodes.get(link.source)?;
                let t = nodes.get(link.target)?;
                Some(GraphLine {
                    x1: s.x,
                    y1: s.y,
                    x2: t.x,
                    y2: t.y,
                    width: link.value.max(0.0).sqrt(),
                })
            })
            .collect();

        Self { circles, lines }
    }
}

// ============================================================================
// SCENE
// ============================================================================

pub struct GraphScene {
    config: GraphConfig,
    sim: Rc<RefCell<Simulation<GraphNode>>>,
    links: Rc<Vec<ResolvedLink>>,
    groups: Rc<Vec<String>>,
    drag: DragController,
}

impl GraphScene {
    pub fn new(data: GraphData, config: GraphConfig) -> VizResult<Self> {
        let links = data.resolve_links()?;
        let groups: Vec<String> = data.groups().into_iter().map(str::to_string).collect();

        let center = config.dimensions().center();
        let mut sim = Simulation::new(config.simulation.clone())
            .with_center(center)
            .with_force(
                "link",
                Link::new(links.iter().map(|l| (l.source, l.target)).collect())
                    .distance(config.link_distance),
            )
            .with_force("charge", ManyBody::new(config.charge))
            .with_force("collide", Collide::new(config.radius_scale))
            .with_force("x", Position::x(center.x).strength(config.pull))
            .with_force("y", Position::y(center.y).strength(config.pull));

        let nodes = data
            .nodes
            .into_iter()
            .map(|node| {
                let r = node.radius;
                SimNode::new(node, r)
            })
            .collect();
        sim.start(nodes);

        tracing::info!(
            "Force graph built with {} nodes and {} links",
            sim.len(),
            links.len()
        );
        Ok(Self {
            config,
            sim: Rc::new(RefCell::new(sim)),
            links: Rc::new(links),
            groups: Rc::new(groups),
            drag: DragController::new(),
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn simulation(&self) -> Rc<RefCell<Simulation<GraphNode>>> {
        self.sim.clone()
    }

    pub fn links(&self) -> &[ResolvedLink] {
        &self.links
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.sim.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sim.borrow().is_empty()
    }

    pub fn frame(&self) -> GraphFrame {
        GraphFrame::capture(&self.sim.borrow(), &self.links, &self.groups, self.config.radius_scale)
    }

    /// Frame builder usable from inside the tick callback
    pub fn framer(&self) -> impl Fn(&Simulation<GraphNode>) -> GraphFrame + 'static {
        let links = self.links.clone();
        let groups = self.groups.clone();
        let scale = self.config.radius_scale;
        move |sim| GraphFrame::capture(sim, &links, &groups, scale)
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> DragOutcome {
        self.drag.handle(&mut self.sim.borrow_mut(), event)
    }

    pub fn tooltip_text(&self, index: usize) -> Option<String> {
        let sim = self.sim.borrow();
        let node = &sim.node(index)?.data;
        Some(format!(
            "{} ({}): {} citing",
            node.id, node.group, node.citing_patents_count
        ))
    }
}

// ============================================================================
// COMPONENT
// ============================================================================

#[component]
pub fn ForceGraph(scene: GraphScene) -> impl IntoView {
    let dims = scene.config().dimensions();
    let node_count = scene.len();
    let link_count = scene.links().len();

    let frame = RwSignal::new(scene.frame());
    let tooltip = RwSignal::new(TooltipState::default());

    let handle = SimHandle::new();
    let framer = scene.framer();
    spawn_local(run_tick_loop(
        scene.simulation(),
        handle.clone(),
        TimerClock::default(),
        move |_, sim| frame.set(framer(sim)),
    ));
    {
        let handle = handle.clone();
        on_cleanup(move || handle.stop());
    }

    let scene = StoredValue::new_local(scene);
    let on_pointer = move |ev: web_sys::PointerEvent, kind: PointerKind| {
        let event = pointer_event(&ev, kind);
        if kind == PointerKind::Down && event.target.is_some() {
            capture_pointer(&ev);
        }
        scene.update_value(|s| {
            s.pointer(&event);
        });
    };

    let lines = (0..link_count)
        .map(|i| {
            let line = move || frame.with(|f| f.lines.get(i).copied().unwrap_or_default());
            view! {
                <line
                    class="link"
                    x1=move || line().x1
                    y1=move || line().y1
                    x2=move || line().x2
                    y2=move || line().y2
                    stroke=colors::LINK
                    stroke-opacity="0.6"
                    stroke-width=move || line().width
                />
            }
        })
        .collect_view();

    let circles = (0..node_count)
        .map(|i| {
            let circle = move || frame.with(|f| f.circles.get(i).cloned());
            view! {
                <circle
                    data-index=i
                    class="node"
                    cx=move || circle().map(|c| c.cx).unwrap_or(0.0)
                    cy=move || circle().map(|c| c.cy).unwrap_or(0.0)
                    r=move || circle().map(|c| c.r).unwrap_or(0.0)
                    fill=move || circle().map(|c| c.color).unwrap_or(colors::BUBBLE)
                    stroke="#fff"
                    stroke-width="1.5"
                    on:pointermove=move |ev: web_sys::PointerEvent| {
                        let event = pointer_event(&ev, PointerKind::Move).on(i);
                        let text = scene.with_value(|s| s.tooltip_text(i));
                        tooltip.update(|t| t.handle(&event, |_| text));
                    }
                    on:pointerleave=move |ev: web_sys::PointerEvent| {
                        let event = pointer_event(&ev, PointerKind::Leave);
                        tooltip.update(|t| t.handle(&event, |_| None));
                    }
                />
            }
        })
        .collect_view();

    view! {
        <div class="viz-force-graph">
            <svg
                width=dims.width
                height=dims.height
                viewBox=dims.viewbox()
                on:pointerdown=move |ev| on_pointer(ev, PointerKind::Down)
                on:pointermove=move |ev| on_pointer(ev, PointerKind::Move)
                on:pointerup=move |ev| on_pointer(ev, PointerKind::Up)
                on:pointercancel=move |ev| on_pointer(ev, PointerKind::Cancel)
            >
                <g class="links">{lines}</g>
                <g class="nodes">{circles}</g>
            </svg>
            <Tooltip state=tooltip />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::{GraphLink, NodeKey, Point, samples};

    #[test]
    fn test_unresolved_links_dropped() {
        let scene = GraphScene::new(samples::citation_graph(), GraphConfig::default()).unwrap();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.links().len(), 2);
        assert_eq!(scene.groups().to_vec(), vec!["Cited Works".to_string()]);

        let frame = scene.frame();
        assert_eq!(frame.circles.len(), 3);
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.circles[0].r, 20.0);
        assert_eq!(frame.circles[0].color, colors::category10(0));
    }

    #[test]
    fn test_empty_graph_rejected() {
        assert!(GraphScene::new(GraphData::default(), GraphConfig::default()).is_err());
    }

    #[test]
    fn test_linked_nodes_settle_near_distance() {
        let data = GraphData {
            nodes: (0..2)
                .map(|i| GraphNode {
                    id: NodeKey::Index(i),
                    group: format!("g{}", i),
                    radius: 0.5,
                    citing_patents_count: 0,
                })
                .collect(),
            links: vec![GraphLink {
                source: 0.into(),
                target: 1.into(),
                value: 1.0,
            }],
        };
        let scene = GraphScene::new(data, GraphConfig::default().with_charge(0.0)).unwrap();
        scene.simulation().borrow_mut().run_until_settled(1_000);

        let frame = scene.frame();
        let line = frame.lines[0];
        let length = ((line.x2 - line.x1).powi(2) + (line.y2 - line.y1).powi(2)).sqrt();
        // Spring rest length 30, shortened slightly by the centre pull
        assert!(length > 27.0 && length < 31.0, "link length {}", length);
        assert_ne!(frame.circles[0].color, frame.circles[1].color);
    }

    #[test]
    fn test_drag_moves_graph_node() {
        let mut scene = GraphScene::new(samples::citation_graph(), GraphConfig::default()).unwrap();
        let start = Point::new(scene.frame().circles[1].cx, scene.frame().circles[1].cy);
        assert_eq!(
            scene.pointer(&PointerEvent::new(3, PointerKind::Down, start).on(1)),
            DragOutcome::Started(1)
        );
        scene.pointer(&PointerEvent::new(3, PointerKind::Move, Point::new(50.0, 60.0)));
        scene.simulation().borrow_mut().step();
        let moved = scene.frame().circles[1].clone();
        assert_eq!((moved.cx, moved.cy), (50.0, 60.0));
        assert!(scene.tooltip_text(1).unwrap().starts_with("1 (Cited Works)"));
    }
}
