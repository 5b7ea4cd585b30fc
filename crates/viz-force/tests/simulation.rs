//! End-to-end behaviour of the force simulation: settling, pinning,
//! reheating and loop teardown.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::executor::block_on;
use futures::future::ready;
use viz_core::{Point, PointerEvent, PointerKind};
use viz_force::{
    Collide, DragController, FrameClock, Link, ManyBody, Position, SimHandle, SimNode, Simulation,
    SimulationConfig, run_tick_loop,
};

const SCALE: f64 = 10.0;
const CENTER: Point = Point::new(250.0, 250.0);

fn bubble_simulation(radii: &[f64]) -> Simulation<usize> {
    let mut sim = Simulation::new(SimulationConfig::default())
        .with_center(CENTER)
        .with_force("collide", Collide::new(SCALE).iterations(50))
        .with_force("charge", ManyBody::new(5.0))
        .with_force("x", Position::x(CENTER.x))
        .with_force("y", Position::y(CENTER.y));
    sim.start(
        radii
            .iter()
            .enumerate()
            .map(|(i, r)| SimNode::new(i, *r))
            .collect(),
    );
    sim
}

fn non_overlapping_ratio(sim: &Simulation<usize>) -> f64 {
    let nodes = sim.nodes();
    let mut pairs = 0;
    let mut clear = 0;
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = &nodes[i];
            let b = &nodes[j];
            let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
            pairs += 1;
            if dist >= (a.r + b.r) * SCALE - 0.5 {
                clear += 1;
            }
        }
    }
    clear as f64 / pairs as f64
}

#[test]
fn test_collision_converges() {
    let mut sim = bubble_simulation(&[5.0, 3.0, 4.0, 6.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0]);
    sim.run_until_settled(10_000);

    assert!(sim.is_settled());
    assert!(non_overlapping_ratio(&sim) >= 0.95);
    assert!(sim.nodes().iter().all(|n| n.is_placed()));
}

#[test]
fn test_coincident_and_zero_radius_nodes_stay_finite() {
    let mut sim = Simulation::new(SimulationConfig::default())
        .with_force("collide", Collide::new(SCALE))
        .with_force("charge", ManyBody::new(5.0));
    sim.start(vec![
        SimNode::new(0, 0.0).at(10.0, 10.0),
        SimNode::new(1, 0.0).at(10.0, 10.0),
        SimNode::new(2, 2.0).at(10.0, 10.0),
        SimNode::new(3, 2.0).at(10.0, 10.0),
    ]);
    sim.run_until_settled(500);

    for node in sim.nodes() {
        assert!(node.x.is_finite() && node.y.is_finite());
        assert!(node.vx.is_finite() && node.vy.is_finite());
    }
}

#[test]
fn test_link_spring_registered_before_start() {
    let mut sim = Simulation::new(SimulationConfig::default())
        .with_force("link", Link::new(vec![(0, 1)]).distance(30.0));
    sim.start(vec![SimNode::new(0, 1.0).at(0.0, 0.0), SimNode::new(1, 1.0).at(200.0, 0.0)]);
    sim.run_until_settled(10_000);

    let (a, b) = (sim.node(0).unwrap(), sim.node(1).unwrap());
    let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    assert!((distance - 30.0).abs() < 1.0, "distance {}", distance);
}

#[test]
fn test_pinned_node_holds_every_tick() {
    let mut sim = bubble_simulation(&[3.0, 3.0, 3.0, 3.0]);
    let fixed = Point::new(40.0, 60.0);
    sim.pin(2, fixed);

    while sim.step().is_some() {
        assert_eq!(sim.node(2).unwrap().position(), fixed);
    }
}

#[test]
fn test_alpha_monotonic_then_floor() {
    let mut sim = bubble_simulation(&[1.0, 2.0, 3.0]);
    let mut previous = sim.alpha();
    while let Some(info) = sim.step() {
        assert!(info.alpha <= previous);
        previous = info.alpha;
    }
    for _ in 0..5 {
        assert_eq!(sim.step(), None);
        assert_eq!(sim.alpha(), sim.alpha_min());
    }
}

#[test]
fn test_drag_reheats_settled_simulation() {
    let mut sim = bubble_simulation(&[2.0, 2.0, 2.0]);
    sim.run_until_settled(10_000);
    let mut drag = DragController::new();

    let at = sim.node(0).unwrap().position();
    drag.handle(&mut sim, &PointerEvent::new(1, PointerKind::Down, at).on(0));
    let info = sim.step().expect("drag resumes ticking");
    assert!(info.alpha >= 0.3);

    let target = Point::new(400.0, 120.0);
    drag.handle(&mut sim, &PointerEvent::new(1, PointerKind::Move, target));
    for _ in 0..20 {
        sim.step();
        assert_eq!(sim.node(0).unwrap().position(), target);
    }

    drag.handle(&mut sim, &PointerEvent::new(1, PointerKind::Up, target));
    assert!(sim.run_until_settled(10_000) > 0);
    assert!(sim.is_settled());
}

struct StopAfter {
    frames: usize,
    handle: SimHandle,
}

impl FrameClock for StopAfter {
    fn next_frame(&mut self, _idle: bool) -> impl Future<Output = ()> {
        if self.frames == 0 {
            self.handle.stop();
        } else {
            self.frames -= 1;
        }
        ready(())
    }
}

#[test]
fn test_teardown_stops_callbacks() {
    let sim = Rc::new(RefCell::new(bubble_simulation(&[1.0, 2.0])));
    let handle = SimHandle::new();
    let clock = StopAfter {
        frames: 3,
        handle: handle.clone(),
    };
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();

    block_on(run_tick_loop(sim.clone(), handle.clone(), clock, move |_, _| {
        *counter.borrow_mut() += 1
    }));

    assert!(handle.is_stopped());
    assert_eq!(*calls.borrow(), 3);
    assert_eq!(sim.borrow().ticks(), 3);
}
