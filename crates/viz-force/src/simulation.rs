//! Simulation: owns the node set, the named forces and the alpha schedule.

use crate::forces::{Force, center_nodes};
use crate::node::SimNode;
use crate::{DEFAULT_ALPHA_MIN, DEFAULT_SETTLE_TICKS, DEFAULT_VELOCITY_DECAY, alpha_decay_for};
use viz_core::Point;

/// Cooling and integration constants
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Floor below which the simulation pauses
    pub alpha_min: f64,
    /// Fraction of the gap to `alpha_target` closed every tick
    pub alpha_decay: f64,
    /// Fraction of velocity removed every tick
    pub velocity_decay: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_min: DEFAULT_ALPHA_MIN,
            alpha_decay: alpha_decay_for(DEFAULT_ALPHA_MIN, DEFAULT_SETTLE_TICKS),
            velocity_decay: DEFAULT_VELOCITY_DECAY,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha_min(mut self, alpha_min: f64) -> Self {
        self.alpha_min = alpha_min.clamp(0.0, 1.0);
        self
    }

    pub fn alpha_decay(mut self, alpha_decay: f64) -> Self {
        self.alpha_decay = alpha_decay.clamp(0.0, 1.0);
        self
    }

    /// Decay chosen so alpha reaches the floor after `ticks` ticks
    pub fn settle_in(mut self, ticks: f64) -> Self {
        self.alpha_decay = alpha_decay_for(self.alpha_min, ticks.max(1.0));
        self
    }

    pub fn velocity_decay(mut self, velocity_decay: f64) -> Self {
        self.velocity_decay = velocity_decay.clamp(0.0, 1.0);
        self
    }
}

/// Scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Ticks fire
    Running,
    /// Alpha reached the floor; resumes on `restart`
    Settled,
    /// Stopped explicitly (or never started)
    #[default]
    Stopped,
}

/// Emitted for every tick that ran
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Ticks run since the current node set was started
    pub tick: u64,
    /// Alpha the forces saw on this tick
    pub alpha: f64,
    /// The simulation settled on this tick
    pub settled: bool,
}

struct NamedForce<T> {
    name: String,
    force: Box<dyn Force<T>>,
}

/// Force simulation over one node set.
///
/// The simulation is the only writer of node positions. Outside code changes
/// nodes through `pin`, `release` and `set_radius`.
pub struct Simulation<T> {
    nodes: Vec<SimNode<T>>,
    forces: Vec<NamedForce<T>>,
    config: SimulationConfig,
    center: Option<Point>,
    alpha: f64,
    alpha_target: f64,
    state: RunState,
    ticks: u64,
}

impl<T> Simulation<T> {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            nodes: Vec::new(),
            forces: Vec::new(),
            config,
            center: None,
            alpha: 1.0,
            alpha_target: 0.0,
            state: RunState::Stopped,
            ticks: 0,
        }
    }

    /// Add (or replace) a named force
    pub fn with_force(mut self, name: impl Into<String>, force: impl Force<T> + 'static) -> Self {
        self.set_force(name, force);
        self
    }

    /// Centroid target applied once whenever a node set is started
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    pub fn set_force(&mut self, name: impl Into<String>, force: impl Force<T> + 'static) {
        let name = name.into();
        let mut force: Box<dyn Force<T>> = Box::new(force);
        force.initialize(&self.nodes);

        match self.forces.iter_mut().find(|f| f.name == name) {
            Some(slot) => slot.force = force,
            None => self.forces.push(NamedForce { name, force }),
        }
    }

    pub fn remove_force(&mut self, name: &str) -> bool {
        let before = self.forces.len();
        self.forces.retain(|f| f.name != name);
        self.forces.len() != before
    }

    pub fn force_names(&self) -> impl Iterator<Item = &str> {
        self.forces.iter().map(|f| f.name.as_str())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Take a node set, place unpositioned nodes, centre the set and start
    /// cooling from alpha 1.0.
    pub fn start(&mut self, nodes: Vec<SimNode<T>>) {
        self.nodes = nodes;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.initialize(i);
        }
        if let Some(center) = self.center {
            center_nodes(&mut self.nodes, center);
        }
        self.initialize_forces();

        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.ticks = 0;
        self.state = if self.nodes.is_empty() {
            RunState::Stopped
        } else {
            RunState::Running
        };
        tracing::debug!("Simulation started with {} nodes", self.nodes.len());
    }

    /// Raise alpha to at least `target_alpha`, hold it there and resume
    /// ticking. `cool` lets it decay again.
    pub fn restart(&mut self, target_alpha: f64) {
        let target = target_alpha.clamp(0.0, 1.0);
        self.alpha_target = target;
        self.alpha = self.alpha.max(target);
        self.resume();
    }

    /// Bump alpha to at least `alpha` without holding it, and resume
    pub fn reheat(&mut self, alpha: f64) {
        self.alpha = self.alpha.max(alpha.clamp(0.0, 1.0));
        self.resume();
    }

    /// Let alpha decay toward zero again
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    /// Stop ticking until the next `restart`, `reheat` or `start`
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            tracing::debug!("Simulation stopped at tick {}", self.ticks);
        }
        self.state = RunState::Stopped;
    }

    fn resume(&mut self) {
        if !self.nodes.is_empty() && self.state != RunState::Running {
            tracing::debug!("Simulation resumed at alpha {:.3}", self.alpha);
            self.state = RunState::Running;
        }
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Run one tick if the simulation is running. Pauses once alpha falls
    /// to the floor.
    pub fn step(&mut self) -> Option<TickInfo> {
        if self.state != RunState::Running {
            return None;
        }

        self.tick();

        let settled = self.alpha < self.config.alpha_min;
        if settled {
            self.alpha = self.config.alpha_min;
            self.state = RunState::Settled;
            tracing::debug!("Simulation settled after {} ticks", self.ticks);
        }

        Some(TickInfo {
            tick: self.ticks,
            alpha: self.alpha,
            settled,
        })
    }

    /// Advance one tick regardless of the run state
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        for named in self.forces.iter_mut() {
            named.force.apply(&mut self.nodes, self.alpha);
        }

        let retain = 1.0 - self.config.velocity_decay;
        for node in self.nodes.iter_mut() {
            node.integrate(retain);
        }
        self.ticks += 1;
    }

    /// Tick until settled or `max_ticks` ran; returns the ticks run
    pub fn run_until_settled(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && self.step().is_some() {
            ran += 1;
        }
        ran
    }

    // ========================================================================
    // Node updates
    // ========================================================================

    /// Fix a node at `at`; forces no longer move it
    pub fn pin(&mut self, index: usize, at: Point) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) if at.is_finite() => {
                node.pin(at);
                true
            }
            _ => false,
        }
    }

    /// Clear a node's fixed position so forces move it again
    pub fn release(&mut self, index: usize) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.release();
                true
            }
            None => false,
        }
    }

    /// Change a node's radius and re-derive every force's cached geometry
    pub fn set_radius(&mut self, index: usize, r: f64) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) if r.is_finite() && r >= 0.0 => {
                node.r = r;
                self.initialize_forces();
                true
            }
            _ => false,
        }
    }

    fn initialize_forces(&mut self) {
        for named in self.forces.iter_mut() {
            named.force.initialize(&self.nodes);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn nodes(&self) -> &[SimNode<T>] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode<T>> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn alpha_min(&self) -> f64 {
        self.config.alpha_min
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_settled(&self) -> bool {
        self.state == RunState::Settled
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<T> Default for Simulation<T> {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::{Collide, Position};

    fn started(n: usize) -> Simulation<usize> {
        let mut sim = Simulation::default()
            .with_center(Point::new(100.0, 100.0))
            .with_force("x", Position::x(100.0))
            .with_force("y", Position::y(100.0));
        sim.start((0..n).map(|i| SimNode::new(i, 1.0)).collect());
        sim
    }

    #[test]
    fn test_start_centres_nodes() {
        let sim = started(5);
        let n = sim.len() as f64;
        let cx: f64 = sim.nodes().iter().map(|node| node.x).sum::<f64>() / n;
        let cy: f64 = sim.nodes().iter().map(|node| node.y).sum::<f64>() / n;
        assert!((cx - 100.0).abs() < 1e-9);
        assert!((cy - 100.0).abs() < 1e-9);
        assert!(sim.is_running());
    }

    #[test]
    fn test_empty_start_does_not_run() {
        let mut sim: Simulation<()> = Simulation::default();
        sim.start(Vec::new());
        assert_eq!(sim.step(), None);
        sim.restart(0.3);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_alpha_decays_to_floor() {
        let mut sim = started(3);
        let mut last = sim.alpha();
        let mut ticks = 0;
        while let Some(info) = sim.step() {
            assert!(info.alpha < last || info.settled);
            last = info.alpha;
            ticks += 1;
        }
        assert!(sim.is_settled());
        assert_eq!(sim.alpha(), sim.alpha_min());
        assert!((295..=305).contains(&ticks));
        assert_eq!(sim.step(), None);
        assert_eq!(sim.alpha(), sim.alpha_min());
    }

    #[test]
    fn test_restart_holds_target() {
        let mut sim = started(3);
        sim.run_until_settled(1_000);
        sim.restart(0.3);
        let info = sim.step().unwrap();
        assert!(info.alpha >= 0.3);
        sim.cool();
        let next = sim.step().unwrap();
        assert!(next.alpha < info.alpha);
    }

    #[test]
    fn test_stop_and_reheat() {
        let mut sim = started(2);
        sim.stop();
        assert_eq!(sim.step(), None);
        sim.reheat(0.5);
        assert!(sim.step().is_some());
    }

    #[test]
    fn test_pin_and_release() {
        let mut sim = started(3);
        assert!(sim.pin(1, Point::new(10.0, 20.0)));
        for _ in 0..10 {
            sim.tick();
            assert_eq!(sim.node(1).unwrap().position(), Point::new(10.0, 20.0));
        }
        assert!(sim.release(1));
        assert!(!sim.node(1).unwrap().is_pinned());
        assert!(!sim.pin(9, Point::ORIGIN));
        assert!(!sim.pin(0, Point::new(f64::NAN, 0.0)));
    }

    #[test]
    fn test_set_radius_reinitializes() {
        let mut sim = started(2);
        sim.set_force("collide", Collide::new(10.0));
        assert!(sim.set_radius(0, 4.0));
        assert_eq!(sim.node(0).unwrap().r, 4.0);
        assert!(!sim.set_radius(0, -1.0));
    }

    #[test]
    fn test_replace_and_remove_force() {
        let mut sim = started(2);
        sim.set_force("x", Position::x(0.0));
        assert_eq!(sim.force_names().collect::<Vec<_>>(), vec!["x", "y"]);
        assert!(sim.remove_force("y"));
        assert!(!sim.remove_force("y"));
    }

    #[test]
    fn test_payload_untouched() {
        let mut sim = started(4);
        sim.run_until_settled(50);
        let payload: Vec<usize> = sim.nodes().iter().map(|n| n.data).collect();
        assert_eq!(payload, vec![0, 1, 2, 3]);
    }
}
