//! Forces applied once per tick.
//!
//! Every force adjusts node velocities in place; the simulation integrates
//! positions afterwards. Collision ignores alpha, every other force scales
//! with it.

use crate::node::SimNode;
use viz_core::Point;

/// Distance below which coincident nodes are nudged apart
const JIGGLE_SCALE: f64 = 1e-6;

// ============================================================================
// STRATEGY PATTERN: Force Trait
// ============================================================================

/// A rule contributing velocity changes each tick
pub trait Force<T> {
    /// Called whenever the simulation takes a new node set or a node's
    /// radius changes. Per-node parameters are cached here.
    fn initialize(&mut self, _nodes: &[SimNode<T>]) {}

    /// Adjust velocities for one tick
    fn apply(&mut self, nodes: &mut [SimNode<T>], alpha: f64);
}

// ============================================================================
// JIGGLE
// ============================================================================

/// Linear congruential source used to separate coincident nodes.
/// Deterministic so layouts are reproducible.
#[derive(Debug, Clone)]
pub struct Jiggle {
    state: u64,
}

impl Jiggle {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 4_294_967_296;

    pub fn new(seed: u64) -> Self {
        Self { state: seed % Self::M }
    }

    fn next_unit(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }

    /// Tiny non-zero offset
    pub fn next(&mut self) -> f64 {
        let offset = (self.next_unit() - 0.5) * JIGGLE_SCALE;
        if offset == 0.0 { JIGGLE_SCALE * 0.5 } else { offset }
    }
}

impl Default for Jiggle {
    fn default() -> Self {
        Self::new(1)
    }
}

// ============================================================================
// COLLISION
// ============================================================================

/// Pairwise overlap resolution between circles.
///
/// Node radius in pixels is `node.r * radius_scale`. Each iteration walks all
/// pairs using predicted positions (`p + v`) and pushes overlapping pairs
/// apart, splitting the correction by relative area.
#[derive(Debug, Clone)]
pub struct Collide {
    pub radius_scale: f64,
    pub strength: f64,
    pub iterations: usize,
    radii: Vec<f64>,
    jiggle: Jiggle,
}

impl Collide {
    pub fn new(radius_scale: f64) -> Self {
        Self {
            radius_scale,
            strength: 1.0,
            iterations: 1,
            radii: Vec::new(),
            jiggle: Jiggle::default(),
        }
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    fn radius_of<T>(&self, node: &SimNode<T>) -> f64 {
        let r = node.r * self.radius_scale;
        if r.is_finite() { r.max(0.0) } else { 0.0 }
    }
}

impl<T> Force<T> for Collide {
    fn initialize(&mut self, nodes: &[SimNode<T>]) {
        self.radii = nodes.iter().map(|n| self.radius_of(n)).collect();
    }

    fn apply(&mut self, nodes: &mut [SimNode<T>], _alpha: f64) {
        let n = nodes.len().min(self.radii.len());

        for _ in 0..self.iterations {
            for i in 0..n {
                let ri = self.radii[i];
                let ri2 = ri * ri;
                let xi = nodes[i].x + nodes[i].vx;
                let yi = nodes[i].y + nodes[i].vy;

                for j in (i + 1)..n {
                    let rj = self.radii[j];
                    let r = ri + rj;
                    if r <= 0.0 {
                        continue;
                    }

                    let mut x = xi - nodes[j].x - nodes[j].vx;
                    let mut y = yi - nodes[j].y - nodes[j].vy;
                    let mut l = x * x + y * y;
                    if l >= r * r {
                        continue;
                    }

                    if x == 0.0 {
                        x = self.jiggle.next();
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = self.jiggle.next();
                        l += y * y;
                    }

                    let distance = l.sqrt();
                    let k = (r - distance) / distance * self.strength;
                    x *= k;
                    y *= k;

                    let rj2 = rj * rj;
                    let share = rj2 / (ri2 + rj2);
                    nodes[i].vx += x * share;
                    nodes[i].vy += y * share;
                    nodes[j].vx -= x * (1.0 - share);
                    nodes[j].vy -= y * (1.0 - share);
                }
            }
        }
    }
}

// ============================================================================
// MANY-BODY
// ============================================================================

/// Pairwise charge between every two nodes, falling off with squared
/// distance. Positive strength pulls nodes together, negative pushes apart.
#[derive(Debug, Clone)]
pub struct ManyBody {
    pub strength: f64,
    pub distance_min: f64,
    pub distance_max: f64,
    jiggle: Jiggle,
}

impl ManyBody {
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            distance_min: 1.0,
            distance_max: f64::INFINITY,
            jiggle: Jiggle::new(7),
        }
    }

    pub fn distance_min(mut self, distance: f64) -> Self {
        self.distance_min = distance.max(f64::MIN_POSITIVE);
        self
    }

    pub fn distance_max(mut self, distance: f64) -> Self {
        self.distance_max = distance;
        self
    }
}

impl<T> Force<T> for ManyBody {
    fn apply(&mut self, nodes: &mut [SimNode<T>], alpha: f64) {
        let n = nodes.len();
        let min2 = self.distance_min * self.distance_min;
        let max2 = self.distance_max * self.distance_max;
        let w_base = self.strength * alpha;

        for i in 0..n {
            let (xi, yi) = (nodes[i].x, nodes[i].y);
            let mut dvx = 0.0;
            let mut dvy = 0.0;

            for (j, other) in nodes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let mut x = other.x - xi;
                let mut y = other.y - yi;
                let mut l = x * x + y * y;
                if l >= max2 {
                    continue;
                }

                if x == 0.0 {
                    x = self.jiggle.next();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle.next();
                    l += y * y;
                }
                if l < min2 {
                    l = (min2 * l).sqrt();
                }

                let w = w_base / l;
                dvx += x * w;
                dvy += y * w;
            }

            nodes[i].vx += dvx;
            nodes[i].vy += dvy;
        }
    }
}

// ============================================================================
// POSITIONAL PULL
// ============================================================================

/// Axis selector for the positional pull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Weak spring pulling every node toward a target coordinate on one axis
#[derive(Debug, Clone)]
pub struct Position {
    pub axis: Axis,
    pub target: f64,
    pub strength: f64,
}

impl Position {
    pub fn x(target: f64) -> Self {
        Self {
            axis: Axis::X,
            target,
            strength: 0.1,
        }
    }

    pub fn y(target: f64) -> Self {
        Self {
            axis: Axis::Y,
            target,
            strength: 0.1,
        }
    }

    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl<T> Force<T> for Position {
    fn apply(&mut self, nodes: &mut [SimNode<T>], alpha: f64) {
        let k = self.strength * alpha;
        for node in nodes.iter_mut() {
            match self.axis {
                Axis::X => node.vx += (self.target - node.x) * k,
                Axis::Y => node.vy += (self.target - node.y) * k,
            }
        }
    }
}

// ============================================================================
// LINKS
// ============================================================================

/// Springs along graph edges.
///
/// Per-link strength defaults to `1 / min(degree(source), degree(target))`
/// and the correction is split by `degree(source) / (degree(source) +
/// degree(target))` so hubs move less than leaves.
#[derive(Debug, Clone)]
pub struct Link {
    pub distance: f64,
    pub iterations: usize,
    /// Edges as given; re-filtered against every node set
    links: Vec<(usize, usize)>,
    active: Vec<(usize, usize)>,
    strengths: Vec<f64>,
    bias: Vec<f64>,
    jiggle: Jiggle,
}

impl Link {
    pub fn new(links: Vec<(usize, usize)>) -> Self {
        Self {
            distance: 30.0,
            iterations: 1,
            links,
            active: Vec::new(),
            strengths: Vec::new(),
            bias: Vec::new(),
            jiggle: Jiggle::new(13),
        }
    }

    pub fn distance(mut self, distance: f64) -> Self {
        self.distance = distance.max(0.0);
        self
    }

    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Edges that connect two distinct nodes of the current node set
    pub fn active_links(&self) -> &[(usize, usize)] {
        &self.active
    }
}

impl<T> Force<T> for Link {
    fn initialize(&mut self, nodes: &[SimNode<T>]) {
        let n = nodes.len();
        self.active = self
            .links
            .iter()
            .copied()
            .filter(|&(s, t)| s < n && t < n && s != t)
            .collect();
        if n > 0 && self.active.len() != self.links.len() {
            tracing::warn!(
                "Ignoring {} links with out-of-range or self-referencing endpoints",
                self.links.len() - self.active.len()
            );
        }

        let mut degree = vec![0usize; n];
        for &(s, t) in &self.active {
            degree[s] += 1;
            degree[t] += 1;
        }

        self.strengths = self
            .active
            .iter()
            .map(|&(s, t)| 1.0 / degree[s].min(degree[t]) as f64)
            .collect();
        self.bias = self
            .active
            .iter()
            .map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
            .collect();
    }

    fn apply(&mut self, nodes: &mut [SimNode<T>], alpha: f64) {
        for _ in 0..self.iterations {
            for (k, &(s, t)) in self.active.iter().enumerate() {
                let mut x = nodes[t].x + nodes[t].vx - nodes[s].x - nodes[s].vx;
                let mut y = nodes[t].y + nodes[t].vy - nodes[s].y - nodes[s].vy;
                if x == 0.0 {
                    x = self.jiggle.next();
                }
                if y == 0.0 {
                    y = self.jiggle.next();
                }

                let distance = (x * x + y * y).sqrt();
                let l = (distance - self.distance) / distance * alpha * self.strengths[k];
                x *= l;
                y *= l;

                let b = self.bias[k];
                nodes[t].vx -= x * b;
                nodes[t].vy -= y * b;
                nodes[s].vx += x * (1.0 - b);
                nodes[s].vy += y * (1.0 - b);
            }
        }
    }
}

// ============================================================================
// CENTERING
// ============================================================================

/// Translate the whole node set so its centroid sits on `center`.
/// Applied once when a simulation starts, not every tick.
pub fn center_nodes<T>(nodes: &mut [SimNode<T>], center: Point) {
    if nodes.is_empty() {
        return;
    }

    let n = nodes.len() as f64;
    let (sx, sy) = nodes
        .iter()
        .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
    let dx = sx / n - center.x;
    let dy = sy / n - center.y;
    if !dx.is_finite() || !dy.is_finite() {
        return;
    }

    for node in nodes.iter_mut() {
        node.x -= dx;
        node.y -= dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64, r: f64) -> SimNode {
        SimNode::new((), r).at(x, y)
    }

    #[test]
    fn test_collide_separates_overlap() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(5.0, 0.0, 1.0)];
        let mut collide = Collide::new(10.0).iterations(1);
        Force::<()>::initialize(&mut collide, &nodes);
        collide.apply(&mut nodes, 1.0);

        // 20px of radius, 5px apart: 15px overlap split evenly
        assert!((nodes[0].vx + 7.5).abs() < 1e-9);
        assert!((nodes[1].vx - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_collide_ignores_separated() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(25.0, 0.0, 1.0)];
        let mut collide = Collide::new(10.0);
        Force::<()>::initialize(&mut collide, &nodes);
        collide.apply(&mut nodes, 1.0);
        assert_eq!((nodes[0].vx, nodes[1].vx), (0.0, 0.0));
    }

    #[test]
    fn test_collide_splits_by_area() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 0.0, 3.0)];
        let mut collide = Collide::new(10.0);
        Force::<()>::initialize(&mut collide, &nodes);
        collide.apply(&mut nodes, 1.0);
        // the small node moves more than the big one
        assert!(nodes[0].vx.abs() > nodes[1].vx.abs());
    }

    #[test]
    fn test_collide_coincident_stays_finite() {
        let mut nodes = vec![node(3.0, 3.0, 1.0), node(3.0, 3.0, 1.0)];
        let mut collide = Collide::new(10.0).iterations(5);
        Force::<()>::initialize(&mut collide, &nodes);
        collide.apply(&mut nodes, 1.0);
        assert!(nodes.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
        assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
    }

    #[test]
    fn test_collide_zero_radius() {
        let mut nodes = vec![node(0.0, 0.0, 0.0), node(0.0, 0.0, 0.0)];
        let mut collide = Collide::new(10.0);
        Force::<()>::initialize(&mut collide, &nodes);
        collide.apply(&mut nodes, 1.0);
        assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
    }

    #[test]
    fn test_many_body_sign() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 0.0, 1.0)];
        ManyBody::new(5.0).apply(&mut nodes, 1.0);
        // positive strength attracts: 10 * 5 / 100
        assert!((nodes[0].vx - 0.5).abs() < 1e-12);
        assert!((nodes[1].vx + 0.5).abs() < 1e-12);

        let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 0.0, 1.0)];
        ManyBody::new(-30.0).apply(&mut nodes, 1.0);
        assert!(nodes[0].vx < 0.0);
    }

    #[test]
    fn test_many_body_coincident_guard() {
        let mut nodes = vec![node(1.0, 1.0, 1.0), node(1.0, 1.0, 1.0)];
        ManyBody::new(5.0).apply(&mut nodes, 1.0);
        assert!(nodes.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
    }

    #[test]
    fn test_position_pull() {
        let mut nodes = vec![node(0.0, 100.0, 1.0)];
        Position::x(250.0).apply(&mut nodes, 0.5);
        Position::y(250.0).strength(0.2).apply(&mut nodes, 0.5);
        assert!((nodes[0].vx - 12.5).abs() < 1e-12);
        assert!((nodes[0].vy - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_link_pulls_toward_distance() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(100.0, 0.0, 1.0)];
        let mut link = Link::new(vec![(0, 1)]);
        Force::<()>::initialize(&mut link, &nodes);
        link.apply(&mut nodes, 1.0);
        assert!(nodes[0].vx > 0.0);
        assert!(nodes[1].vx < 0.0);
    }

    #[test]
    fn test_link_drops_invalid() {
        let nodes = vec![node(0.0, 0.0, 1.0), node(1.0, 0.0, 1.0)];
        let mut link = Link::new(vec![(0, 1), (0, 5), (1, 1)]);
        Force::<()>::initialize(&mut link, &nodes);
        assert_eq!(link.active_links(), &[(0, 1)]);
        assert_eq!(link.links().len(), 3);
    }

    #[test]
    fn test_link_survives_empty_initialize() {
        let mut link = Link::new(vec![(0, 1)]);
        Force::<()>::initialize(&mut link, &[]);
        assert!(link.active_links().is_empty());

        let nodes = vec![node(0.0, 0.0, 1.0), node(100.0, 0.0, 1.0)];
        Force::<()>::initialize(&mut link, &nodes);
        assert_eq!(link.active_links(), &[(0, 1)]);
    }

    #[test]
    fn test_center_nodes() {
        let mut nodes = vec![node(0.0, 0.0, 1.0), node(10.0, 20.0, 1.0)];
        center_nodes(&mut nodes, Point::new(250.0, 250.0));
        assert_eq!(nodes[0].position(), Point::new(245.0, 240.0));
        assert_eq!(nodes[1].position(), Point::new(255.0, 260.0));
    }

    #[test]
    fn test_jiggle_is_small_and_nonzero() {
        let mut jiggle = Jiggle::default();
        for _ in 0..100 {
            let v = jiggle.next();
            assert!(v != 0.0 && v.abs() <= JIGGLE_SCALE);
        }
    }
}
