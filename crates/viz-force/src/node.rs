//! Simulated node

use viz_core::Point;

/// Radius of the first phyllotaxis ring used to place unpositioned nodes
const INITIAL_RADIUS: f64 = 10.0;

/// One simulated circle. `data` is carried through the simulation untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode<T = ()> {
    /// Position in the node set, assigned when the simulation takes the nodes
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Radius in dataset units; forces apply their own scale
    pub r: f64,
    /// Fixed x; when set the node is pinned on this axis
    pub fx: Option<f64>,
    /// Fixed y; when set the node is pinned on this axis
    pub fy: Option<f64>,
    pub data: T,
}

impl<T> SimNode<T> {
    /// Unplaced node; the simulation assigns a position on start
    pub fn new(data: T, r: f64) -> Self {
        Self {
            index: 0,
            x: f64::NAN,
            y: f64::NAN,
            vx: 0.0,
            vy: 0.0,
            r,
            fx: None,
            fy: None,
            data,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_position(self, position: Option<Point>) -> Self {
        match position {
            Some(p) => self.at(p.x, p.y),
            None => self,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_placed(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    pub fn fixed(&self) -> Option<Point> {
        self.fx.zip(self.fy).map(|(x, y)| Point::new(x, y))
    }

    pub(crate) fn pin(&mut self, at: Point) {
        self.fx = Some(at.x);
        self.fy = Some(at.y);
    }

    pub(crate) fn release(&mut self) {
        self.fx = None;
        self.fy = None;
    }

    /// Give the node its index and a usable starting state.
    /// Unplaced nodes go on a phyllotaxis spiral around the origin.
    pub(crate) fn initialize(&mut self, index: usize) {
        self.index = index;
        if let Some(fx) = self.fx {
            self.x = fx;
        }
        if let Some(fy) = self.fy {
            self.y = fy;
        }
        if !self.is_placed() {
            let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
            let angle = index as f64 * std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
            self.x = radius * angle.cos();
            self.y = radius * angle.sin();
        }
        if !self.vx.is_finite() || !self.vy.is_finite() {
            self.vx = 0.0;
            self.vy = 0.0;
        }
    }

    /// Apply velocity decay and move, or snap to the fixed position
    pub(crate) fn integrate(&mut self, velocity_retain: f64) {
        match self.fx {
            Some(fx) => {
                self.x = fx;
                self.vx = 0.0;
            }
            None => {
                self.vx *= velocity_retain;
                self.x += self.vx;
            }
        }
        match self.fy {
            Some(fy) => {
                self.y = fy;
                self.vy = 0.0;
            }
            None => {
                self.vy *= velocity_retain;
                self.y += self.vy;
            }
        }
    }
}
