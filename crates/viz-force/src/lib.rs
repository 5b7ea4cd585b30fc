//! # viz-force
//!
//! Iterative force simulation for circular nodes.
//!
//! ## Modules
//!
//! - `node` - simulated node state (position, velocity, radius, pin)
//! - `forces` - collision, many-body charge, axis pull, links, centering
//! - `simulation` - alpha cooling and per-tick integration
//! - `drag` - pointer drag sessions that pin nodes and reheat the simulation
//! - `driver` - frame-clocked tick loop with a stop handle

pub mod drag;
pub mod driver;
pub mod forces;
pub mod node;
pub mod simulation;

pub use drag::*;
pub use driver::*;
pub use forces::*;
pub use node::*;
pub use simulation::*;

/// Alpha below which the simulation is considered settled
pub const DEFAULT_ALPHA_MIN: f64 = 0.001;

/// Ticks the default decay takes to cool from 1.0 to the floor
pub const DEFAULT_SETTLE_TICKS: f64 = 300.0;

/// Fraction of velocity removed every tick
pub const DEFAULT_VELOCITY_DECAY: f64 = 0.4;

/// Alpha target used while a node is being dragged
pub const DRAG_REHEAT_ALPHA: f64 = 0.3;

/// Per-tick decay that cools alpha from 1.0 to `alpha_min` in `ticks` ticks
pub fn alpha_decay_for(alpha_min: f64, ticks: f64) -> f64 {
    1.0 - alpha_min.powf(1.0 / ticks)
}
