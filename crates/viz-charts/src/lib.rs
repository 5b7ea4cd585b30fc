//! # viz-charts
//!
//! D3.js-style SVG charts built with Leptos: force-laid-out bubbles and
//! graphs, histograms, line charts and word clouds.
//!
//! ## Architecture
//!
//! Every chart is split in two:
//! - a pure *scene* or *layout* type that turns a dataset into positioned
//!   primitives (testable without a browser)
//! - a Leptos component that renders the scene and wires pointer events
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, easing
//! - `bubble` - Force-laid-out bubble chart with drag and click-to-resize
//! - `graph` - Force-directed graph with links
//! - `histogram` - Bar chart with negative values and a zero line
//! - `line` - Line chart over date labels
//! - `word_cloud` - Word cloud over an injected layout
//! - `tooltip` - Hover tooltip state
//! - `events` - Browser pointer event conversion
//! - `anim` - Entry animation clock

pub mod anim;
pub mod bubble;
pub mod chartkit;
pub mod events;
pub mod graph;
pub mod histogram;
pub mod line;
pub mod tooltip;
pub mod word_cloud;

pub use anim::*;
pub use bubble::*;
pub use chartkit::*;
pub use events::*;
pub use graph::*;
pub use histogram::*;
pub use line::*;
pub use tooltip::*;
pub use word_cloud::*;

// Re-export colors from viz-core for convenience
pub use viz_core::colors;

use viz_core::{CanvasSize, Point};

/// Chart padding, `[top, right, bottom, left]` order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    pub const fn from_sides(sides: [f64; 4]) -> Self {
        Self::new(sides[0], sides[1], sides[2], sides[3])
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::uniform(30.0)
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        self.canvas().center()
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        self.canvas().viewbox()
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(500.0, 500.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_area() {
        let dims = ChartDimensions::new(500.0, 250.0).with_margin(ChartMargin::from_sides([10.0, 20.0, 30.0, 40.0]));
        assert_eq!(dims.inner_width(), 440.0);
        assert_eq!(dims.inner_height(), 210.0);
        assert_eq!(dims.center(), Point::new(250.0, 125.0));
        assert_eq!(dims.viewbox(), "0 0 500 250");
    }
}
