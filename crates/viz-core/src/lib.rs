//! # viz-core
//!
//! Core domain types for the chart kit: datasets, chart options, pointer
//! events and the shared error type.
//! Implements Strategy pattern for value formatting.

pub mod bubble;
pub mod error;
pub mod graph;
pub mod histogram;
pub mod line;
pub mod pointer;
pub mod samples;
pub mod word;

pub use bubble::*;
pub use error::*;
pub use graph::*;
pub use histogram::*;
pub use line::*;
pub use pointer::*;
pub use word::*;

use serde::{Deserialize, Serialize};

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for axis tick and tooltip values
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Plain decimal formatter: integers print without a fraction, other values
/// keep up to `max_decimals` digits with trailing zeros trimmed.
#[derive(Debug, Clone)]
pub struct DecimalFormatter {
    pub max_decimals: usize,
}

impl Default for DecimalFormatter {
    fn default() -> Self {
        Self { max_decimals: 2 }
    }
}

impl ValueFormatter for DecimalFormatter {
    fn format(&self, value: f64) -> String {
        if value.fract() == 0.0 {
            return format!("{:.0}", value);
        }
        let text = format!("{:.prec$}", value, prec = self.max_decimals);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// A point in chart-local (or page) pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

/// Chart kinds known to the kit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bubble,
    ForceGraph,
    Histogram,
    Line,
    WordCloud,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bubble => "Bubble Chart",
            Self::ForceGraph => "Force-Directed Graph",
            Self::Histogram => "Histogram",
            Self::Line => "Line Chart",
            Self::WordCloud => "Word Cloud",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Bubble => "bubble-chart",
            Self::ForceGraph => "force-graph",
            Self::Histogram => "histogram-area",
            Self::Line => "line-chart",
            Self::WordCloud => "word-cloud",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Bubble,
            Self::ForceGraph,
            Self::Histogram,
            Self::Line,
            Self::WordCloud,
        ]
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const BUBBLE: &str = "#4e79a7";
    pub const BUBBLE_HOVER: &str = "#f28e2b";
    pub const BAR_UP: &str = "#3b82f6";
    pub const BAR_DOWN: &str = "#ef4444";
    pub const LINE: &str = "#22c55e";
    pub const LINK: &str = "#999999";
    pub const AXIS: &str = "#555555";
    pub const ZERO_LINE: &str = "#888888";
    pub const TEXT_PRIMARY: &str = "#222222";
    pub const TEXT_MUTED: &str = "#666666";
    pub const TOOLTIP_BG: &str = "rgba(20, 20, 20, 0.85)";

    /// d3 `schemeCategory10`
    pub const CATEGORY10: [&str; 10] = [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ];

    pub fn category10(index: usize) -> &'static str {
        CATEGORY10[index % CATEGORY10.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_formatter() {
        let formatter = DecimalFormatter::default();
        assert_eq!(formatter.format(10.0), "10");
        assert_eq!(formatter.format(-5.0), "-5");
        assert_eq!(formatter.format(2.5), "2.5");
        assert_eq!(formatter.format(0.125), "0.13");
    }

    #[test]
    fn test_category10_wraps() {
        assert_eq!(colors::category10(0), "#1f77b4");
        assert_eq!(colors::category10(11), colors::category10(1));
    }

    #[test]
    fn test_canvas_center() {
        let canvas = CanvasSize::new(500.0, 250.0);
        assert_eq!(canvas.center(), Point::new(250.0, 125.0));
        assert_eq!(canvas.viewbox(), "0 0 500 250");
    }
}
