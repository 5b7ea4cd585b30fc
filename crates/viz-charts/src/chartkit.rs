//! # chartkit
//!
//! Core chart primitives: scales, path builders, easing and transitions.
//! Implements Strategy pattern for scale and path behaviour.

use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for continuous scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;

    /// Generate tick values
    fn ticks(&self, count: usize) -> Vec<f64>;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range_bounds(&self) -> (f64, f64) {
        self.range
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let mut normalized = (value - d_min) / (d_max - d_min);

        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }

        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }

    /// "Nice" tick values (multiples of 1, 2 or 5 times a power of ten)
    /// inside the domain
    fn ticks(&self, count: usize) -> Vec<f64> {
        let (a, b) = self.domain;
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let span = max - min;

        if span == 0.0 || count == 0 || !span.is_finite() {
            return vec![min];
        }

        let rough_step = span / count as f64;
        let magnitude = 10.0_f64.powf(rough_step.log10().floor());
        let residual = rough_step / magnitude;

        let nice_step = if residual <= 1.0 {
            magnitude
        } else if residual <= 2.0 {
            2.0 * magnitude
        } else if residual <= 5.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        let first = (min / nice_step).ceil() as i64;
        let last = (max / nice_step).floor() as i64;
        (first..=last).map(|k| k as f64 * nice_step).collect()
    }
}

// ============================================================================
// BAND SCALE (categorical x axis)
// ============================================================================

/// Band scale over an ordered list of labels (d3 `scaleBand`)
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
}

impl BandScale {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        Self {
            labels: unique,
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Same inner and outer padding
    pub fn padding(mut self, padding: f64) -> Self {
        let p = padding.clamp(0.0, 1.0);
        self.padding_inner = p;
        self.padding_outer = p;
        self
    }

    pub fn padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    pub fn padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Round step and band start to whole pixels
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(start, step, bandwidth)`
    fn layout(&self) -> (f64, f64, f64) {
        let n = self.labels.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };

        let mut step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut first = start + (stop - start - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            first = first.round();
            bandwidth = bandwidth.round();
        }

        if reverse {
            // Bands run from the top of the range downward
            (first + step * (n - 1.0), -step, bandwidth)
        } else {
            (first, step, bandwidth)
        }
    }

    pub fn bandwidth(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.layout().2
    }

    pub fn step(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.layout().1.abs()
    }

    /// Band start for the nth label
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.labels.len() {
            return None;
        }
        let (first, step, _) = self.layout();
        Some(first + step * index as f64)
    }

    /// Band start for a label
    pub fn scale(&self, label: &str) -> Option<f64> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.position(index)
    }

    /// Band centre for the nth label
    pub fn center(&self, index: usize) -> Option<f64> {
        self.position(index).map(|x| x + self.bandwidth() / 2.0)
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;
}

/// Straight segments through every point
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some((&(x, y), rest)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::new().move_to(x, y);
        for &(x, y) in rest {
            builder = builder.line_to(x, y);
        }
        builder.build()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn horizontal_to(mut self, x: f64) -> Self {
        let _ = write!(self.commands, "H{:.2}", x);
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        let _ = write!(self.commands, "V{:.2}", y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    LinePath.generate(points)
}

/// Axis domain path with outer ticks, as d3 draws it for a left axis
pub fn left_axis_domain(x: f64, y0: f64, y1: f64, tick_size: f64) -> String {
    PathBuilder::new()
        .move_to(x - tick_size, y0)
        .horizontal_to(x)
        .vertical_to(y1)
        .horizontal_to(x - tick_size)
        .build()
}

/// Axis domain path with outer ticks, as d3 draws it for a bottom axis
pub fn bottom_axis_domain(y: f64, x0: f64, x1: f64, tick_size: f64) -> String {
    PathBuilder::new()
        .move_to(x0, y + tick_size)
        .vertical_to(y)
        .horizontal_to(x1)
        .vertical_to(y + tick_size)
        .build()
}

// ============================================================================
// AXES
// ============================================================================

/// Axis tick length
pub const TICK_SIZE: f64 = 6.0;

/// Gap between a tick and its label
pub const TICK_PADDING: f64 = 3.0;

/// Approximate advance of one tick label glyph at the axis font size
pub const LABEL_CHAR_WIDTH: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Pixel position along the axis
    pub position: f64,
    pub text: String,
}

/// Width of a left axis: longest tick label plus tick and gap
pub fn estimate_axis_width(ticks: &[AxisTick]) -> f64 {
    let chars = ticks.iter().map(|t| t.text.chars().count()).max().unwrap_or(1);
    chars as f64 * LABEL_CHAR_WIDTH + TICK_SIZE + TICK_PADDING
}

// ============================================================================
// EASING + TRANSITIONS
// ============================================================================

/// Entry-animation easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// d3 `easeExpInOut`
    #[default]
    ExpInOut,
    /// d3 `easeSinInOut`
    SinInOut,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::ExpInOut => {
                let tpmt = |x: f64| (2.0_f64.powf(-10.0 * x) - 0.0009765625) * 1.0009775171065494;
                let t = t * 2.0;
                if t <= 1.0 {
                    tpmt(1.0 - t) / 2.0
                } else {
                    (2.0 - tpmt(t - 1.0)) / 2.0
                }
            }
            Self::SinInOut => (1.0 - (std::f64::consts::PI * t).cos()) / 2.0,
        }
    }
}

/// Staggered entry transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration_ms: f64,
    /// Extra delay per element index
    pub stagger_ms: f64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            stagger_ms: 0.0,
            easing: Easing::default(),
        }
    }

    pub fn stagger(mut self, stagger_ms: f64) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(&self, index: usize) -> f64 {
        self.stagger_ms * index as f64
    }

    /// Eased progress in `[0, 1]` of element `index` at `elapsed_ms`
    pub fn progress(&self, index: usize, elapsed_ms: f64) -> f64 {
        let local = elapsed_ms - self.delay(index);
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration_ms <= 0.0 || local >= self.duration_ms {
            return 1.0;
        }
        self.easing.apply(local / self.duration_ms)
    }

    /// Time until every one of `count` elements has finished
    pub fn total_ms(&self, count: usize) -> f64 {
        self.delay(count.saturating_sub(1)) + self.duration_ms
    }
}

/// Linear interpolation
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
        assert_eq!(scale.invert(250.0), 50.0);
    }

    #[test]
    fn test_inverted_range() {
        let scale = LinearScale::new().domain(-5.0, 10.0).range(270.0, 30.0);
        assert_eq!(scale.scale(10.0), 30.0);
        assert_eq!(scale.scale(-5.0), 270.0);
        assert_eq!(scale.scale(0.0), 190.0);
    }

    #[test]
    fn test_nice_ticks() {
        let scale = LinearScale::new().domain(-5.0, 12.0);
        assert_eq!(scale.ticks(10), vec![-4.0, -2.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

        let flat = LinearScale::new().domain(70.0, 70.0);
        assert_eq!(flat.ticks(10), vec![70.0]);
    }

    #[test]
    fn test_band_scale_rounded() {
        let labels = ["a", "b", "c", "d", "e", "f"];
        let scale = BandScale::new(labels).range(30.0, 270.0).padding(0.2).round(true);

        assert_eq!(scale.step(), 38.0);
        assert_eq!(scale.bandwidth(), 30.0);
        assert_eq!(scale.position(0), Some(40.0));
        assert_eq!(scale.scale("b"), Some(78.0));
        assert_eq!(scale.scale("z"), None);
        assert_eq!(scale.center(0), Some(55.0));
    }

    #[test]
    fn test_band_scale_dedups_labels() {
        let scale = BandScale::new(["x", "y", "x"]).range(0.0, 100.0);
        assert_eq!(scale.len(), 2);
        assert_eq!(scale.bandwidth(), 50.0);
        assert_eq!(scale.position(1), Some(50.0));
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert_eq!(path, "M0.00,0.00L100.00,100.00Z");
        assert_eq!(line_path(&[]), "");
    }

    #[test]
    fn test_line_path_generator() {
        let path = LinePath.generate(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);
        assert_eq!(path, "M0.00,0.00L50.00,50.00L100.00,0.00");
    }

    #[test]
    fn test_axis_width_estimate() {
        let ticks = vec![
            AxisTick { position: 0.0, text: "0".into() },
            AxisTick { position: 10.0, text: "-20".into() },
        ];
        assert_eq!(estimate_axis_width(&ticks), 27.0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::ExpInOut, Easing::SinInOut] {
            assert!(easing.apply(0.0).abs() < 1e-9);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9);
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_staggered_transition() {
        let transition = Transition::new(700.0).stagger(100.0);
        assert_eq!(transition.progress(2, 150.0), 0.0);
        assert_eq!(transition.progress(0, 700.0), 1.0);
        assert!(transition.progress(1, 400.0) > 0.0);
        assert_eq!(transition.total_ms(6), 1200.0);
    }
}
