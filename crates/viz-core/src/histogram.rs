//! Histogram dataset and options

use crate::{VizError, VizResult, finite_extent};
use serde::{Deserialize, Serialize};

/// Padding applied on every side when none (or an unusable shape) is given
pub const DEFAULT_PADDING: f64 = 30.0;
pub const DEFAULT_WIDTH: f64 = 300.0;
pub const DEFAULT_HEIGHT: f64 = 300.0;
pub const DEFAULT_MAX_BAR_WIDTH: f64 = 30.0;

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramDatum {
    pub label: String,
    pub volume: f64,
}

impl HistogramDatum {
    pub fn new(label: impl Into<String>, volume: f64) -> Self {
        Self {
            label: label.into(),
            volume,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.volume < 0.0
    }
}

/// Volume extent of a histogram dataset
pub fn volume_extent(dataset: &[HistogramDatum]) -> VizResult<(f64, f64)> {
    finite_extent(dataset.iter().map(|d| d.volume), "histogram dataset")
}

// ============================================================================
// PADDING
// ============================================================================

/// Padding as a scalar or a 1-4 element sequence (CSS margin shorthand)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Uniform(f64),
    Sides(Vec<f64>),
}

impl From<f64> for Padding {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<Vec<f64>> for Padding {
    fn from(values: Vec<f64>) -> Self {
        Self::Sides(values)
    }
}

impl<const N: usize> From<[f64; N]> for Padding {
    fn from(values: [f64; N]) -> Self {
        Self::Sides(values.to_vec())
    }
}

/// Expand padding into `[top, right, bottom, left]`.
///
/// Three values map to `[top, right, bottom, 0]`: the left side is zeroed
/// rather than mirrored from the right.
pub fn get_padding(padding: &Padding) -> [f64; 4] {
    match padding {
        Padding::Uniform(v) => [*v, *v, *v, *v],
        Padding::Sides(sides) => match sides.as_slice() {
            [a] => [*a, *a, *a, *a],
            [a, b] => [*a, *b, *a, *b],
            [a, b, c] => [*a, *b, *c, 0.0],
            [a, b, c, d] => [*a, *b, *c, *d],
            _ => [DEFAULT_PADDING; 4],
        },
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Rotation applied to the x-axis tick labels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelRotate {
    #[serde(default)]
    pub rotate: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Histogram options, shaped like the JSON option object callers pass in.
/// Every field is optional; `resolve` fills the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramOptions {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub padding: Option<Padding>,
    #[serde(default)]
    pub max_bar_width: Option<f64>,
    #[serde(default, rename = "notTooltip")]
    pub not_tooltip: bool,
    #[serde(default)]
    pub label_rotate: Option<LabelRotate>,
    #[serde(default, rename = "y_axsis_label")]
    pub y_axis_label: Option<String>,
    #[serde(default)]
    pub y_ticks: Option<usize>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "className")]
    pub class_name: Option<String>,
}

impl HistogramOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn max_bar_width(mut self, width: f64) -> Self {
        self.max_bar_width = Some(width);
        self
    }

    pub fn without_tooltip(mut self) -> Self {
        self.not_tooltip = true;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn y_axis_label(mut self, label: impl Into<String>) -> Self {
        self.y_axis_label = Some(label.into());
        self
    }

    pub fn y_ticks(mut self, ticks: usize) -> Self {
        self.y_ticks = Some(ticks);
        self
    }

    pub fn label_rotate(mut self, rotate: f64, x: f64, y: f64) -> Self {
        self.label_rotate = Some(LabelRotate { rotate, x, y });
        self
    }

    /// Parse the option object from JSON
    pub fn from_json(json: &str) -> VizResult<Self> {
        serde_json::from_str(json).map_err(|e| VizError::invalid_option(e.to_string()))
    }

    /// Apply defaults. A zero width, height or bar width counts as unset.
    pub fn resolve(&self) -> VizResult<HistogramSettings> {
        let non_zero = |v: Option<f64>, default: f64| v.filter(|v| *v != 0.0).unwrap_or(default);

        let width = non_zero(self.width, DEFAULT_WIDTH);
        let height = non_zero(self.height, DEFAULT_HEIGHT);
        let max_bar_width = non_zero(self.max_bar_width, DEFAULT_MAX_BAR_WIDTH);
        let padding = self
            .padding
            .as_ref()
            .map(get_padding)
            .unwrap_or([DEFAULT_PADDING; 4]);

        for (name, value) in [
            ("width", width),
            ("height", height),
            ("max_bar_width", max_bar_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(VizError::invalid_option(format!("{} = {}", name, value)));
            }
        }
        if padding.iter().any(|p| !p.is_finite()) {
            return Err(VizError::invalid_option("padding must be finite"));
        }

        Ok(HistogramSettings {
            width,
            height,
            padding,
            max_bar_width,
            show_tooltip: !self.not_tooltip,
            label_rotate: self.label_rotate.unwrap_or_default(),
            y_axis_label: self.y_axis_label.clone().filter(|l| !l.is_empty()),
            y_ticks: self.y_ticks.filter(|t| *t > 0),
            title: self.title.clone().filter(|t| !t.is_empty()),
            class_name: self.class_name.clone(),
        })
    }
}

/// Histogram options with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSettings {
    pub width: f64,
    pub height: f64,
    /// `[top, right, bottom, left]`
    pub padding: [f64; 4],
    pub max_bar_width: f64,
    pub show_tooltip: bool,
    pub label_rotate: LabelRotate,
    pub y_axis_label: Option<String>,
    pub y_ticks: Option<usize>,
    pub title: Option<String>,
    pub class_name: Option<String>,
}

impl HistogramSettings {
    pub fn padding_top(&self) -> f64 {
        self.padding[0]
    }

    pub fn padding_right(&self) -> f64 {
        self.padding[1]
    }

    pub fn padding_bottom(&self) -> f64 {
        self.padding[2]
    }

    pub fn padding_left(&self) -> f64 {
        self.padding[3]
    }
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: [DEFAULT_PADDING; 4],
            max_bar_width: DEFAULT_MAX_BAR_WIDTH,
            show_tooltip: true,
            label_rotate: LabelRotate::default(),
            y_axis_label: None,
            y_ticks: None,
            title: None,
            class_name: None,
        }
    }
}
