//! Bubble chart dataset and radius cycling

use crate::{VizError, VizResult};
use serde::{Deserialize, Serialize};

/// Pixels per unit of dataset radius
pub const RADIUS_SCALE: f64 = 10.0;

/// Smallest radius in the click cycle
pub const MIN_RADIUS: f64 = 1.0;

/// Largest radius in the click cycle
pub const MAX_RADIUS: f64 = 6.0;

/// One bubble. `x`/`y` are optional and assigned by the simulation when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleDatum {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    pub r: f64,
    pub label: String,
}

impl BubbleDatum {
    pub fn new(label: impl Into<String>, r: f64) -> Self {
        Self {
            x: None,
            y: None,
            r,
            label: label.into(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Radius in pixels
    pub fn display_radius(&self) -> f64 {
        self.r * RADIUS_SCALE
    }

    /// Advance the radius one step through the click cycle
    pub fn cycle_radius(&mut self) -> f64 {
        self.r = next_radius(self.r);
        self.r
    }
}

/// Next radius in the 1 → 2 → … → 6 → 1 cycle
pub fn next_radius(r: f64) -> f64 {
    if !r.is_finite() || r >= MAX_RADIUS || r < MIN_RADIUS {
        MIN_RADIUS
    } else {
        (r + 1.0).min(MAX_RADIUS)
    }
}

/// Reject empty datasets and radii the layout cannot use
pub fn validate_bubbles(dataset: &[BubbleDatum]) -> VizResult<()> {
    if dataset.is_empty() {
        return Err(VizError::invalid_dataset("bubble dataset is empty"));
    }
    for datum in dataset {
        if !datum.r.is_finite() || datum.r < 0.0 {
            return Err(VizError::invalid_dataset(format!(
                "bubble '{}' has an invalid radius {}",
                datum.label, datum.r
            )));
        }
        let coords_ok = datum.x.is_none_or(f64::is_finite) && datum.y.is_none_or(f64::is_finite);
        if !coords_ok {
            return Err(VizError::invalid_dataset(format!(
                "bubble '{}' has a non-finite position",
                datum.label
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_cycle() {
        assert_eq!(next_radius(5.0), 6.0);
        assert_eq!(next_radius(6.0), 1.0);
        assert_eq!(next_radius(3.0), 4.0);
        assert_eq!(next_radius(1.0), 2.0);
    }

    #[test]
    fn test_radius_cycle_out_of_range() {
        assert_eq!(next_radius(0.0), 1.0);
        assert_eq!(next_radius(9.0), 1.0);
        assert_eq!(next_radius(5.5), 6.0);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut datum = BubbleDatum::new("a", 1.0);
        for _ in 0..6 {
            datum.cycle_radius();
        }
        assert_eq!(datum.r, 1.0);
    }

    #[test]
    fn test_deserialize_without_position() {
        let datum: BubbleDatum = serde_json::from_str(r#"{"r": 3, "label": "js"}"#).unwrap();
        assert_eq!(datum.x, None);
        assert_eq!(datum.display_radius(), 30.0);
    }

    #[test]
    fn test_validate() {
        assert!(validate_bubbles(&[]).is_err());
        assert!(validate_bubbles(&[BubbleDatum::new("a", -1.0)]).is_err());
        assert!(validate_bubbles(&[BubbleDatum::new("a", 0.0)]).is_ok());
    }
}
