//! Line chart dataset

use crate::{VizResult, finite_extent};
use serde::{Deserialize, Serialize};

/// One sample of the line chart, keyed by a date label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub date: String,
    pub value: f64,
}

impl LinePoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Value extent of a line dataset
pub fn value_extent(dataset: &[LinePoint]) -> VizResult<(f64, f64)> {
    finite_extent(dataset.iter().map(|p| p.value), "line dataset")
}
