//! Word cloud dataset and layout I/O types

use crate::{VizError, VizResult};
use serde::{Deserialize, Serialize};

/// Input record: a word and how often it occurs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: f64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: f64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Word with its font size, handed to the layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedWord {
    pub text: String,
    pub size: f64,
    /// Rotation in degrees requested for this word
    pub rotate: f64,
}

/// Word positioned by the layout, relative to the canvas centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub rotate: f64,
}

impl PlacedWord {
    /// SVG transform for the word's text element
    pub fn transform(&self) -> String {
        format!("translate({}, {})rotate({})", self.x, self.y, self.rotate)
    }
}

/// Largest count in the dataset
pub fn max_count(dataset: &[WordCount]) -> VizResult<f64> {
    if dataset.is_empty() {
        return Err(VizError::invalid_dataset("word dataset is empty"));
    }
    let mut max = 0.0_f64;
    for word in dataset {
        if !word.count.is_finite() || word.count < 0.0 {
            return Err(VizError::invalid_dataset(format!(
                "word '{}' has an invalid count {}",
                word.word, word.count
            )));
        }
        max = max.max(word.count);
    }
    Ok(max)
}
