//! Error type shared by every chart routine

/// Result alias used across the chart kit
pub type VizResult<T> = Result<T, VizError>;

/// Errors raised while binding a dataset or mounting a chart
#[derive(Debug, Clone, PartialEq)]
pub enum VizError {
    /// Dataset is empty or carries values no scale can map
    InvalidDataset(String),
    /// Chart options cannot be resolved
    InvalidOption(String),
    /// Mount point selector resolved to nothing
    MountNotFound(String),
    /// Mount point already holds a scene and the draw policy rejects redraws
    AlreadyMounted(String),
}

impl VizError {
    pub fn invalid_dataset(msg: impl Into<String>) -> Self {
        Self::InvalidDataset(msg.into())
    }

    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }
}

impl std::fmt::Display for VizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VizError::InvalidDataset(msg) => write!(f, "Invalid dataset: {}", msg),
            VizError::InvalidOption(msg) => write!(f, "Invalid option: {}", msg),
            VizError::MountNotFound(selector) => {
                write!(f, "Mount point not found: {}", selector)
            }
            VizError::AlreadyMounted(selector) => {
                write!(f, "Mount point already holds a chart: {}", selector)
            }
        }
    }
}

impl std::error::Error for VizError {}

/// Min/max of a sequence of values, failing on empty or non-finite input
pub fn finite_extent(values: impl IntoIterator<Item = f64>, what: &str) -> VizResult<(f64, f64)> {
    let mut extent: Option<(f64, f64)> = None;
    for value in values {
        if !value.is_finite() {
            return Err(VizError::invalid_dataset(format!(
                "{} contains a non-finite value",
                what
            )));
        }
        extent = Some(match extent {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }
    extent.ok_or_else(|| VizError::invalid_dataset(format!("{} is empty", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent() {
        assert_eq!(finite_extent([3.0, -1.0, 7.0], "volumes"), Ok((-1.0, 7.0)));
    }

    #[test]
    fn test_extent_empty() {
        let result = finite_extent(std::iter::empty(), "volumes");
        assert!(matches!(result, Err(VizError::InvalidDataset(_))));
    }

    #[test]
    fn test_extent_nan() {
        let result = finite_extent([1.0, f64::NAN], "values");
        assert!(matches!(result, Err(VizError::InvalidDataset(_))));
    }

    #[test]
    fn test_display() {
        let err = VizError::MountNotFound("#chart".to_string());
        assert_eq!(err.to_string(), "Mount point not found: #chart");
    }
}
