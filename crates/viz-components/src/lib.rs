//! # viz-components
//!
//! Draw triggers that bind a dataset to a mount point, and the gallery page
//! that exercises them.

pub mod draw;
pub mod gallery;

pub use draw::*;
pub use gallery::*;
