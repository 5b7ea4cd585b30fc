//! # viz-state
//!
//! Reactive gallery state plus the bookkeeping that ties drawn charts to
//! their mount points.

pub mod dom;
pub mod mount;

pub use dom::*;
pub use mount::*;

use leptos::prelude::*;
use viz_core::{ChartKind, VizResult};

// ============================================================================
// GALLERY STATE
// ============================================================================

/// Global gallery state with reactive signals
#[derive(Clone, Copy)]
pub struct GalleryState {
    /// Chart shown in the gallery
    pub selected: RwSignal<ChartKind>,
    /// Last draw error, if any
    pub error: RwSignal<Option<String>>,
    /// Successful draws since start
    pub draws: RwSignal<u32>,
}

impl GalleryState {
    pub fn new() -> Self {
        Self {
            selected: RwSignal::new(ChartKind::Bubble),
            error: RwSignal::new(None),
            draws: RwSignal::new(0),
        }
    }

    pub fn select(&self, kind: ChartKind) {
        self.selected.set(kind);
        self.error.set(None);
    }

    pub fn set_error(&self, msg: impl Into<String>) {
        self.error.set(Some(msg.into()));
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    pub fn has_error(&self) -> bool {
        self.error.get_untracked().is_some()
    }

    /// Record the outcome of a draw trigger
    pub fn record(&self, result: VizResult<()>) {
        match result {
            Ok(()) => {
                self.draws.update(|n| *n += 1);
                self.error.set(None);
            }
            Err(err) => {
                tracing::warn!("Draw failed: {}", err);
                self.set_error(err.to_string());
            }
        }
    }
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide gallery state to the component tree
pub fn provide_gallery_state() -> GalleryState {
    let state = GalleryState::new();
    provide_context(state);
    state
}

/// Use gallery state from context
pub fn use_gallery_state() -> GalleryState {
    expect_context::<GalleryState>()
}

/// Try to get gallery state from context (returns None if not provided)
pub fn try_use_gallery_state() -> Option<GalleryState> {
    use_context::<GalleryState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::VizError;

    #[test]
    fn test_record_draw_outcomes() {
        let state = GalleryState::new();
        state.record(Err(VizError::MountNotFound("#missing".into())));
        assert!(state.has_error());
        assert_eq!(
            state.error.get_untracked().as_deref(),
            Some("Mount point not found: #missing")
        );

        state.record(Ok(()));
        assert!(!state.has_error());
        assert_eq!(state.draws.get_untracked(), 1);
    }

    #[test]
    fn test_select_clears_error() {
        let state = GalleryState::new();
        state.set_error("boom");
        state.select(ChartKind::WordCloud);
        assert_eq!(state.selected.get_untracked(), ChartKind::WordCloud);
        assert!(!state.has_error());
    }
}
