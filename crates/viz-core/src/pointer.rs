//! Typed pointer events shared by drag handling and the tooltip overlay

use crate::Point;

/// Identifier of a pointer (mouse = one id, each touch its own)
pub type PointerId = i32;

/// Pointer event kinds the charts react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Move,
    Leave,
    Down,
    Up,
    Cancel,
}

impl PointerKind {
    /// Ends an active drag
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A pointer event with the element it fired on already resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub kind: PointerKind,
    /// Chart-local coordinates
    pub local: Point,
    /// Page coordinates (tooltip placement)
    pub page: Point,
    /// Index of the datum under the pointer, if any
    pub target: Option<usize>,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, kind: PointerKind, local: Point) -> Self {
        Self {
            pointer_id,
            kind,
            local,
            page: local,
            target: None,
        }
    }

    pub fn on(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_page(mut self, page: Point) -> Self {
        self.page = page;
        self
    }
}
