//! Pointer drag sessions.
//!
//! A drag pins the grabbed node under the pointer and keeps the simulation
//! warm until the last active drag ends. Each pointer drives at most one
//! session, and a node belongs to at most one session.

use std::collections::HashMap;

use crate::DRAG_REHEAT_ALPHA;
use crate::simulation::Simulation;
use viz_core::{Point, PointerEvent, PointerId, PointerKind};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    node: usize,
    /// Pointer position minus node position at grab time
    offset: Point,
}

/// What a pointer event did to the drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    Started(usize),
    Dragged(usize),
    Ended(usize),
}

#[derive(Debug, Default)]
pub struct DragController {
    sessions: HashMap<PointerId, DragSession>,
    reheat_alpha: Option<f64>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alpha target held while any drag is active
    pub fn with_reheat_alpha(mut self, alpha: f64) -> Self {
        self.reheat_alpha = Some(alpha);
        self
    }

    fn reheat_alpha(&self) -> f64 {
        self.reheat_alpha.unwrap_or(DRAG_REHEAT_ALPHA)
    }

    /// Route a pointer event. Down needs a target node; moves and releases
    /// only matter for pointers that own a session.
    pub fn handle<T>(&mut self, sim: &mut Simulation<T>, event: &PointerEvent) -> DragOutcome {
        match event.kind {
            PointerKind::Down => match event.target {
                Some(node) => self.start(sim, event.pointer_id, node, event.local),
                None => DragOutcome::Ignored,
            },
            PointerKind::Move => self.drag(sim, event.pointer_id, event.local),
            kind if kind.is_release() => self.end(sim, event.pointer_id),
            _ => DragOutcome::Ignored,
        }
    }

    pub fn start<T>(
        &mut self,
        sim: &mut Simulation<T>,
        pointer: PointerId,
        node: usize,
        at: Point,
    ) -> DragOutcome {
        if self.sessions.contains_key(&pointer) || self.is_dragging(node) {
            return DragOutcome::Ignored;
        }
        let Some(grabbed) = sim.node(node) else {
            return DragOutcome::Ignored;
        };
        if !at.is_finite() {
            return DragOutcome::Ignored;
        }

        let position = grabbed.position();
        let offset = at - position;
        if self.sessions.is_empty() {
            sim.restart(self.reheat_alpha());
        }
        sim.pin(node, position);
        self.sessions.insert(pointer, DragSession { node, offset });

        tracing::debug!("Drag started on node {} by pointer {}", node, pointer);
        DragOutcome::Started(node)
    }

    pub fn drag<T>(&mut self, sim: &mut Simulation<T>, pointer: PointerId, at: Point) -> DragOutcome {
        let Some(session) = self.sessions.get(&pointer) else {
            return DragOutcome::Ignored;
        };
        if !at.is_finite() {
            return DragOutcome::Ignored;
        }
        sim.pin(session.node, at - session.offset);
        DragOutcome::Dragged(session.node)
    }

    pub fn end<T>(&mut self, sim: &mut Simulation<T>, pointer: PointerId) -> DragOutcome {
        let Some(session) = self.sessions.remove(&pointer) else {
            return DragOutcome::Ignored;
        };
        sim.release(session.node);
        if self.sessions.is_empty() {
            sim.cool();
        }

        tracing::debug!("Drag ended on node {}", session.node);
        DragOutcome::Ended(session.node)
    }

    /// End every session, e.g. when the chart unmounts
    pub fn cancel_all<T>(&mut self, sim: &mut Simulation<T>) {
        let pointers: Vec<PointerId> = self.sessions.keys().copied().collect();
        for pointer in pointers {
            self.end(sim, pointer);
        }
    }

    pub fn is_dragging(&self, node: usize) -> bool {
        self.sessions.values().any(|s| s.node == node)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
