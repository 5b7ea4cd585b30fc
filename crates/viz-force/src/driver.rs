//! Frame-clocked tick loop.
//!
//! The loop advances a shared simulation once per frame and hands every tick
//! to a render callback. Dropping out of the loop is driven by a `SimHandle`
//! that the owning chart stops on teardown.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gloo_timers::future::TimeoutFuture;

use crate::simulation::{Simulation, TickInfo};

/// Frame interval used by `TimerClock::default` (about 60 fps)
pub const DEFAULT_FRAME_MS: u32 = 16;

/// Frame interval while the simulation is settled and only waiting to be
/// reheated
pub const IDLE_FRAME_MS: u32 = 100;

// ============================================================================
// STOP HANDLE
// ============================================================================

/// Cloneable stop flag shared between a chart and its tick loop
#[derive(Clone, Debug, Default)]
pub struct SimHandle {
    stopped: Arc<AtomicBool>,
}

impl SimHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        !self.is_stopped()
    }
}

// ============================================================================
// FRAME CLOCK (STRATEGY PATTERN)
// ============================================================================

/// Source of frame boundaries for the tick loop
pub trait FrameClock {
    /// Resolves when the next frame should run. `idle` is true while the
    /// simulation has nothing to do.
    fn next_frame(&mut self, idle: bool) -> impl Future<Output = ()>;
}

/// Browser timer clock
#[derive(Debug, Clone, Copy)]
pub struct TimerClock {
    pub frame_ms: u32,
    pub idle_ms: u32,
}

impl Default for TimerClock {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            idle_ms: IDLE_FRAME_MS,
        }
    }
}

impl TimerClock {
    pub fn new(frame_ms: u32) -> Self {
        Self {
            frame_ms,
            ..Self::default()
        }
    }
}

impl FrameClock for TimerClock {
    fn next_frame(&mut self, idle: bool) -> impl Future<Output = ()> {
        let ms = if idle { self.idle_ms } else { self.frame_ms };
        TimeoutFuture::new(ms)
    }
}

// ============================================================================
// LOOP
// ============================================================================

/// Tick `sim` once per frame until `handle` is stopped.
///
/// The simulation is borrowed only for the span of one tick plus its render
/// callback, so event handlers can borrow it between frames. No callback
/// runs after the handle is stopped.
pub async fn run_tick_loop<T, C, F>(
    sim: Rc<RefCell<Simulation<T>>>,
    handle: SimHandle,
    mut clock: C,
    mut on_tick: F,
) where
    C: FrameClock,
    F: FnMut(TickInfo, &Simulation<T>),
{
    tracing::debug!("Tick loop started");

    loop {
        if handle.is_stopped() {
            break;
        }

        let idle = !sim.borrow().is_running();
        clock.next_frame(idle).await;

        if handle.is_stopped() {
            break;
        }

        let Ok(mut guard) = sim.try_borrow_mut() else {
            continue;
        };
        if let Some(info) = guard.step() {
            on_tick(info, &guard);
        }
    }

    tracing::debug!("Tick loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::Position;
    use crate::node::SimNode;
    use futures::executor::block_on;
    use futures::future::ready;

    /// Clock that resolves immediately and stops the handle after `frames`
    struct CountingClock {
        frames: usize,
        limit: usize,
        handle: SimHandle,
    }

    impl FrameClock for CountingClock {
        fn next_frame(&mut self, _idle: bool) -> impl Future<Output = ()> {
            self.frames += 1;
            if self.frames >= self.limit {
                self.handle.stop();
            }
            ready(())
        }
    }

    fn shared_sim() -> Rc<RefCell<Simulation<()>>> {
        let mut sim = Simulation::default().with_force("x", Position::x(0.0));
        sim.start(vec![SimNode::new((), 1.0), SimNode::new((), 1.0)]);
        Rc::new(RefCell::new(sim))
    }

    #[test]
    fn test_handle_stop() {
        let handle = SimHandle::new();
        let other = handle.clone();
        assert!(handle.is_running());
        other.stop();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_loop_ticks_until_stopped() {
        let sim = shared_sim();
        let handle = SimHandle::new();
        let clock = CountingClock {
            frames: 0,
            limit: 10,
            handle: handle.clone(),
        };
        let mut seen = Vec::new();

        block_on(run_tick_loop(sim.clone(), handle.clone(), clock, |info, _| {
            seen.push(info.tick)
        }));

        // The tenth frame stops the handle before its tick runs
        assert_eq!(seen, (1..=9).collect::<Vec<u64>>());
        assert_eq!(sim.borrow().ticks(), 9);
    }

    #[test]
    fn test_stopped_handle_never_ticks() {
        let sim = shared_sim();
        let handle = SimHandle::new();
        handle.stop();
        let clock = CountingClock {
            frames: 0,
            limit: usize::MAX,
            handle: handle.clone(),
        };
        let mut calls = 0;

        block_on(run_tick_loop(sim.clone(), handle, clock, |_, _| calls += 1));

        assert_eq!(calls, 0);
        assert_eq!(sim.borrow().ticks(), 0);
    }

    #[test]
    fn test_settled_loop_stops_rendering() {
        let sim = shared_sim();
        let handle = SimHandle::new();
        let clock = CountingClock {
            frames: 0,
            limit: 1_000,
            handle: handle.clone(),
        };
        let mut calls = 0;

        block_on(run_tick_loop(sim.clone(), handle, clock, |_, _| calls += 1));

        assert!(sim.borrow().is_settled());
        assert!(calls < 999);
    }
}
