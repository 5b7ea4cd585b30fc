//! Entry animation clock

use leptos::prelude::*;
use viz_force::{FrameClock, SimHandle, TimerClock};
use wasm_bindgen_futures::spawn_local;

/// Report elapsed milliseconds once per frame until `total_ms` has passed or
/// the handle is stopped. The final report is exactly `total_ms`.
pub async fn run_entry_clock<C, N, F>(
    mut clock: C,
    now: N,
    total_ms: f64,
    handle: SimHandle,
    mut on_frame: F,
) where
    C: FrameClock,
    N: Fn() -> f64,
    F: FnMut(f64),
{
    let start = now();
    while handle.is_running() {
        clock.next_frame(false).await;
        if handle.is_stopped() {
            break;
        }
        let elapsed = (now() - start).min(total_ms);
        on_frame(elapsed);
        if elapsed >= total_ms {
            break;
        }
    }
}

/// Drive `elapsed` from 0 to `total_ms` on the browser clock
pub fn start_entry_clock(elapsed: RwSignal<f64>, total_ms: f64, handle: SimHandle) {
    elapsed.set(0.0);
    let stop = handle.clone();
    spawn_local(run_entry_clock(
        TimerClock::default(),
        js_sys::Date::now,
        total_ms,
        handle,
        move |ms| {
            if elapsed.try_set(ms).is_some() {
                // Signal disposed with its owner
                stop.stop();
            }
        },
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future::ready;
    use std::cell::Cell;
    use std::future::Future;

    struct Immediate;

    impl FrameClock for Immediate {
        fn next_frame(&mut self, _idle: bool) -> impl Future<Output = ()> {
            ready(())
        }
    }

    #[test]
    fn test_clock_ends_at_total() {
        let t = Cell::new(0.0);
        let now = || {
            t.set(t.get() + 250.0);
            t.get()
        };
        let mut frames = Vec::new();

        block_on(run_entry_clock(Immediate, now, 600.0, SimHandle::new(), |ms| frames.push(ms)));

        assert_eq!(frames, vec![250.0, 500.0, 600.0]);
    }

    #[test]
    fn test_stopped_clock_reports_nothing() {
        let handle = SimHandle::new();
        handle.stop();
        let mut frames = 0;
        block_on(run_entry_clock(Immediate, || 0.0, 100.0, handle, |_| frames += 1));
        assert_eq!(frames, 0);
    }
}
