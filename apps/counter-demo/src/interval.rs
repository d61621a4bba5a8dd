//! Simulated `setInterval` for the demo loop.

use std::cell::RefCell;

use vdom_core::Callback;

struct Interval {
    every: u32,
    callback: Callback,
}

thread_local! {
    static INTERVALS: RefCell<Vec<Interval>> = RefCell::new(Vec::new());
}

/// Run `f` every `every` seconds of demo time. Intervals are never cleared.
pub fn set_interval(every: u32, f: impl Fn() + 'static) {
    let interval = Interval {
        every: every.max(1),
        callback: Callback::new(f),
    };
    INTERVALS.with(|intervals| intervals.borrow_mut().push(interval));
}

/// Fire every interval due at `second`; returns how many fired.
pub fn advance_to(second: u32) -> usize {
    let due: Vec<Callback> = INTERVALS.with(|intervals| {
        intervals
            .borrow()
            .iter()
            .filter(|interval| second % interval.every == 0)
            .map(|interval| interval.callback.clone())
            .collect()
    });
    for callback in &due {
        callback.call();
    }
    due.len()
}
