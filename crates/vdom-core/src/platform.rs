//! Platform abstraction for deferred render passes.
//!
//! The runtime never runs a pass on its own after the first paint. It asks the
//! host to schedule one, and the host later calls
//! [`Runtime::process_frame`](crate::Runtime::process_frame) once the current
//! synchronous work has finished. This keeps the engine independent of any
//! particular event loop.

/// Schedules deferred render passes for a [`Runtime`](crate::Runtime).
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host run one pass after the current tick.
    ///
    /// The runtime coalesces requests: this is called at most once between two
    /// processed frames, no matter how many state changes occur.
    fn schedule_frame(&self);
}
