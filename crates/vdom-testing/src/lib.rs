//! Testing utilities and harness for the vdom engine.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vdom_core::{
    Instance, MemorySurface, NodeError, NodeId, Runtime, RuntimeHandle, RuntimeScheduler, Surface,
};

/// Passes [`VdomTestRule::pump_until_idle`] runs before reporting a render loop.
pub const MAX_IDLE_PASSES: usize = 64;

/// Scheduler that only counts frame requests; the rule processes them.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    requests: AtomicUsize,
}

impl CountingScheduler {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Headless harness for exercising component trees in tests.
///
/// Owns an in-memory surface with a `body` element as mount target and a
/// runtime driven by a [`CountingScheduler`]. Deferred passes only happen when
/// the test asks for them, so assertions can observe the state between a
/// state change and the render it schedules.
pub struct VdomTestRule {
    surface: Rc<RefCell<MemorySurface>>,
    scheduler: Arc<CountingScheduler>,
    runtime: Runtime,
    target: NodeId,
}

impl VdomTestRule {
    pub fn new() -> Self {
        let surface = Rc::new(RefCell::new(MemorySurface::new()));
        let target = surface.borrow_mut().create_element("body");
        let scheduler = Arc::new(CountingScheduler::default());
        let runtime = Runtime::new(surface.clone(), scheduler.clone());
        Self {
            surface,
            scheduler,
            runtime,
            target,
        }
    }

    /// Mount `root` under the body element and perform the first paint.
    pub fn set_content(&mut self, root: Instance) -> Result<(), NodeError> {
        self.runtime.mount(root, self.target)
    }

    pub fn has_content(&self) -> bool {
        self.runtime.root().is_some()
    }

    /// Force one full pass over the installed tree.
    pub fn rerender(&mut self) -> Result<bool, NodeError> {
        self.runtime.request_render();
        self.runtime.process_frame()
    }

    /// Run `tick` as one unit of host work (a timer firing, a message
    /// arriving), then settle the renders it scheduled.
    pub fn advance_tick(&mut self, tick: impl FnOnce()) -> Result<usize, NodeError> {
        tick();
        self.pump_until_idle()
    }

    /// Process deferred passes until no frame is queued.
    ///
    /// Returns the number of passes that rendered. Gives up after
    /// [`MAX_IDLE_PASSES`] with the frame still queued.
    pub fn pump_until_idle(&mut self) -> Result<usize, NodeError> {
        let mut rendered = 0;
        for _ in 0..MAX_IDLE_PASSES {
            if !self.runtime.frame_queued() {
                return Ok(rendered);
            }
            if self.runtime.process_frame()? {
                rendered += 1;
            }
        }
        log::warn!("tree still requesting renders after {MAX_IDLE_PASSES} passes");
        Ok(rendered)
    }

    /// Frames the runtime asked the scheduler for so far.
    pub fn frame_requests(&self) -> usize {
        self.scheduler.requests()
    }

    pub fn render_passes(&self) -> u64 {
        self.runtime.render_passes()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Invoke the `event` listeners of `node`; returns how many ran.
    ///
    /// No pass runs here; follow up with [`pump_until_idle`](Self::pump_until_idle).
    pub fn dispatch(&mut self, node: NodeId, event: &str) -> Result<usize, NodeError> {
        MemorySurface::dispatch(&self.surface, node, event)
    }

    pub fn click(&mut self, node: NodeId) -> Result<usize, NodeError> {
        self.dispatch(node, "click")
    }

    pub fn find_by_tag(&self, tag: &str) -> Result<Vec<NodeId>, NodeError> {
        self.surface.borrow().find_by_tag(self.target, tag)
    }

    /// Text of everything mounted under the body element.
    pub fn text(&self) -> Result<String, NodeError> {
        self.surface.borrow().text_content(self.target)
    }

    /// Markup of the body element and its subtree.
    pub fn html(&self) -> Result<String, NodeError> {
        self.surface.borrow().to_html(self.target)
    }

    /// Read access to the surface for assertions the helpers do not cover.
    pub fn with_surface<R>(&self, f: impl FnOnce(&MemorySurface) -> R) -> R {
        f(&*self.surface.borrow())
    }
}

impl Default for VdomTestRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// [`VdomTestRule`].
pub fn run_test_render<R>(f: impl FnOnce(&mut VdomTestRule) -> R) -> R {
    let mut rule = VdomTestRule::new();
    f(&mut rule)
}
