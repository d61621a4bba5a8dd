//! Standard runtime services backed by Rust's `std` library.
//!
//! This crate provides a concrete [`RuntimeScheduler`] for `vdom-core`.
//! Applications construct a [`StdRuntime`] around their surface, mount a
//! root instance and then either poll [`StdRuntime::take_frame_request`] from
//! their own loop or call [`StdRuntime::run_until_idle`] after each batch of
//! events.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use vdom_core::{Instance, NodeError, NodeId, Runtime, RuntimeHandle, RuntimeScheduler, Surface};

type FrameWaker = Arc<dyn Fn() + Send + Sync + 'static>;

/// Passes [`StdRuntime::run_until_idle`] runs before giving up.
pub const DEFAULT_MAX_PASSES: usize = 64;

/// [`RuntimeScheduler`] for hosts built on a plain `std` event loop.
///
/// A frame request raises the `pending` flag and calls the optional waker,
/// which a host blocked on a channel or condvar uses to get back to its loop.
/// The runtime coalesces requests, so the waker runs at most once between two
/// processed frames.
#[derive(Default)]
pub struct StdScheduler {
    pending: AtomicBool,
    waker: RwLock<Option<FrameWaker>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any.
    pub fn take_frame_request(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    /// Peek at the pending flag without consuming it.
    pub fn has_frame_request(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// Call `waker` on every future frame request, replacing any earlier one.
    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.replace_waker(Some(Arc::new(waker)));
    }

    pub fn clear_frame_waker(&self) {
        self.replace_waker(None);
    }

    // A panicking waker must not disable scheduling, so poisoning is ignored.
    fn replace_waker(&self, waker: Option<FrameWaker>) {
        *self.waker.write().unwrap_or_else(PoisonError::into_inner) = waker;
    }

    fn current_waker(&self) -> Option<FrameWaker> {
        self.waker
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field("pending", &self.has_frame_request())
            .field("waker", &self.current_waker().is_some())
            .finish()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_frame(&self) {
        self.pending.store(true, Ordering::SeqCst);
        if let Some(waker) = self.current_waker() {
            waker();
        }
    }
}

/// A [`Runtime`] wired to a [`StdScheduler`].
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    runtime: Runtime,
    max_passes: usize,
}

impl StdRuntime {
    pub fn new(surface: Rc<RefCell<dyn Surface>>) -> Self {
        let scheduler = Arc::new(StdScheduler::default());
        let runtime = Runtime::new(surface, scheduler.clone());
        Self {
            scheduler,
            runtime,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Bound on consecutive passes in [`run_until_idle`](Self::run_until_idle).
    ///
    /// A value of zero is treated as one.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime.clone()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn mount(&self, root: Instance, target: NodeId) -> Result<(), NodeError> {
        self.runtime.mount(root, target)
    }

    /// Returns whether a frame was requested since the last poll.
    pub fn take_frame_request(&self) -> bool {
        self.scheduler.take_frame_request()
    }

    pub fn set_frame_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_frame_waker(waker);
    }

    pub fn clear_frame_waker(&self) {
        self.scheduler.clear_frame_waker();
    }

    /// Process one requested frame, if any. Returns whether a pass rendered.
    pub fn pump(&self) -> Result<bool, NodeError> {
        if !self.take_frame_request() {
            return Ok(false);
        }
        self.runtime.process_frame()
    }

    /// Process requested frames until none is pending.
    ///
    /// Components that request a render on every pass (for example through an
    /// effect without a dependency list that writes state) would loop forever;
    /// the loop stops after the configured number of passes and leaves the
    /// last request pending. Returns the number of passes that rendered.
    pub fn run_until_idle(&self) -> Result<usize, NodeError> {
        let mut rendered = 0;
        for _ in 0..self.max_passes {
            if !self.take_frame_request() {
                return Ok(rendered);
            }
            if self.runtime.process_frame()? {
                rendered += 1;
            }
        }
        if self.runtime.frame_queued() {
            log::warn!(
                "render loop still busy after {} passes; leaving frame pending",
                self.max_passes
            );
        }
        Ok(rendered)
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("max_passes", &self.max_passes)
            .field("render_passes", &self.runtime.render_passes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use vdom_core::{
        component, deps, use_effect, use_state, Callback, Deps, Description, MemorySurface,
        NodeError, NodeId, Props, Renderable, StateSetter, Surface,
    };

    use super::StdRuntime;

    fn std_runtime() -> (StdRuntime, Rc<RefCell<MemorySurface>>, usize) {
        let surface = Rc::new(RefCell::new(MemorySurface::new()));
        let target = surface.borrow_mut().create_element("body");
        (StdRuntime::new(surface.clone()), surface, target)
    }

    #[test]
    fn std_runtime_requests_frame_and_rerenders_on_state_change() {
        let (runtime, surface, target) = std_runtime();
        let renders = Rc::new(Cell::new(0u32));
        let slot: Rc<RefCell<Option<StateSetter<i32>>>> = Rc::default();

        let root = component(
            Description::named("Counter", {
                let renders = renders.clone();
                let slot = slot.clone();
                move |_, _| {
                    renders.set(renders.get() + 1);
                    let (count, set_count) = use_state(0);
                    slot.borrow_mut().replace(set_count);
                    Renderable::text(count)
                }
            }),
            Props::new(),
            (),
            (),
        );
        runtime.mount(root, target).expect("initial render");
        assert_eq!(renders.get(), 1);
        assert!(!runtime.take_frame_request(), "mount paints synchronously");

        let set_count = slot.borrow().clone().expect("setter captured during render");
        set_count.set(1);
        set_count.set(2);

        assert!(runtime.take_frame_request(), "set should request a frame");
        assert!(!runtime.take_frame_request(), "request is consumed once");
        assert!(runtime.runtime().process_frame().expect("process frame"));
        assert_eq!(renders.get(), 2);
        assert_eq!(surface.borrow().text_content(target).expect("text"), "2");
    }

    #[test]
    fn waker_fires_once_per_coalesced_frame() {
        let (runtime, _surface, target) = std_runtime();
        let wakes = Arc::new(AtomicUsize::new(0));
        runtime.set_frame_waker({
            let wakes = Arc::clone(&wakes);
            move || {
                wakes.fetch_add(1, Ordering::SeqCst);
            }
        });
        runtime
            .mount(component("div", Props::new(), (), "idle"), target)
            .expect("mount");

        let handle = runtime.runtime_handle();
        handle.request_render();
        handle.request_render();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert!(runtime.scheduler().has_frame_request());

        assert_eq!(runtime.run_until_idle().expect("idle"), 1);
        runtime.clear_frame_waker();
        handle.request_render();
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn run_until_idle_settles_effect_driven_updates() {
        let (runtime, surface, target) = std_runtime();
        let root = component(
            Description::named("Countdown", |_, _| {
                let (left, set_left) = use_state(3);
                use_effect(
                    move || {
                        if left > 0 {
                            set_left.set(left - 1);
                        }
                    },
                    deps![left],
                );
                Renderable::text(left)
            }),
            Props::new(),
            (),
            (),
        );
        runtime.mount(root, target).expect("mount");

        assert_eq!(runtime.run_until_idle().expect("idle"), 3);
        assert_eq!(surface.borrow().text_content(target).expect("text"), "0");
        assert!(!runtime.take_frame_request());
    }

    #[test]
    fn run_until_idle_stops_a_render_loop() {
        let (runtime, _surface, target) = std_runtime();
        let runtime = runtime.with_max_passes(5);
        let root = component(
            Description::named("Spinner", |_, _| {
                let (turns, set_turns) = use_state(0u64);
                use_effect(move || set_turns.set(turns + 1), Deps::always());
                Renderable::text(turns)
            }),
            Props::new(),
            (),
            (),
        );
        runtime.mount(root, target).expect("mount");

        assert_eq!(runtime.run_until_idle().expect("bounded"), 5);
        assert!(runtime.runtime().frame_queued());
        assert!(runtime.take_frame_request(), "last request stays pending");
    }

    /// Delegates to a [`MemorySurface`] until `detached` is set, then rejects
    /// every child replacement.
    #[derive(Default)]
    struct DetachingSurface {
        inner: MemorySurface,
        detached: bool,
    }

    impl Surface for DetachingSurface {
        fn create_element(&mut self, tag: &str) -> NodeId {
            self.inner.create_element(tag)
        }

        fn create_text_node(&mut self, text: &str) -> NodeId {
            self.inner.create_text_node(text)
        }

        fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), NodeError> {
            if self.detached {
                return Err(NodeError::Missing { id: parent });
            }
            self.inner.replace_children(parent, children)
        }

        fn add_event_listener(
            &mut self,
            element: NodeId,
            event: &str,
            handler: &Callback,
        ) -> Result<(), NodeError> {
            self.inner.add_event_listener(element, event, handler)
        }

        fn remove_event_listener(
            &mut self,
            element: NodeId,
            event: &str,
            handler: &Callback,
        ) -> Result<(), NodeError> {
            self.inner.remove_event_listener(element, event, handler)
        }

        fn set_class_attribute(&mut self, element: NodeId, class: &str) -> Result<(), NodeError> {
            self.inner.set_class_attribute(element, class)
        }
    }

    #[test]
    fn run_until_idle_returns_surface_errors() {
        let surface = Rc::new(RefCell::new(DetachingSurface::default()));
        let target = surface.borrow_mut().create_element("body");
        let runtime = StdRuntime::new(surface.clone());
        runtime
            .mount(component("div", Props::new(), (), "attached"), target)
            .expect("mount");

        surface.borrow_mut().detached = true;
        runtime.runtime_handle().request_render();

        let err = runtime.run_until_idle().expect_err("detached target");
        assert!(matches!(err, NodeError::Missing { .. }), "unexpected error: {err}");
    }
}
