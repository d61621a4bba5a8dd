use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::thread_local;

use crate::instance::Instance;
use crate::platform::RuntimeScheduler;
use crate::surface::{NodeError, NodeId, Surface};

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    surface: Rc<RefCell<dyn Surface>>,
    root: RefCell<Option<Instance>>,
    target: Cell<Option<NodeId>>,
    needs_render: Cell<bool>,
    frame_queued: Cell<bool>,
    rendering: RefCell<Vec<Instance>>, // FUTURE(no_std): replace Vec with fixed-capacity stack storage.
    passes: Cell<u64>,
}

impl RuntimeInner {
    fn request_render(&self) {
        self.needs_render.set(true);
        if !self.frame_queued.replace(true) {
            log::debug!("render requested; scheduling frame");
            self.scheduler.schedule_frame();
        }
    }
}

/// Render context for one application tree.
///
/// Owns the root instance, the target node it is mounted into, the pending
/// render flag and the stack of instances currently rendering. Independent
/// trees use independent runtimes.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>, // FUTURE(no_std): replace Rc with arena-managed runtime storage.
}

impl Runtime {
    pub fn new(surface: Rc<RefCell<dyn Surface>>, scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                scheduler,
                surface,
                root: RefCell::new(None),
                target: Cell::new(None),
                needs_render: Cell::new(false),
                frame_queued: Cell::new(false),
                rendering: RefCell::new(Vec::new()),
                passes: Cell::new(0),
            }),
        }
    }

    pub fn with_default_scheduler(surface: Rc<RefCell<dyn Surface>>) -> Self {
        Self::new(surface, Arc::new(DefaultScheduler))
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    /// Install `root` under `target` and paint it synchronously.
    ///
    /// Every later pass is deferred through the scheduler.
    pub fn mount(&self, root: Instance, target: NodeId) -> Result<(), NodeError> {
        log::debug!("mounting {} into node {target}", root.name());
        *self.inner.root.borrow_mut() = Some(root);
        self.inner.target.set(Some(target));
        self.inner.needs_render.set(true);
        self.render_pass().map(|_| ())
    }

    /// Run the deferred pass the scheduler was asked for.
    ///
    /// Returns whether a render actually happened: requests that were already
    /// satisfied by an earlier pass leave nothing to do.
    pub fn process_frame(&self) -> Result<bool, NodeError> {
        self.inner.frame_queued.set(false);
        self.render_pass()
    }

    /// Mark the tree dirty and ask the host for one deferred pass.
    pub fn request_render(&self) {
        self.inner.request_render();
    }

    pub fn needs_render(&self) -> bool {
        self.inner.needs_render.get()
    }

    pub fn frame_queued(&self) -> bool {
        self.inner.frame_queued.get()
    }

    /// Number of completed full-tree passes, the first paint included.
    pub fn render_passes(&self) -> u64 {
        self.inner.passes.get()
    }

    pub fn root(&self) -> Option<Instance> {
        self.inner.root.borrow().clone()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.inner.target.get()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&mut dyn Surface) -> R) -> R {
        let mut surface = self.inner.surface.borrow_mut();
        f(&mut *surface)
    }

    /// Make `instance` the current render target until the frame is dropped.
    pub(crate) fn enter(&self, instance: &Instance) -> RenderFrame {
        self.inner.rendering.borrow_mut().push(instance.clone());
        push_active_runtime(self.handle());
        RenderFrame {
            runtime: self.clone(),
        }
    }

    fn render_pass(&self) -> Result<bool, NodeError> {
        if !self.inner.needs_render.replace(false) {
            return Ok(false);
        }
        let root = self.root();
        let (Some(root), Some(target)) = (root, self.target()) else {
            log::debug!("render requested before mount; skipping");
            return Ok(false);
        };
        let node = root.render(self)?;
        self.with_surface(|surface| surface.replace_children(target, &[node]))?;
        let passes = self.inner.passes.get() + 1;
        self.inner.passes.set(passes);
        log::debug!("render pass {passes} complete");
        Ok(true)
    }
}

/// Scope guard pairing every push onto the rendering stack with its pop.
///
/// Popping happens in `Drop`, so the stack stays balanced when a render
/// returns early with an error or unwinds.
pub(crate) struct RenderFrame {
    runtime: Runtime,
}

impl Drop for RenderFrame {
    fn drop(&mut self) {
        pop_active_runtime();
        self.runtime.inner.rendering.borrow_mut().pop();
    }
}

/// Scheduler that never wakes anyone; the host polls [`Runtime::frame_queued`].
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

#[cfg(test)]
#[derive(Default)]
pub struct TestScheduler {
    frames: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl TestScheduler {
    pub fn frames(&self) -> usize {
        self.frames.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl RuntimeScheduler for TestScheduler {
    fn schedule_frame(&self) {
        self.frames
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

/// Weak reference to a [`Runtime`], held by state setters and callbacks.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn upgrade(&self) -> Option<Runtime> {
        self.0.upgrade().map(|inner| Runtime { inner })
    }

    /// Request a deferred pass; a no-op once the runtime is gone.
    pub fn request_render(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.request_render();
        }
    }
}

thread_local! {
    static ACTIVE_RUNTIMES: RefCell<Vec<RuntimeHandle>> = RefCell::new(Vec::new()); // FUTURE(no_std): move to bounded stack storage.
}

fn push_active_runtime(handle: RuntimeHandle) {
    ACTIVE_RUNTIMES.with(|stack| stack.borrow_mut().push(handle));
}

fn pop_active_runtime() {
    ACTIVE_RUNTIMES.with(|stack| {
        stack.borrow_mut().pop();
    });
}

/// Instance on top of the active runtime's rendering stack, with its runtime.
pub(crate) fn current_frame() -> Option<(Instance, RuntimeHandle)> {
    let handle = ACTIVE_RUNTIMES.with(|stack| stack.borrow().last().cloned())?;
    let inner = handle.0.upgrade()?;
    let instance = inner.rendering.borrow().last().cloned()?;
    Some((instance, handle))
}

/// Whether any instance is rendering on this thread right now.
pub fn is_rendering() -> bool {
    current_frame().is_some()
}
