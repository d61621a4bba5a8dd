#![doc = r"Core runtime for a hook-based declarative component engine."]

pub mod hash;
pub mod platform;
pub mod runtime;
pub mod surface;

mod content;
mod deps;
mod description;
mod factory;
mod hooks;
mod instance;
mod props;

pub use content::{Content, Renderable};
pub use deps::{Cleanup, Deps};
pub use description::{ComponentFn, Description, Identifier, RenderFn};
pub use factory::component;
pub use hooks::{use_callback, use_effect, use_state, use_state_with, StateSetter};
pub use instance::Instance;
pub use platform::RuntimeScheduler;
pub use props::{Callback, ClassNames, Props};
pub use runtime::{is_rendering, DefaultScheduler, Runtime, RuntimeHandle};
pub use surface::{MemorySurface, NodeError, NodeId, Surface, SurfaceOp};

#[cfg(test)]
pub(crate) use runtime::TestScheduler;

#[allow(non_snake_case)]
pub fn useState<T>(initial: T) -> (T, StateSetter<T>)
where
    T: Clone + PartialEq + 'static,
{
    use_state(initial)
}

#[allow(non_snake_case)]
pub fn useEffect<F, R>(effect: F, deps: Deps)
where
    F: FnOnce() -> R,
    R: Into<Cleanup>,
{
    use_effect(effect, deps)
}

#[allow(non_snake_case)]
pub fn useCallback(f: impl Fn() + 'static, deps: Deps) -> Callback {
    use_callback(f, deps)
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod runtime_tests;

#[cfg(test)]
#[path = "tests/hooks_tests.rs"]
mod hooks_tests;
