//! Per-instance memory for component functions.
//!
//! Every hook consumes exactly one slot of the instance currently rendering,
//! addressed purely by call order. Hooks must therefore be called
//! unconditionally and in the same order on every render of a component.
//! Breaking that rule silently hands one hook another hook's state; only a
//! change of slot kind or value type is noticed, logged, and answered by
//! re-initialising the slot.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::deps::{Cleanup, Deps};
use crate::instance::Instance;
use crate::props::Callback;
use crate::runtime::{self, RuntimeHandle};

pub(crate) enum HookSlot {
    State(Rc<dyn Any>),
    Effect(EffectSlot),
    Callback(CallbackSlot),
}

impl HookSlot {
    fn kind(&self) -> &'static str {
        match self {
            HookSlot::State(_) => "state",
            HookSlot::Effect(_) => "effect",
            HookSlot::Callback(_) => "callback",
        }
    }
}

pub(crate) struct EffectSlot {
    deps: Deps,
    cleanup: Cleanup,
}

pub(crate) struct CallbackSlot {
    callback: Callback,
    deps: Deps,
}

struct StateCell<T> {
    value: RefCell<T>,
    runtime: RuntimeHandle,
}

/// Writes one state slot and schedules a re-render when the value changes.
///
/// The same setter is returned on every render of the owning instance.
pub struct StateSetter<T> {
    cell: Rc<StateCell<T>>,
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> PartialEq for StateSetter<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T> Eq for StateSetter<T> {}

impl<T: PartialEq> StateSetter<T> {
    pub fn set(&self, value: T) {
        self.update(|_| value);
    }

    /// Compute the next value from the current one.
    ///
    /// The new value is always stored; a render is requested only when it
    /// differs from the previous one. Nothing renders synchronously.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.cell.value.borrow());
        let changed = {
            let mut value = self.cell.value.borrow_mut();
            let changed = *value != next;
            *value = next;
            changed
        };
        if changed {
            self.cell.runtime.request_render();
        }
    }
}

impl<T: Clone> StateSetter<T> {
    /// Latest stored value, including writes not yet rendered.
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }
}

impl<T: fmt::Debug> fmt::Debug for StateSetter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter")
            .field("value", &*self.cell.value.borrow())
            .finish()
    }
}

fn hook_target(hook: &'static str) -> (Instance, RuntimeHandle, usize) {
    let Some((instance, runtime)) = runtime::current_frame() else {
        panic!("{hook} called outside of a component render");
    };
    let index = instance.cursor();
    (instance, runtime, index)
}

fn store_slot(instance: &Instance, index: usize, slot: HookSlot) {
    let mut slots = instance.slots().borrow_mut();
    if let Some(existing) = slots.get_mut(index) {
        log::warn!(
            "hook slot {index} of {} held {} but is now used as {}; re-initialising",
            instance.name(),
            existing.kind(),
            slot.kind()
        );
        *existing = slot;
    } else {
        slots.push(slot);
    }
}

/// State hook with a literal starting value.
///
/// # Panics
///
/// Panics when called outside a component render.
pub fn use_state<T>(initial: T) -> (T, StateSetter<T>)
where
    T: Clone + PartialEq + 'static,
{
    use_state_with(move || initial)
}

/// State hook whose starting value is produced lazily.
///
/// `init` runs only on the first render of the instance.
///
/// # Panics
///
/// Panics when called outside a component render.
pub fn use_state_with<T, F>(init: F) -> (T, StateSetter<T>)
where
    T: Clone + PartialEq + 'static,
    F: FnOnce() -> T,
{
    let (instance, runtime, index) = hook_target("use_state");
    let existing = match instance.slots().borrow().get(index) {
        Some(HookSlot::State(cell)) => Some(Rc::clone(cell)),
        _ => None,
    };
    let cell = match existing.and_then(|cell| cell.downcast::<StateCell<T>>().ok()) {
        Some(cell) => cell,
        None => {
            let cell = Rc::new(StateCell {
                value: RefCell::new(init()),
                runtime,
            });
            store_slot(&instance, index, HookSlot::State(cell.clone()));
            cell
        }
    };
    let value = cell.value.borrow().clone();
    instance.set_cursor(index + 1);
    (value, StateSetter { cell })
}

/// Effect hook.
///
/// Runs `effect` on the first render and again whenever `deps` changes,
/// calling the cleanup returned by the previous run first. With
/// [`Deps::Always`] the effect runs on every render.
///
/// # Panics
///
/// Panics when called outside a component render.
pub fn use_effect<F, R>(effect: F, deps: Deps)
where
    F: FnOnce() -> R,
    R: Into<Cleanup>,
{
    let (instance, _runtime, index) = hook_target("use_effect");
    // `None`: no effect slot yet. `Some(None)`: unchanged. `Some(Some(_))`: stale cleanup.
    let previous = match instance.slots().borrow_mut().get_mut(index) {
        Some(HookSlot::Effect(slot)) if !slot.deps.changed(&deps) => Some(None),
        Some(HookSlot::Effect(slot)) => Some(Some(std::mem::take(&mut slot.cleanup))),
        _ => None,
    };
    match previous {
        Some(None) => {}
        Some(Some(cleanup)) => {
            cleanup.run();
            let cleanup = effect().into();
            if let Some(HookSlot::Effect(slot)) = instance.slots().borrow_mut().get_mut(index) {
                *slot = EffectSlot { deps, cleanup };
            }
        }
        None => {
            let cleanup = effect().into();
            store_slot(&instance, index, HookSlot::Effect(EffectSlot { deps, cleanup }));
        }
    }
    instance.set_cursor(index + 1);
}

/// Memoized callback hook.
///
/// Returns the stored callback while `deps` is unchanged, so its identity is
/// stable across renders. A dependency change stores the new callback and
/// requests a re-render.
///
/// # Panics
///
/// Panics when called outside a component render.
pub fn use_callback(f: impl Fn() + 'static, deps: Deps) -> Callback {
    let (instance, runtime, index) = hook_target("use_callback");
    let stored = match instance.slots().borrow().get(index) {
        Some(HookSlot::Callback(slot)) => Some((slot.callback.clone(), slot.deps.changed(&deps))),
        _ => None,
    };
    let callback = match stored {
        Some((callback, false)) => callback,
        Some((_, true)) => {
            let callback = Callback::new(f);
            if let Some(HookSlot::Callback(slot)) = instance.slots().borrow_mut().get_mut(index) {
                *slot = CallbackSlot {
                    callback: callback.clone(),
                    deps,
                };
            }
            runtime.request_render();
            callback
        }
        None => {
            let callback = Callback::new(f);
            store_slot(
                &instance,
                index,
                HookSlot::Callback(CallbackSlot {
                    callback: callback.clone(),
                    deps,
                }),
            );
            callback
        }
    };
    instance.set_cursor(index + 1);
    callback
}
