use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

/// Event handler compared by identity.
///
/// Two callbacks are equal only when they share the same allocation, which is
/// what lets the reconciler skip re-binding a listener whose handler was
/// memoized with [`use_callback`](crate::use_callback).
#[derive(Clone)]
pub struct Callback {
    inner: Rc<dyn Fn()>,
}

impl Callback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn call(&self) {
        (self.inner)()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl Hash for Callback {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:#x})", self.addr())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassNames {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl ClassNames {
    pub fn as_slice(&self) -> &[String] {
        match self {
            ClassNames::None => &[],
            ClassNames::One(name) => std::slice::from_ref(name),
            ClassNames::Many(names) => names,
        }
    }

    /// Single `class` attribute value, names separated by `,`.
    ///
    /// HTML splits class lists on whitespace, so a host reads `"left,section"`
    /// as one class name rather than two.
    pub fn joined(&self) -> String {
        self.as_slice().join(",")
    }
}

impl From<&str> for ClassNames {
    fn from(name: &str) -> Self {
        ClassNames::One(name.to_owned())
    }
}

impl From<String> for ClassNames {
    fn from(name: String) -> Self {
        ClassNames::One(name)
    }
}

impl From<Vec<String>> for ClassNames {
    fn from(names: Vec<String>) -> Self {
        ClassNames::Many(names)
    }
}

impl From<Vec<&str>> for ClassNames {
    fn from(names: Vec<&str>) -> Self {
        ClassNames::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ClassNames {
    fn from(names: [&str; N]) -> Self {
        ClassNames::Many(names.iter().map(|name| (*name).to_owned()).collect())
    }
}

/// Configuration bag handed to an instance by its parent.
///
/// Primitives read the class names and event listeners; composites usually
/// carry their own typed value in `data` and read it back with [`Props::data`].
#[derive(Clone, Default)]
pub struct Props {
    class_names: ClassNames,
    event_listeners: IndexMap<String, Callback>,
    data: Option<Rc<dyn Any>>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_names(mut self, class_names: impl Into<ClassNames>) -> Self {
        self.class_names = class_names.into();
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: Callback) -> Self {
        self.event_listeners.insert(event.into(), handler);
        self
    }

    pub fn with_data<T: 'static>(mut self, data: T) -> Self {
        self.data = Some(Rc::new(data));
        self
    }

    pub fn classes(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn event_listeners(&self) -> &IndexMap<String, Callback> {
        &self.event_listeners
    }

    /// Typed access to the value stored with [`Props::with_data`].
    pub fn data<T: 'static>(&self) -> Option<&T> {
        self.data.as_deref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("class_names", &self.class_names)
            .field(
                "event_listeners",
                &self.event_listeners.keys().collect::<Vec<_>>(),
            )
            .field("has_data", &self.data.is_some())
            .finish()
    }
}
