use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::content::{Content, Renderable};
use crate::props::Props;

pub type RenderFn = dyn Fn(&Props, &Content) -> Renderable;

/// User component function plus the name used to build its cache key.
#[derive(Clone)]
pub struct ComponentFn {
    name: Cow<'static, str>,
    render: Rc<RenderFn>,
}

impl ComponentFn {
    /// Wrap `f`, naming it after its Rust type.
    ///
    /// Function items get their path (`my_app::Counter`). Every closure
    /// declared inside one function shares the same type name, so closures
    /// that can end up under the same parent should use [`ComponentFn::named`].
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Props, &Content) -> Renderable + 'static,
    {
        Self {
            name: Cow::Borrowed(std::any::type_name::<F>()),
            render: Rc::new(f),
        }
    }

    pub fn named<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&Props, &Content) -> Renderable + 'static,
    {
        Self {
            name: name.into(),
            render: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, props: &Props, content: &Content) -> Renderable {
        (self.render)(props, content)
    }
}

impl fmt::Debug for ComponentFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentFn").field(&self.name).finish()
    }
}

/// What the factory should instantiate: a composite function or a display tag.
#[derive(Clone, Debug)]
pub enum Description {
    Function(ComponentFn),
    Tag(Cow<'static, str>),
}

impl Description {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Props, &Content) -> Renderable + 'static,
    {
        Description::Function(ComponentFn::new(f))
    }

    pub fn named<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&Props, &Content) -> Renderable + 'static,
    {
        Description::Function(ComponentFn::named(name, f))
    }

    pub fn tag(tag: impl Into<Cow<'static, str>>) -> Self {
        Description::Tag(tag.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Description::Function(function) => function.name(),
            Description::Tag(tag) => tag,
        }
    }
}

impl From<ComponentFn> for Description {
    fn from(function: ComponentFn) -> Self {
        Description::Function(function)
    }
}

impl From<&'static str> for Description {
    fn from(tag: &'static str) -> Self {
        Description::Tag(Cow::Borrowed(tag))
    }
}

impl From<String> for Description {
    fn from(tag: String) -> Self {
        Description::Tag(Cow::Owned(tag))
    }
}

// The `Fn` traits are fundamental, so this does not overlap with the string impls.
impl<F> From<F> for Description
where
    F: Fn(&Props, &Content) -> Renderable + 'static,
{
    fn from(f: F) -> Self {
        Description::function(f)
    }
}

/// Distinguishes siblings created from the same description under one parent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier(Cow<'static, str>);

impl Identifier {
    /// Sentinel used when the caller supplies no identifier.
    pub const DEFAULT: Identifier = Identifier(Cow::Borrowed("default"));

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<()> for Identifier {
    fn from(_: ()) -> Self {
        Self::DEFAULT
    }
}

impl From<&'static str> for Identifier {
    fn from(id: &'static str) -> Self {
        Identifier(Cow::Borrowed(id))
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Identifier(Cow::Owned(id))
    }
}

macro_rules! numeric_identifier {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Identifier {
                fn from(id: $ty) -> Self {
                    Identifier(Cow::Owned(id.to_string()))
                }
            }
        )*
    };
}

numeric_identifier!(i32, i64, u32, u64, usize);

/// Key of a child in its parent's cache: description name, then identifier.
pub(crate) fn cache_key(description: &Description, id: &Identifier) -> String {
    format!("{}|{}", description.name(), id)
}
