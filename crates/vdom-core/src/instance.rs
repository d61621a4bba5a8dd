use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::content::{Content, Renderable};
use crate::description::{ComponentFn, Description};
use crate::hash::ChildMap;
use crate::hooks::HookSlot;
use crate::props::{Callback, Props};
use crate::runtime::Runtime;
use crate::surface::{NodeError, NodeId};

enum Kind {
    Composite(ComponentFn),
    Primitive(Primitive),
}

struct Primitive {
    tag: Cow<'static, str>,
    element: Cell<Option<NodeId>>,
    attached: RefCell<IndexMap<String, Callback>>,
}

impl Primitive {
    fn new(tag: Cow<'static, str>) -> Self {
        Self {
            tag,
            element: Cell::new(None),
            attached: RefCell::new(IndexMap::new()),
        }
    }

    fn element(&self, runtime: &Runtime) -> NodeId {
        if let Some(id) = self.element.get() {
            return id;
        }
        let id = runtime.with_surface(|surface| surface.create_element(&self.tag));
        self.element.set(Some(id));
        id
    }

    /// Bind handlers that differ (by identity) from the ones already attached.
    ///
    /// Events that disappear from `listeners` keep their old handler attached.
    fn reconcile_listeners(
        &self,
        element: NodeId,
        listeners: &IndexMap<String, Callback>,
        runtime: &Runtime,
    ) -> Result<(), NodeError> {
        let mut attached = self.attached.borrow_mut();
        for (event, handler) in listeners {
            if let Some(current) = attached.get(event) {
                if current == handler {
                    continue;
                }
                runtime.with_surface(|surface| {
                    surface.remove_event_listener(element, event, current)
                })?;
            }
            runtime.with_surface(|surface| surface.add_event_listener(element, event, handler))?;
            attached.insert(event.clone(), handler.clone());
        }
        Ok(())
    }
}

struct InstanceInner {
    kind: Kind,
    props: RefCell<Props>,
    content: RefCell<Content>,
    slots: RefCell<Vec<HookSlot>>, // FUTURE(no_std): replace Vec with arena-backed slot storage.
    cursor: Cell<usize>,
    children: RefCell<ChildMap<Instance>>,
    node: Cell<Option<NodeId>>,
}

/// One rendering identity in the tree.
///
/// Cloning is cheap and yields a handle to the same instance; hook state and
/// the child cache live as long as any handle does.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

impl Instance {
    pub(crate) fn new(description: Description, props: Props, content: Content) -> Self {
        let kind = match description {
            Description::Function(function) => Kind::Composite(function),
            Description::Tag(tag) => Kind::Primitive(Primitive::new(tag)),
        };
        Self {
            inner: Rc::new(InstanceInner {
                kind,
                props: RefCell::new(props),
                content: RefCell::new(content),
                slots: RefCell::new(Vec::new()),
                cursor: Cell::new(0),
                children: RefCell::new(ChildMap::default()),
                node: Cell::new(None),
            }),
        }
    }

    /// Replace props and content in place; hook state and cached children survive.
    pub fn update(&self, props: Props, content: Content) {
        *self.inner.props.borrow_mut() = props;
        *self.inner.content.borrow_mut() = content;
    }

    /// Rebuild this instance's output and return the realized node.
    ///
    /// While the call runs this instance is the target of every hook call and
    /// the parent of every [`component`](crate::component) request.
    pub fn render(&self, runtime: &Runtime) -> Result<NodeId, NodeError> {
        let _frame = runtime.enter(self);
        self.inner.cursor.set(0);
        log::trace!("render {}", self.name());
        let node = match &self.inner.kind {
            Kind::Composite(function) => self.render_composite(function, runtime)?,
            Kind::Primitive(primitive) => self.render_primitive(primitive, runtime)?,
        };
        self.inner.node.set(Some(node));
        Ok(node)
    }

    fn render_composite(
        &self,
        function: &ComponentFn,
        runtime: &Runtime,
    ) -> Result<NodeId, NodeError> {
        let props = self.inner.props.borrow().clone();
        let content = self.inner.content.borrow().clone();
        let output = function.call(&props, &content);
        domify(&output, runtime)
    }

    fn render_primitive(
        &self,
        primitive: &Primitive,
        runtime: &Runtime,
    ) -> Result<NodeId, NodeError> {
        let element = primitive.element(runtime);
        let props = self.inner.props.borrow().clone();
        primitive.reconcile_listeners(element, props.event_listeners(), runtime)?;
        let class = props.classes().joined();
        runtime.with_surface(|surface| surface.set_class_attribute(element, &class))?;

        let content = self.inner.content.borrow().clone();
        let children = content
            .items()
            .iter()
            .map(|item| domify(item, runtime))
            .collect::<Result<Vec<_>, _>>()?;
        runtime.with_surface(|surface| surface.replace_children(element, &children))?;
        Ok(element)
    }

    pub fn name(&self) -> &str {
        match &self.inner.kind {
            Kind::Composite(function) => function.name(),
            Kind::Primitive(primitive) => &primitive.tag,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.inner.kind, Kind::Composite(_))
    }

    /// Node produced by the most recent render, if any.
    pub fn node(&self) -> Option<NodeId> {
        self.inner.node.get()
    }

    pub fn props(&self) -> Props {
        self.inner.props.borrow().clone()
    }

    pub fn cached_children(&self) -> usize {
        self.inner.children.borrow().len()
    }

    pub fn slot_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn cached_child(&self, key: &str) -> Option<Instance> {
        self.inner.children.borrow().get(key).cloned()
    }

    pub(crate) fn cache_child(&self, key: String, child: Instance) {
        self.inner.children.borrow_mut().insert(key, child);
    }

    pub(crate) fn slots(&self) -> &RefCell<Vec<HookSlot>> {
        &self.inner.slots
    }

    pub(crate) fn cursor(&self) -> usize {
        self.inner.cursor.get()
    }

    pub(crate) fn set_cursor(&self, cursor: usize) {
        self.inner.cursor.set(cursor);
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name())
            .field("composite", &self.is_composite())
            .field("slots", &self.slot_count())
            .field("node", &self.node())
            .finish()
    }
}

/// Realize one child: instances render recursively, anything else becomes text.
fn domify(item: &Renderable, runtime: &Runtime) -> Result<NodeId, NodeError> {
    match item {
        Renderable::Instance(instance) => instance.render(runtime),
        Renderable::Text(text) => Ok(runtime.with_surface(|surface| surface.create_text_node(text))),
    }
}
