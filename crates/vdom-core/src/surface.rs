//! Boundary to the live display tree.
//!
//! The runtime never touches a document directly. Everything it needs from the
//! host (creating nodes, swapping children, wiring listeners) goes through the
//! [`Surface`] trait, which keeps the engine usable against a browser binding,
//! a terminal backend or the in-memory [`MemorySurface`] used by tests.

use std::cell::RefCell;
use std::fmt::Write as _;

use crate::props::Callback;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("node {id} missing")]
    Missing { id: NodeId },
    #[error("node {id} is not an element")]
    NotAnElement { id: NodeId },
}

/// Display-tree primitives consumed by the reconciler.
pub trait Surface {
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn create_text_node(&mut self, text: &str) -> NodeId;

    /// Replace every child of `parent` with `children`, in order, as one operation.
    fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), NodeError>;

    fn add_event_listener(
        &mut self,
        element: NodeId,
        event: &str,
        handler: &Callback,
    ) -> Result<(), NodeError>;

    fn remove_event_listener(
        &mut self,
        element: NodeId,
        event: &str,
        handler: &Callback,
    ) -> Result<(), NodeError>;

    fn set_class_attribute(&mut self, element: NodeId, class: &str) -> Result<(), NodeError>;
}

/// Operation recorded by [`MemorySurface`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    CreateElement { id: NodeId, tag: String },
    CreateText { id: NodeId, text: String },
    ReplaceChildren { parent: NodeId, children: Vec<NodeId> },
    AddListener { element: NodeId, event: String },
    RemoveListener { element: NodeId, event: String },
    SetClass { element: NodeId, class: String },
}

struct MemoryElement {
    tag: String,
    class: String,
    children: Vec<NodeId>,
    listeners: Vec<(String, Callback)>,
}

enum MemoryNode {
    Element(MemoryElement),
    Text(String),
}

/// In-memory document tree.
///
/// Every pass creates fresh text nodes, so `replace_children` releases the
/// text children it displaces and later nodes reuse their ids. Elements are
/// kept: primitives hold on to theirs across passes.
#[derive(Default)]
pub struct MemorySurface {
    nodes: Vec<Option<MemoryNode>>,
    free: Vec<NodeId>,
    ops: Vec<SurfaceOp>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every listener registered for `event` on `node`.
    ///
    /// Takes the surrounding `RefCell` so the borrow is released before any
    /// handler runs; handlers are free to call state setters.
    pub fn dispatch(this: &RefCell<Self>, node: NodeId, event: &str) -> Result<usize, NodeError> {
        let handlers = this.borrow().listeners(node, event)?;
        for handler in &handlers {
            handler.call();
        }
        Ok(handlers.len())
    }

    /// Live nodes, released text nodes excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn count_ops(&self, pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn tag(&self, id: NodeId) -> Result<&str, NodeError> {
        Ok(&self.element(id)?.tag)
    }

    pub fn class_attribute(&self, id: NodeId) -> Result<&str, NodeError> {
        Ok(&self.element(id)?.class)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], NodeError> {
        Ok(&self.element(id)?.children)
    }

    pub fn listeners(&self, id: NodeId, event: &str) -> Result<Vec<Callback>, NodeError> {
        Ok(self
            .element(id)?
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, handler)| handler.clone())
            .collect())
    }

    pub fn listener_count(&self, id: NodeId) -> Result<usize, NodeError> {
        Ok(self.element(id)?.listeners.len())
    }

    /// Concatenated text of every text node below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> Result<String, NodeError> {
        let mut output = String::new();
        self.collect_text(id, &mut output)?;
        Ok(output)
    }

    pub fn to_html(&self, id: NodeId) -> Result<String, NodeError> {
        let mut output = String::new();
        self.write_html(id, &mut output)?;
        Ok(output)
    }

    /// Elements below `root` (inclusive) whose tag is `tag`, depth first.
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Result<Vec<NodeId>, NodeError> {
        let mut found = Vec::new();
        self.collect_tag(root, tag, &mut found)?;
        Ok(found)
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode, NodeError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(NodeError::Missing { id })
    }

    fn element(&self, id: NodeId) -> Result<&MemoryElement, NodeError> {
        match self.node(id)? {
            MemoryNode::Element(element) => Ok(element),
            MemoryNode::Text(_) => Err(NodeError::NotAnElement { id }),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut MemoryElement, NodeError> {
        match self
            .nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(NodeError::Missing { id })?
        {
            MemoryNode::Element(element) => Ok(element),
            MemoryNode::Text(_) => Err(NodeError::NotAnElement { id }),
        }
    }

    fn push(&mut self, node: MemoryNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            return id;
        }
        self.nodes.push(Some(node));
        self.nodes.len() - 1
    }

    /// Drop a text node that is no longer anyone's child.
    fn release_text(&mut self, id: NodeId) {
        if let Some(slot) = self.nodes.get_mut(id) {
            if matches!(slot, Some(MemoryNode::Text(_))) {
                *slot = None;
                self.free.push(id);
            }
        }
    }

    fn collect_text(&self, id: NodeId, output: &mut String) -> Result<(), NodeError> {
        match self.node(id)? {
            MemoryNode::Text(text) => output.push_str(text),
            MemoryNode::Element(element) => {
                for &child in &element.children {
                    self.collect_text(child, output)?;
                }
            }
        }
        Ok(())
    }

    fn collect_tag(&self, id: NodeId, tag: &str, found: &mut Vec<NodeId>) -> Result<(), NodeError> {
        if let MemoryNode::Element(element) = self.node(id)? {
            if element.tag == tag {
                found.push(id);
            }
            for &child in &element.children {
                self.collect_tag(child, tag, found)?;
            }
        }
        Ok(())
    }

    fn write_html(&self, id: NodeId, output: &mut String) -> Result<(), NodeError> {
        match self.node(id)? {
            MemoryNode::Text(text) => output.push_str(&escape(text)),
            MemoryNode::Element(element) => {
                output.push('<');
                output.push_str(&element.tag);
                if !element.class.is_empty() {
                    let _ = write!(output, " class=\"{}\"", escape(&element.class));
                }
                output.push('>');
                for &child in &element.children {
                    self.write_html(child, output)?;
                }
                let _ = write!(output, "</{}>", element.tag);
            }
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Surface for MemorySurface {
    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.push(MemoryNode::Element(MemoryElement {
            tag: tag.to_owned(),
            class: String::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        }));
        self.ops.push(SurfaceOp::CreateElement {
            id,
            tag: tag.to_owned(),
        });
        id
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        let id = self.push(MemoryNode::Text(text.to_owned()));
        self.ops.push(SurfaceOp::CreateText {
            id,
            text: text.to_owned(),
        });
        id
    }

    fn replace_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), NodeError> {
        if let Some(&missing) = children.iter().find(|&&child| self.node(child).is_err()) {
            return Err(NodeError::Missing { id: missing });
        }
        let previous = std::mem::replace(&mut self.element_mut(parent)?.children, children.to_vec());
        for old in previous {
            if !children.contains(&old) {
                self.release_text(old);
            }
        }
        self.ops.push(SurfaceOp::ReplaceChildren {
            parent,
            children: children.to_vec(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        element: NodeId,
        event: &str,
        handler: &Callback,
    ) -> Result<(), NodeError> {
        let target = self.element_mut(element)?;
        // Registering the same handler twice for one event is a no-op, as in the DOM.
        if !target
            .listeners
            .iter()
            .any(|(name, existing)| name == event && existing == handler)
        {
            target.listeners.push((event.to_owned(), handler.clone()));
        }
        self.ops.push(SurfaceOp::AddListener {
            element,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        element: NodeId,
        event: &str,
        handler: &Callback,
    ) -> Result<(), NodeError> {
        self.element_mut(element)?
            .listeners
            .retain(|(name, existing)| !(name == event && existing == handler));
        self.ops.push(SurfaceOp::RemoveListener {
            element,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn set_class_attribute(&mut self, element: NodeId, class: &str) -> Result<(), NodeError> {
        self.element_mut(element)?.class = class.to_owned();
        self.ops.push(SurfaceOp::SetClass {
            element,
            class: class.to_owned(),
        });
        Ok(())
    }
}
