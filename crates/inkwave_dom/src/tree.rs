//! Element tree management

use inkwave_core::{NodeId, Rect};
use slotmap::SlotMap;

use crate::element::{Element, InlineStyle};
use crate::error::{DomError, Result};
use crate::listeners::ListenerRegistry;

/// A document: an arena of elements under a single root, plus the global
/// listener registry and the device capabilities of the input surface.
pub struct Document {
    nodes: SlotMap<NodeId, Element>,
    root: NodeId,
    touch_capable: bool,
    listeners: ListenerRegistry,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new("body"));
        Self {
            nodes,
            root,
            touch_capable: false,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Declare whether the input surface delivers touch events
    pub fn with_touch_support(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }

    pub fn touch_capable(&self) -> bool {
        self.touch_capable
    }

    pub fn set_touch_capable(&mut self, touch_capable: bool) {
        self.touch_capable = touch_capable;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Whether the node exists in the arena (attached or not)
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node)
    }

    /// Number of live elements, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Element::new(tag))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let first = self.first_child(parent);
        self.insert_before(parent, child, first)
    }

    /// Insert `child` under `parent` before `reference`, or last if `reference` is `None`.
    ///
    /// A child that already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.element(parent)?;
        self.element(child)?;
        if child == self.root {
            return Err(DomError::RootDetach);
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) || reference == child {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        self.detach(child)?;

        let siblings = &mut self.element_mut(parent)?.children;
        let index = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.element_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        if self.element(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.element_mut(parent)?.children.retain(|&c| c != child);
        self.element_mut(child)?.parent = None;
        Ok(())
    }

    /// Detach a node from whatever parent it has. No-op for detached nodes.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(DomError::RootDetach);
        }
        match self.element(node)?.parent {
            Some(parent) => self.remove_child(parent, node),
            None => Ok(()),
        }
    }

    /// Detach a node and drop it and its whole subtree from the arena
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.detach(node)?;

        let mut stack = vec![node];
        let mut removed = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(element) = self.nodes.remove(id) {
                stack.extend(element.children);
                removed += 1;
            }
        }
        tracing::trace!(?node, removed, "subtree removed");
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|e| e.parent)
    }

    /// Children of a node, empty if the node does not exist
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    /// The node itself followed by each ancestor up to its topmost parent
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.contains(node).then_some(node),
        }
    }

    /// Whether the node is reachable from the root
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == self.root)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|e| e.attribute(name))
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.element_mut(node)?.attributes.remove(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(node).is_some_and(|e| e.has_class(class))
    }

    /// Add a class. Adding a class twice keeps a single entry.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.classes.retain(|c| c.as_str() != class);
        Ok(())
    }

    pub fn style(&self, node: NodeId) -> Option<&InlineStyle> {
        self.nodes.get(node).map(|e| &e.style)
    }

    pub fn set_style(&mut self, node: NodeId, style: InlineStyle) -> Result<()> {
        self.element_mut(node)?.style = style;
        Ok(())
    }

    /// Page-space frame of a node
    pub fn frame(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node).map(|e| e.frame)
    }

    pub fn set_frame(&mut self, node: NodeId, frame: Rect) -> Result<()> {
        self.element_mut(node)?.frame = frame;
        Ok(())
    }

    fn element(&self, node: NodeId) -> Result<&Element> {
        self.nodes.get(node).ok_or(DomError::NodeNotFound(node))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.nodes.get_mut(node).ok_or(DomError::NodeNotFound(node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node and its ancestors, see [`Document::ancestors`]
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.document.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_prepend_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let c = doc.create_element("div");

        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();
        doc.prepend_child(root, c).unwrap();

        assert_eq!(doc.children(root), &[c, a, b]);
        assert_eq!(doc.first_child(root), Some(c));
        assert_eq!(doc.parent(a), Some(root));
    }

    #[test]
    fn test_insert_moves_existing_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();

        doc.append_child(a, b).unwrap();
        assert_eq!(doc.children(root), &[a]);
        assert_eq!(doc.children(a), &[b]);
    }

    #[test]
    fn test_remove_child_rejects_non_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();

        assert_eq!(
            doc.remove_child(a, b),
            Err(DomError::NotAChild {
                parent: a,
                child: b
            })
        );

        doc.remove_child(root, a).unwrap();
        assert_eq!(doc.parent(a), None);
        assert!(doc.contains(a));
        assert!(!doc.is_connected(a));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();
        doc.append_child(a, b).unwrap();

        assert_eq!(
            doc.append_child(b, a),
            Err(DomError::HierarchyCycle {
                parent: b,
                child: a
            })
        );
        assert_eq!(doc.append_child(a, root), Err(DomError::RootDetach));
    }

    #[test]
    fn test_remove_node_drops_subtree() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("span");
        doc.append_child(root, a).unwrap();
        doc.append_child(a, b).unwrap();

        doc.remove_node(a).unwrap();
        assert!(!doc.contains(a));
        assert!(!doc.contains(b));
        assert!(doc.children(root).is_empty());
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.remove_node(root), Err(DomError::RootDetach));
    }

    #[test]
    fn test_ancestors_inclusive() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();
        doc.append_child(a, b).unwrap();

        let chain: Vec<_> = doc.ancestors(b).collect();
        assert_eq!(chain, vec![b, a, root]);

        doc.remove_node(b).unwrap();
        assert_eq!(doc.ancestors(b).count(), 0);
    }

    #[test]
    fn test_attributes_and_classes() {
        let mut doc = Document::new();
        let a = doc.create_element("button");

        doc.set_attribute(a, "data-ink-target", "true").unwrap();
        assert!(doc.has_attribute(a, "data-ink-target"));
        assert_eq!(
            doc.remove_attribute(a, "data-ink-target").unwrap(),
            Some("true".to_string())
        );
        assert!(!doc.has_attribute(a, "data-ink-target"));

        doc.add_class(a, "ink").unwrap();
        doc.add_class(a, "active").unwrap();
        doc.add_class(a, "active").unwrap();
        assert_eq!(doc.get(a).unwrap().class_name(), "ink active");
        doc.remove_class(a, "ink").unwrap();
        assert!(!doc.has_class(a, "ink"));
        assert!(doc.has_class(a, "active"));
    }

    #[test]
    fn test_missing_node_errors() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        doc.remove_node(a).unwrap();

        assert_eq!(doc.add_class(a, "x"), Err(DomError::NodeNotFound(a)));
        assert_eq!(doc.frame(a), None);
        assert!(doc.children(a).is_empty());
    }
}
