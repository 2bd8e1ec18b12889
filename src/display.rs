//! Display surface abstraction and the in-memory document.
//!
//! The renderer never touches a concrete UI toolkit. It talks to a
//! [`DisplaySurface`], an id-addressed tree of elements where each element
//! has its own text, an optional color and a set of classes. [`Document`]
//! is the in-memory implementation used by tests, demos and headless hosts;
//! a browser host implements the same trait over the real DOM.

use crate::error::StatsError;
use std::collections::HashMap;

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

/// Everything needed to create one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub id: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub color: Option<String>,
    pub text: String,
}

impl ElementSpec {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            classes: Vec::new(),
            color: None,
            text: String::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// An id-addressed element tree the renderer writes into.
///
/// Creation and lookup are keyed by element id. Ids are unique for the
/// lifetime of the surface and nodes are never removed by the renderer.
pub trait DisplaySurface {
    /// Fetch-or-create: make sure an element with `id` exists.
    ///
    /// A newly created element is a detached top-level container.
    fn ensure(&mut self, id: &str);

    fn contains(&self, id: &str) -> bool;

    /// Number of elements carrying `class`.
    fn count_with_class(&self, class: &str) -> usize;

    /// Create an element and append it as the last child of `parent`.
    ///
    /// Fails with [`StatsError::MissingNode`] when the parent does not
    /// exist and [`StatsError::DuplicateNode`] when the id is taken.
    fn create_child(&mut self, parent: &str, spec: ElementSpec) -> Result<(), StatsError>;

    /// Replace the element's own text (not its children).
    fn set_text(&mut self, id: &str, text: &str) -> Result<(), StatsError>;

    fn set_color(&mut self, id: &str, color: &str) -> Result<(), StatsError>;

    /// Show or hide an element. Hidden elements keep their text.
    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), StatsError>;
}

/// One element of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
    tag: String,
    classes: Vec<String>,
    color: Option<String>,
    text: String,
    visible: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Element {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
}

/// Id → node mapping for every element created on a surface.
///
/// Entries are added on first creation and kept until the surface is
/// dropped, so a node's identity is stable across renders.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    index: HashMap<String, NodeKey>,
}

impl RenderCache {
    pub fn get(&self, id: &str) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Record a node. Returns `false` if the id was already cached.
    fn insert(&mut self, id: &str, key: NodeKey) -> bool {
        if self.index.contains_key(id) {
            return false;
        }
        self.index.insert(id.to_string(), key);
        true
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// In-memory [`DisplaySurface`].
///
/// # Examples
///
/// ```rust
/// use statsheet::display::{DisplaySurface, Document, ElementSpec};
///
/// let mut doc = Document::new();
/// doc.ensure("panel");
/// doc.create_child("panel", ElementSpec::new("row", "p").with_text("Beta:")).unwrap();
/// doc.set_text("row", "Platonic Beta:").unwrap();
///
/// assert_eq!(doc.text("row"), Some("Platonic Beta:"));
/// assert_eq!(doc.children("panel").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Element>,
    cache: RenderCache,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.cache.get(id).map(|key| &self.nodes[key.0])
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(Element::text)
    }

    /// Children of `id` in insertion order. Empty if `id` is unknown.
    pub fn children(&self, id: &str) -> Vec<&Element> {
        match self.element(id) {
            Some(element) => element
                .children
                .iter()
                .map(|key| &self.nodes[key.0])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    fn alloc(&mut self, spec: ElementSpec, parent: Option<NodeKey>) -> Result<NodeKey, StatsError> {
        let key = NodeKey(self.nodes.len());
        if !self.cache.insert(&spec.id, key) {
            return Err(StatsError::DuplicateNode(spec.id));
        }
        self.nodes.push(Element {
            id: spec.id,
            tag: spec.tag,
            classes: spec.classes,
            color: spec.color,
            text: spec.text,
            visible: true,
            parent,
            children: Vec::new(),
        });
        Ok(key)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Element, StatsError> {
        let key = self
            .cache
            .get(id)
            .ok_or_else(|| StatsError::MissingNode(id.to_string()))?;
        Ok(&mut self.nodes[key.0])
    }
}

impl DisplaySurface for Document {
    fn ensure(&mut self, id: &str) {
        if !self.cache.contains(id) {
            // cannot collide: the id was just checked
            let _ = self.alloc(ElementSpec::new(id, "div"), None);
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.cache.contains(id)
    }

    fn count_with_class(&self, class: &str) -> usize {
        self.nodes.iter().filter(|node| node.has_class(class)).count()
    }

    fn create_child(&mut self, parent: &str, spec: ElementSpec) -> Result<(), StatsError> {
        let parent_key = self
            .cache
            .get(parent)
            .ok_or_else(|| StatsError::MissingNode(parent.to_string()))?;
        let child = self.alloc(spec, Some(parent_key))?;
        self.nodes[parent_key.0].children.push(child);
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), StatsError> {
        let node = self.node_mut(id)?;
        if node.text != text {
            node.text = text.to_string();
        }
        Ok(())
    }

    fn set_color(&mut self, id: &str, color: &str) -> Result<(), StatsError> {
        self.node_mut(id)?.color = Some(color.to_string());
        Ok(())
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), StatsError> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_is_idempotent() {
        let mut doc = Document::new();
        doc.ensure("root");
        doc.ensure("root");
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.element("root").unwrap().tag(), "div");
    }

    #[test]
    fn test_create_child_preserves_order() {
        let mut doc = Document::new();
        doc.ensure("root");
        for id in ["a", "b", "c"] {
            doc.create_child("root", ElementSpec::new(id, "p")).unwrap();
        }
        let ids: Vec<&str> = doc.children("root").iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(doc.element("b").unwrap().parent().is_some());
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut doc = Document::new();
        doc.ensure("root");
        doc.create_child("root", ElementSpec::new("x", "p")).unwrap();
        let err = doc.create_child("root", ElementSpec::new("x", "p")).unwrap_err();
        assert_eq!(err, StatsError::DuplicateNode(String::from("x")));
        assert_eq!(doc.children("root").len(), 1);
    }

    #[test]
    fn test_missing_parent_and_node() {
        let mut doc = Document::new();
        let err = doc.create_child("nowhere", ElementSpec::new("x", "p")).unwrap_err();
        assert_eq!(err, StatsError::MissingNode(String::from("nowhere")));
        assert!(doc.set_text("x", "hi").is_err());
        assert!(doc.set_color("x", "red").is_err());
        assert!(doc.set_visible("x", false).is_err());
    }

    #[test]
    fn test_hidden_element_keeps_text() {
        let mut doc = Document::new();
        doc.ensure("root");
        doc.create_child("root", ElementSpec::new("a", "p").with_text("Unlocked"))
            .unwrap();
        assert!(doc.element("a").unwrap().is_visible());

        doc.set_visible("a", false).unwrap();
        let a = doc.element("a").unwrap();
        assert!(!a.is_visible());
        assert_eq!(a.text(), "Unlocked");
    }

    #[test]
    fn test_count_with_class() {
        let mut doc = Document::new();
        doc.ensure("root");
        doc.create_child("root", ElementSpec::new("a", "p").with_class("statPortion").with_class("Cube"))
            .unwrap();
        doc.create_child("root", ElementSpec::new("b", "p").with_class("statPortion"))
            .unwrap();
        assert_eq!(doc.count_with_class("statPortion"), 2);
        assert_eq!(doc.count_with_class("Cube"), 1);
        assert_eq!(doc.count_with_class("Quark"), 0);
    }

    #[test]
    fn test_cache_tracks_every_node() {
        let mut doc = Document::new();
        doc.ensure("root");
        doc.create_child("root", ElementSpec::new("a", "p").with_color("gold"))
            .unwrap();
        assert_eq!(doc.cache().len(), 2);
        assert!(doc.cache().contains("a"));
        assert_eq!(doc.element("a").unwrap().color(), Some("gold"));
    }
}
