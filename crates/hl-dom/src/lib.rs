//! DOM tree data structures.
//!
//! Nodes live in a single arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Nodes are never freed: a node taken out of the tree is only
//! detached, so an id keeps naming the same node for the document's lifetime.

use hl_core::HighlightError;
use hl_core::HighlightResult;

/// ID used to address nodes in the DOM arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload: lowercased tag name and attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Sets `name` to `value`, replacing an existing attribute in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value.to_owned();
            return;
        }
        self.attrs.push((name, value.to_owned()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Mutable in-memory document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.create_node(NodeKind::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Comment(data.into()))
    }

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|node| &node.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Live child list. Callers that mutate the tree while walking must copy it first.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> HighlightResult<()> {
        self.check_insertable(parent, child)?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Puts `new_child` into the slot `old_child` occupies under `parent`.
    ///
    /// `old_child` ends up detached; its subtree is left intact.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> HighlightResult<()> {
        self.check_insertable(parent, new_child)?;

        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == old_child)
        else {
            return Err(HighlightError::new(
                "dom.not_a_child",
                format!("node {} is not a child of node {}", old_child.0, parent.0),
            ));
        };

        self.nodes[parent.0].children[index] = new_child;
        self.nodes[new_child.0].parent = Some(parent);
        self.nodes[old_child.0].parent = None;
        Ok(())
    }

    /// Detaches and returns every child of `parent`.
    pub fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return Vec::new();
        };

        let children = std::mem::take(&mut node.children);
        for child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    /// Concatenated text of `id` and its descendants, comments excluded.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            match self.kind(id) {
                Some(NodeKind::Text(text)) => out.push_str(text),
                Some(NodeKind::Document | NodeKind::Element(_)) => {
                    stack.extend(self.children(id).iter().rev());
                }
                Some(NodeKind::Comment(_)) | None => {}
            }
        }
        out
    }

    /// Depth-first search for the first element named `tag` under `from`.
    pub fn find_first_element(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self
                .tag_name(id)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag))
            {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev());
        }

        None
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_first_element(self.root, "body")
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> HighlightResult<()> {
        if !matches!(
            self.kind(parent),
            Some(NodeKind::Document | NodeKind::Element(_))
        ) {
            return Err(HighlightError::new(
                "dom.not_a_container",
                format!("node {} cannot have children", parent.0),
            ));
        }

        if child == self.root || self.kind(child).is_none() {
            return Err(HighlightError::new(
                "dom.invalid_node",
                format!("node {} cannot be inserted", child.0),
            ));
        }

        if self.parent(child).is_some() {
            return Err(HighlightError::new(
                "dom.already_attached",
                format!("node {} already has a parent", child.0),
            ));
        }

        // The parent must not live inside the subtree being inserted. A leaf
        // has no subtree, so only the parent itself can collide with it.
        if self.children(child).is_empty() {
            return if parent == child {
                Err(HighlightError::new(
                    "dom.cycle",
                    format!("inserting node {} would create a cycle", child.0),
                ))
            } else {
                Ok(())
            };
        }

        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(HighlightError::new(
                    "dom.cycle",
                    format!("inserting node {} would create a cycle", child.0),
                ));
            }
            cursor = self.parent(node);
        }

        Ok(())
    }
}
