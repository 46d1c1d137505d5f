//! Document tree consumed by the converter.
//!
//! Any HTML parser can build this structure (see [`crate::parse_html`] for the
//! bundled one). The converter only ever borrows a tree; it never mutates it.

/// Node kinds, numbered after the DOM `nodeType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node kind
    pub node_type: NodeType,

    /// Upper-case tag name for elements ("DIV"), `#text`, `#comment`, ...
    pub node_name: String,

    /// Content of text and comment nodes
    pub node_value: Option<String>,

    /// Attribute name/value pairs in source order, unique by name
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node with attributes.
    ///
    /// A repeated attribute name keeps the last value.
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style variant of [`Node::add_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase). Non-element nodes yield their `#name`.
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name (case-insensitive)
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Check the whitespace-separated `class` attribute for a class name
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Set an attribute, replacing the value of an existing one
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
        {
            existing.1 = value.to_string();
            return;
        }
        self.attributes.push((name.to_string(), value.to_string()));
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self.children().map(Node::text_content).collect(),
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children().map(Node::subtree_len).sum::<usize>()
    }
}

// Deep trees would overflow the stack with the default recursive drop
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A node together with its parent, when it has one.
///
/// The tree keeps no parent pointers; the walker hands each node to the
/// renderer with the parent it descended from.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a Node>,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    /// Create a new NodeRef with an optional parent
    pub fn with_parent(node: &'a Node, parent: Option<&'a Node>) -> Self {
        Self { node, parent }
    }

    /// Get the parent node if known
    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// Get the parent tag name (lowercase) if known
    pub fn parent_tag(&self) -> Option<String> {
        self.parent.map(Node::tag_name)
    }

    /// Position of this node among the parent's element children named `tag`
    pub fn index_among(&self, tag: &str) -> Option<usize> {
        self.parent?
            .element_children()
            .filter(|sibling| sibling.tag_name() == tag)
            .position(|sibling| std::ptr::eq(sibling, self.node))
    }

    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node.is_text()
    }

    pub fn tag_name(&self) -> String {
        self.node.tag_name()
    }

    pub fn node_value(&self) -> Option<&'a str> {
        self.node.node_value.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node.has_class(class)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children.iter()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children.iter().filter(|n| n.is_element())
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
