//! HTML parsing support.
//!
//! Parses HTML strings with `scraper` (html5ever) and converts the result to
//! the crate's [`Node`] tree.

use scraper::node::Element;
use scraper::{Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree.
///
/// The root is the fragment's synthetic `html` element, which renders as a
/// transparent container. Entities are decoded and implied elements inserted
/// the way a browser would.
///
/// # Example
///
/// ```rust
/// use tomark::{parse_html, ToMarkService};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
/// let markdown = ToMarkService::new().convert_node(&node).unwrap();
/// assert_eq!(markdown, "# Hello *World*");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let root = document.root_element();

    // Explicit stack of open elements, so nesting depth costs heap, not stack
    let mut open = vec![(element_node(root.value()), root.children())];
    loop {
        let next = open.last_mut().and_then(|(_, children)| children.next());
        let Some(child) = next else {
            let Some((finished, _)) = open.pop() else {
                return Node::element("html");
            };
            match open.last_mut() {
                Some((parent, _)) => parent.add_child(finished),
                None => return finished,
            }
            continue;
        };

        match child.value() {
            ScraperNode::Element(element) => open.push((element_node(element), child.children())),
            ScraperNode::Text(text) => append(&mut open, Node::text(&text.text)),
            ScraperNode::Comment(comment) => append(&mut open, Node::comment(&comment.comment)),
            _ => {}
        }
    }
}

fn element_node(element: &Element) -> Node {
    Node::element_with_attrs(element.name(), element.attrs().collect())
}

fn append<I>(open: &mut [(Node, I)], node: Node) {
    if let Some((parent, _)) = open.last_mut() {
        parent.add_child(node);
    }
}
