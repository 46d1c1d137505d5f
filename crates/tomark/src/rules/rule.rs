//! Rule and Filter types for node conversion.

use crate::node::NodeRef;

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str) -> String + Send + Sync>;

/// A filter determines which nodes a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(Box<dyn Fn(&str, &NodeRef) -> bool + Send + Sync>),
}

impl Filter {
    /// Create a filter for a single tag (`#text` and `#comment` address non-elements)
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate, called with the lowercase tag name
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node
    pub fn matches(&self, tag: &str, node: &NodeRef) -> bool {
        let tag_lower = tag.to_lowercase();
        match self {
            Filter::TagName(t) => tag_lower == *t,
            Filter::TagNames(tags) => tags.contains(&tag_lower),
            Filter::Predicate(f) => f(&tag_lower, node),
        }
    }
}

/// A rule defines how a matched node becomes Markdown
pub struct Rule {
    /// Filter to determine which nodes this rule applies to
    pub filter: Filter,
    /// Replacement function, called with the node and its converted children
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef, content: &str) -> String {
        (self.replacement)(node, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_tag_filter_is_case_insensitive() {
        let node = Node::element("DEL");
        let node_ref = NodeRef::new(&node);
        assert!(Filter::tag("del").matches("DEL", &node_ref));
        assert!(Filter::tag("DEL").matches("del", &node_ref));
        assert!(Filter::tags(&["s", "Del"]).matches("del", &node_ref));
        assert!(!Filter::tag("s").matches("del", &node_ref));
    }

    #[test]
    fn test_predicate_filter() {
        let node = Node::element_with_attrs("a", vec![("href", "/x")]);
        let filter = Filter::predicate(|tag, node| tag == "a" && node.has_attr("href"));
        assert!(filter.matches("A", &NodeRef::new(&node)));
        assert!(!filter.matches("A", &NodeRef::new(&Node::element("a"))));
    }

    #[test]
    fn test_rule_replace() {
        let rule = Rule::for_tag("mark", |_, content| format!("=={}==", content));
        let node = Node::element("mark");
        assert_eq!(rule.replace(&NodeRef::new(&node), "hi"), "==hi==");
    }
}
