//! Rule tables that turn single nodes into Markdown fragments.
//!
//! A [`Renderer`] sees one node at a time together with the already converted
//! Markdown of its children. [`Rules`] is the built-in implementation: an
//! ordered list of [`Rule`]s where the first matching filter wins and an
//! unmatched node passes its children's Markdown through unchanged.

mod basic;
mod gfm;
mod rule;

pub use basic::basic_rules;
pub use gfm::gfm_rules;
pub use rule::{Filter, ReplacementFn, Rule};

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::node::NodeRef;

static BASIC: Lazy<Rules> = Lazy::new(Rules::basic);
static GFM: Lazy<Rules> = Lazy::new(Rules::gfm);

/// Converts one node, given the Markdown of its children.
///
/// Implementations must be pure: the same node and content always give the
/// same fragment. Closures of the right shape are renderers too.
pub trait Renderer {
    fn convert(&self, node: &NodeRef<'_>, content: &str) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&NodeRef<'_>, &str) -> String,
{
    fn convert(&self, node: &NodeRef<'_>, content: &str) -> String {
        self(node, content)
    }
}

/// Shared basic (CommonMark) rule table
pub fn basic_renderer() -> &'static Rules {
    &BASIC
}

/// Shared GFM rule table
pub fn gfm_renderer() -> &'static Rules {
    &GFM
}

/// Ordered collection of rules
pub struct Rules {
    /// Rules added by the user (checked first)
    custom_rules: IndexMap<String, Rule>,
    /// Built-in rules, in priority order
    rules: Vec<Rule>,
}

impl Rules {
    /// Create a table from rules in priority order
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self {
            custom_rules: IndexMap::new(),
            rules,
        }
    }

    /// The basic dialect: no strikethrough, tables, task lists or fences
    pub fn basic() -> Self {
        Self::from_rules(basic_rules())
    }

    /// GitHub Flavored Markdown: GFM rules first, basic rules underneath
    pub fn gfm() -> Self {
        let mut rules = gfm_rules();
        rules.extend(basic_rules());
        Self::from_rules(rules)
    }

    /// Add a named rule checked before the built-in ones.
    ///
    /// Adding a rule under an existing key replaces it.
    pub fn add(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.custom_rules.insert(key.to_string(), rule);
        self
    }

    /// Find the rule for a node
    pub fn for_node<'a>(&'a self, node: &NodeRef) -> Option<&'a Rule> {
        let tag = node.tag_name();

        self.custom_rules
            .values()
            .chain(self.rules.iter())
            .find(|rule| rule.filter.matches(&tag, node))
    }
}

impl Renderer for Rules {
    fn convert(&self, node: &NodeRef<'_>, content: &str) -> String {
        match self.for_node(node) {
            Some(rule) => rule.replace(node, content),
            None => content.to_string(),
        }
    }
}
