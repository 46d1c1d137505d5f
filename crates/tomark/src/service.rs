//! ToMarkService - the main entry point for HTML to Markdown conversion.

use crate::finalize::finalize;
use crate::node::Node;
use crate::rules::{basic_renderer, gfm_renderer, Renderer};
use crate::runner::DomRunner;
use crate::utilities::{escape_gfm, escape_markdown};
use crate::walker::walk;
use crate::Result;

/// Deepest element nesting converted before giving up
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for ToMarkService
#[derive(Debug, Clone)]
pub struct ToMarkOptions {
    /// Emit GitHub Flavored Markdown (strikethrough, tables, task lists,
    /// fenced code). Also selects the default renderer.
    pub gfm: bool,

    /// Maximum tree depth accepted by the walker
    pub max_depth: usize,
}

impl Default for ToMarkOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The main service for converting HTML to Markdown
pub struct ToMarkService {
    options: ToMarkOptions,
    renderer: Option<Box<dyn Renderer + Send + Sync>>,
}

impl ToMarkService {
    /// Create a new ToMarkService with default options
    pub fn new() -> Self {
        Self::with_options(ToMarkOptions::default())
    }

    /// Create a ToMarkService with custom options
    pub fn with_options(options: ToMarkOptions) -> Self {
        Self {
            options,
            renderer: None,
        }
    }

    /// Use `renderer` instead of the built-in variant picked by `gfm`
    pub fn with_renderer<R>(mut self, renderer: R) -> Self
    where
        R: Renderer + Send + Sync + 'static,
    {
        self.set_renderer(renderer);
        self
    }

    /// Replace the renderer in place
    pub fn set_renderer<R>(&mut self, renderer: R) -> &mut Self
    where
        R: Renderer + Send + Sync + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Convert an HTML string to Markdown.
    ///
    /// Empty input yields an empty string without parsing.
    #[cfg(feature = "html")]
    pub fn convert(&self, html: &str) -> Result<String> {
        if html.is_empty() {
            return Ok(String::new());
        }

        let root = crate::html::parse_html(html);
        self.convert_node(&root)
    }

    /// Convert a node tree to Markdown
    pub fn convert_node(&self, node: &Node) -> Result<String> {
        self.run(DomRunner::new(node))
    }

    /// Convert a sequence of sibling trees to one Markdown document
    pub fn convert_nodes(&self, nodes: &[Node]) -> Result<String> {
        self.run(DomRunner::forest(nodes))
    }

    /// The renderer in effect: an explicit one wins over the `gfm` choice
    pub fn renderer(&self) -> &dyn Renderer {
        match &self.renderer {
            Some(renderer) => &**renderer,
            None if self.options.gfm => gfm_renderer(),
            None => basic_renderer(),
        }
    }

    /// Escape Markdown special characters the way text nodes are escaped
    pub fn escape(&self, text: &str) -> String {
        if self.options.gfm {
            escape_gfm(text)
        } else {
            escape_markdown(text)
        }
    }

    /// Get the current options
    pub fn options(&self) -> &ToMarkOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ToMarkOptions {
        &mut self.options
    }

    fn run(&self, mut runner: DomRunner<'_>) -> Result<String> {
        log::debug!(
            "converting with {} renderer (gfm: {})",
            if self.renderer.is_some() { "custom" } else { "built-in" },
            self.options.gfm
        );

        let markdown = walk(&mut runner, self.renderer(), self.options.max_depth)?;
        let result = finalize(&markdown, self.options.gfm);

        log::debug!("rendered {} bytes, {} after cleanup", markdown.len(), result.len());
        Ok(result)
    }
}

impl Default for ToMarkService {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an HTML string with default options (GFM)
#[cfg(feature = "html")]
pub fn to_mark(html: &str) -> Result<String> {
    ToMarkService::new().convert(html)
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::node::NodeRef;
    use crate::rules::{Rule, Rules};

    fn basic() -> ToMarkService {
        ToMarkService::with_options(ToMarkOptions {
            gfm: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_heading() {
        assert_eq!(to_mark("<h1>hello world</h1>").unwrap(), "# hello world");
    }

    #[test]
    fn test_strikethrough_per_dialect() {
        assert_eq!(to_mark("<del>strike</del>").unwrap(), "~~strike~~");
        assert_eq!(basic().convert("<del>strike</del>").unwrap(), "strike");
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(to_mark("<p>a</p><p>b</p>").unwrap(), "a\n\nb");
        assert_eq!(to_mark("<p>a</p>\n  <p>b</p>\n").unwrap(), "a\n\nb");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_mark("").unwrap(), "");
        assert_eq!(basic().convert("").unwrap(), "");
        assert_eq!(to_mark("   ").unwrap(), "");
    }

    #[test]
    fn test_consecutive_breaks_never_stack_blank_lines() {
        for html in [
            "<p>a<br><br><br>b</p>",
            "<p>a<br><br><br><br><br>b</p>",
            "<p>a<br></p><p><br></p><p><br>b</p>",
        ] {
            for service in [ToMarkService::new(), basic()] {
                let markdown = service.convert(html).unwrap();
                assert!(!markdown.contains("\n\n\n"), "{:?} -> {:?}", html, markdown);
                assert!(markdown.starts_with('a') && markdown.ends_with('b'));
            }
        }
        assert_eq!(to_mark("<p>a<br><br><br>b</p>").unwrap(), "a\n\nb");
    }

    #[test]
    fn test_hard_break_per_dialect() {
        assert_eq!(to_mark("<p>a<br>b</p>").unwrap(), "a\nb");
        assert_eq!(basic().convert("<p>a<br>b</p>").unwrap(), "a  \nb");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            to_mark("<p>Hello <strong>World</strong> and <em>you</em></p>").unwrap(),
            "Hello **World** and *you*"
        );
        assert_eq!(
            to_mark(r#"<p><a href="https://example.com">Link</a> <img src="a.png" alt="A"></p>"#)
                .unwrap(),
            "[Link](https://example.com) ![A](a.png)"
        );
        assert_eq!(to_mark("<p>use <code>x*y</code></p>").unwrap(), "use `x*y`");
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            to_mark("<ul><li>One</li><li>Two</li></ul>").unwrap(),
            "* One\n* Two"
        );
        assert_eq!(
            to_mark("<ol>\n  <li>One</li>\n  <li>Two</li>\n</ol>").unwrap(),
            "1. One\n2. Two"
        );
        assert_eq!(
            to_mark("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>").unwrap(),
            "* a\n    * b\n* c"
        );
    }

    #[test]
    fn test_task_list() {
        let html = r#"<ul><li><input type="checkbox" checked>done</li><li><input type="checkbox">todo</li></ul>"#;
        assert_eq!(to_mark(html).unwrap(), "* [x] done\n* [ ] todo");
        assert_eq!(basic().convert(html).unwrap(), "* done\n* todo");
    }

    #[test]
    fn test_code_blocks_per_dialect() {
        let html = r#"<pre><code class="language-rust">fn main() {}
</code></pre>"#;
        assert_eq!(to_mark(html).unwrap(), "```rust\nfn main() {}\n```");
        assert_eq!(basic().convert(html).unwrap(), "    fn main() {}");
    }

    #[test]
    fn test_table_per_dialect() {
        let html = "<table><thead><tr><th>A</th><th>B</th></tr></thead>\
                    <tbody><tr><td>1</td><td>2</td></tr></tbody></table>";
        assert_eq!(to_mark(html).unwrap(), "| A | B |\n| --- | --- |\n| 1 | 2 |");
        assert_eq!(basic().convert(html).unwrap(), "A B\n\n1 2");
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            to_mark("<blockquote><p>Quote</p></blockquote><hr><p>after</p>").unwrap(),
            "> Quote\n\n* * *\n\nafter"
        );
    }

    #[test]
    fn test_unknown_elements_pass_through() {
        assert_eq!(
            to_mark("<section><x-card><p>inside <span>span</span></p></x-card></section>").unwrap(),
            "inside span"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(to_mark("<p>2 * 3 = [six]</p>").unwrap(), "2 \\* 3 = \\[six\\]");
        assert_eq!(basic().convert("<p>~x~</p>").unwrap(), "~x~");
        assert_eq!(to_mark("<p>~x~</p>").unwrap(), "\\~x\\~");
    }

    #[test]
    fn test_explicit_renderer_wins_over_gfm_flag() {
        let service = basic().with_renderer(Rules::gfm());
        assert_eq!(service.convert("<del>strike</del>").unwrap(), "~~strike~~");

        let service = ToMarkService::new().with_renderer(Rules::basic());
        assert_eq!(service.convert("<del>strike</del>").unwrap(), "strike");
    }

    #[test]
    fn test_extended_renderer() {
        let mut rules = Rules::gfm();
        rules.add("mark", Rule::for_tag("mark", |_, content| format!("=={}==", content)));
        let service = ToMarkService::new().with_renderer(rules);
        assert_eq!(service.convert("<p><mark>hi</mark> there</p>").unwrap(), "==hi== there");
    }

    #[test]
    fn test_closure_renderer() {
        let service = ToMarkService::new().with_renderer(|node: &NodeRef<'_>, content: &str| {
            if node.is_text() {
                node.node_value().unwrap_or("").to_uppercase()
            } else {
                format!("{}\n\n", content)
            }
        });
        assert_eq!(service.convert("<p>a</p><p>b</p>").unwrap(), "A\n\nB");
    }

    #[test]
    fn test_convert_nodes() {
        let nodes = vec![
            Node::element("h2").with_child(Node::text("Title")),
            Node::element("p").with_child(Node::text("Body")),
        ];
        assert_eq!(ToMarkService::new().convert_nodes(&nodes).unwrap(), "## Title\n\nBody");
        assert_eq!(ToMarkService::new().convert_nodes(&[]).unwrap(), "");
    }

    #[test]
    fn test_depth_limit_from_options() {
        let html = "<div>".repeat(40) + "x";
        let service = ToMarkService::with_options(ToMarkOptions {
            max_depth: 16,
            ..Default::default()
        });
        assert!(matches!(
            service.convert(&html),
            Err(crate::ToMarkError::DepthLimitExceeded { limit: 16 })
        ));
        assert_eq!(to_mark(&html).unwrap(), "x");
    }

    #[test]
    fn test_deterministic() {
        let html = "<h2>t</h2><ul><li>a</li></ul><table><tr><td>x</td></tr></table>";
        assert_eq!(to_mark(html).unwrap(), to_mark(html).unwrap());
        assert_eq!(basic().convert(html).unwrap(), basic().convert(html).unwrap());
    }

    #[test]
    fn test_output_is_normalized_fixed_point() {
        let inputs = [
            "<h1>t</h1><p>a<br>b</p><p>c</p>",
            "<p>a<br><br><br>b</p><div><p></p><p> </p></div><p>c</p>",
            "<ul><li><p>a</p><p>b</p></li></ul><blockquote><p>q</p><p>r</p></blockquote>",
            "<table><tr><td>1</td></tr></table><pre><code>x\n\ny</code></pre>",
        ];
        for gfm in [true, false] {
            let service = ToMarkService::with_options(ToMarkOptions {
                gfm,
                ..Default::default()
            });
            for html in inputs {
                let markdown = service.convert(html).unwrap();
                assert_eq!(finalize(&markdown, gfm), markdown, "gfm={} html={:?}", gfm, html);
            }
        }
    }

    #[test]
    fn test_escape_follows_dialect() {
        assert_eq!(ToMarkService::new().escape("~*"), "\\~\\*");
        assert_eq!(basic().escape("~*"), "~\\*");
    }

    #[test]
    fn test_options_mut() {
        let mut service = ToMarkService::new();
        service.options_mut().gfm = false;
        assert!(!service.options().gfm);
        assert_eq!(service.convert("<s>x</s>").unwrap(), "x");
    }

    #[test]
    fn test_service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ToMarkService>();

        let service = ToMarkService::new();
        std::thread::scope(|scope| {
            let a = scope.spawn(|| service.convert("<h1>a</h1>").unwrap());
            let b = scope.spawn(|| service.convert("<h1>b</h1>").unwrap());
            assert_eq!(a.join().unwrap(), "# a");
            assert_eq!(b.join().unwrap(), "# b");
        });
    }

    #[test]
    fn test_nesting_far_beyond_limit_is_an_error() {
        let html = "<div>".repeat(10_000) + "x";
        assert!(matches!(
            to_mark(&html),
            Err(crate::ToMarkError::DepthLimitExceeded { limit: DEFAULT_MAX_DEPTH })
        ));
    }

    #[test]
    fn test_table_edge_shapes() {
        assert_eq!(
            to_mark("<table><caption>| x</caption><tr><td>a</td></tr></table>").unwrap(),
            "\\| x\n\n|     |\n| --- |\n| a |"
        );
        assert_eq!(
            to_mark(
                "<table><tr><td>a</td><td>b</td></tr>\
                 <tr><td>1</td><td>2</td><td>3</td></tr></table>"
            )
            .unwrap(),
            "|     |     |     |\n| --- | --- | --- |\n| a | b |\n| 1 | 2 | 3 |"
        );
        assert_eq!(
            to_mark(
                "<table><thead><tr></tr></thead>\
                 <tbody><tr><td>a</td></tr><tr><td>b</td></tr></tbody></table>"
            )
            .unwrap(),
            "|     |\n| --- |\n| a |\n| b |"
        );
    }
}
