//! Basic (CommonMark) rules.

use super::{Filter, Rule};
use crate::node::NodeRef;
use crate::utilities::{clean_attribute, collapse_whitespace, escape_markdown, is_container};

/// Create all basic rules, in priority order
pub fn basic_rules() -> Vec<Rule> {
    vec![
        text_rule(escape_markdown),
        comment_rule(),
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
        table_row_rule(),
        table_cell_rule(),
    ]
}

/// Text rule shared by both dialects; only the escaping differs
pub(super) fn text_rule(escape: fn(&str) -> String) -> Rule {
    Rule::for_tag("#text", move |node, _| {
        let text = collapse_whitespace(node.node_value().unwrap_or(""));

        // Indentation between block elements is not content
        let layout_only = text.chars().all(|c| c == ' ')
            && node.parent_tag().map_or(true, |tag| is_container(&tag));
        if layout_only {
            return String::new();
        }

        escape(&text)
    })
}

fn comment_rule() -> Rule {
    Rule::for_tag("#comment", |_, _| String::new())
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", content)
    })
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content| {
        let tag = node.tag_name();
        let level: usize = tag[1..].parse().unwrap_or(1);

        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        format!("\n\n{} {}\n\n", "#".repeat(level), content)
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let mut quoted: Vec<String> = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                if quoted.last().map_or(false, |prev| prev == ">") {
                    continue;
                }
                quoted.push(">".to_string());
            } else {
                quoted.push(format!("> {}", line));
            }
        }
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content| {
        let content = content.trim_end();
        if content.trim().is_empty() {
            return String::new();
        }

        // A list nested in an item hangs off the item's first line
        if node.parent_tag().as_deref() == Some("li") {
            format!("\n{}", content)
        } else {
            format!("\n\n{}\n\n", content)
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content| {
        format!("{}{}\n", list_item_prefix(node), indent_continuation(content))
    })
}

/// `* ` inside `ul`, `N. ` inside `ol` counting from its `start` attribute
pub(super) fn list_item_prefix(node: &NodeRef) -> String {
    let parent = node.parent();
    let ordered = parent.map_or(false, |p| p.tag_name() == "ol");

    if ordered {
        let start: usize = parent
            .and_then(|p| p.attr("start"))
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);
        let index = node.index_among("li").unwrap_or(0);
        format!("{}. ", start + index)
    } else {
        "* ".to_string()
    }
}

/// Trim an item body and indent every following non-empty line by four spaces
pub(super) fn indent_continuation(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut blank_run = 0;

    for (i, line) in content.trim().lines().enumerate() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                result.push('\n');
            }
            continue;
        }
        blank_run = 0;
        if i > 0 {
            result.push('\n');
            result.push_str("    ");
        }
        result.push_str(line);
    }

    result
}

fn indented_code_block_rule() -> Rule {
    Rule::for_tag("pre", |node, _| {
        let code = code_block_text(node);
        if code.trim().is_empty() {
            return String::new();
        }

        let indented: Vec<String> = code
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("    {}", line)
                }
            })
            .collect();

        format!("\n\n{}\n\n", indented.join("\n"))
    })
}

/// Raw text of a code block: the inner `code` element if there is one
pub(super) fn code_block_text(node: &NodeRef) -> String {
    let text = node
        .element_children()
        .find(|c| c.tag_name() == "code")
        .map(|c| c.text_content())
        .unwrap_or_else(|| node.text_content());

    text.trim_end_matches('\n').to_string()
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _| "\n\n* * *\n\n".to_string())
}

fn inline_link_rule() -> Rule {
    Rule::for_tag("a", |node, content| {
        let href = clean_attribute(node.attr("href"));
        let title = node.attr("title");

        if href.is_empty() && title.is_none() {
            return content.to_string();
        }

        let title_part = title
            .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
            .unwrap_or_default();

        format!("[{}]({}{})", content.trim(), href, title_part)
    })
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content| wrap_inline(content, "*"))
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content| wrap_inline(content, "**"))
}

/// Wrap inline content in a delimiter, keeping surrounding spaces outside it
pub(super) fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{}{}{}{}{}", leading, delimiter, trimmed, delimiter, trailing)
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node| {
            // Code inside <pre> belongs to the code block rule
            tag == "code" && node.parent_tag().as_deref() != Some("pre")
        }),
        |node, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }

            // Count backticks needed
            let max_consecutive_backticks = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_consecutive_backticks + 1);

            // Add spacing if content starts/ends with a backtick
            let needs_space = content.starts_with('`') || content.ends_with('`');

            if needs_space {
                format!("{} {} {}", backticks, content, backticks)
            } else {
                format!("{}{}{}", backticks, content, backticks)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        let title = node.attr("title");

        if src.is_empty() {
            return String::new();
        }

        let title_part = title
            .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
            .unwrap_or_default();

        format!("![{}]({}{})", alt, src, title_part)
    })
}

// Without table syntax every row becomes a plain paragraph of its cells
fn table_row_rule() -> Rule {
    Rule::for_tag("tr", |_, content| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", content)
    })
}

fn table_cell_rule() -> Rule {
    Rule::for_tags(&["td", "th"], |_, content| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("{} ", content)
    })
}
