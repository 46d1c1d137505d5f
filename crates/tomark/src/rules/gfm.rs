//! GitHub Flavored Markdown rules.
//!
//! These are checked before the basic rules, so they both add constructs
//! (strikethrough, tables, task lists) and override basic ones (text
//! escaping, code blocks).

use super::basic::{code_block_text, indent_continuation, list_item_prefix, text_rule, wrap_inline};
use super::{Filter, Rule};
use crate::node::{Node, NodeRef};
use crate::utilities::{collapse_whitespace, escape_gfm};

/// Create all GFM-only rules, in priority order
pub fn gfm_rules() -> Vec<Rule> {
    vec![
        loose_table_text_rule(),
        text_rule(escape_gfm),
        strikethrough_rule(),
        fenced_code_block_rule(),
        task_list_item_rule(),
        checkbox_rule(),
        table_rule(),
        table_caption_rule(),
        table_row_rule(),
        table_cell_rule(),
    ]
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags(&["del", "s", "strike"], |_, content| wrap_inline(content, "~~"))
}

fn fenced_code_block_rule() -> Rule {
    Rule::for_tag("pre", |node, _| {
        let code = code_block_text(node);
        if code.trim().is_empty() {
            return String::new();
        }
        let language = code_language(node).unwrap_or_default();

        // The fence must be longer than any backtick run in the code
        let longest_run = code
            .split(|c| c != '`')
            .map(str::len)
            .max()
            .unwrap_or(0);
        let fence = "`".repeat(longest_run.max(2) + 1);

        format!("\n\n{}{}\n{}\n{}\n\n", fence, language, code, fence)
    })
}

/// Language from `data-language`, or a `language-*` / `lang-*` class on `pre` or its `code`
fn code_language(node: &NodeRef) -> Option<String> {
    let code = node.element_children().find(|c| c.tag_name() == "code");

    std::iter::once(node.node)
        .chain(code)
        .find_map(|n| {
            n.attr("data-language")
                .map(str::to_string)
                .or_else(|| class_language(n))
        })
        .filter(|lang| !lang.trim().is_empty())
}

fn class_language(node: &Node) -> Option<String> {
    node.attr("class")?.split_whitespace().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .map(str::to_string)
    })
}

fn task_list_item_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node| tag == "li" && task_state(node).is_some()),
        |node, content| {
            let marker = match task_state(node) {
                Some(true) => "[x] ",
                _ => "[ ] ",
            };
            format!(
                "{}{}{}\n",
                list_item_prefix(node),
                marker,
                indent_continuation(content)
            )
        },
    )
}

/// `Some(checked)` for task items: a leading checkbox or the `task-list-item` class
fn task_state(node: &NodeRef) -> Option<bool> {
    let checkbox = node.element_children().next().filter(|first| {
        first.tag_name() == "input"
            && first
                .attr("type")
                .map_or(false, |t| t.eq_ignore_ascii_case("checkbox"))
    });

    if let Some(checkbox) = checkbox {
        return Some(checkbox.has_attr("checked"));
    }
    if node.has_class("task-list-item") {
        return Some(node.has_class("checked"));
    }
    None
}

// Task markers are emitted by the list item
fn checkbox_rule() -> Rule {
    Rule::for_tag("input", |_, _| String::new())
}

fn table_rule() -> Rule {
    Rule::for_tag("table", |node, content| {
        // Only rows start a line with `|`; captions and loose text escape it
        let mut preamble = Vec::new();
        let mut rows = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('|') {
                rows.push(line);
            } else if !line.is_empty() {
                preamble.push(line);
            }
        }

        if rows.is_empty() {
            return format!("\n\n{}\n\n", preamble.join("\n"));
        }

        let columns = table_rows(node.node)
            .into_iter()
            .map(|row| row_cells(row).len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut table = Vec::with_capacity(rows.len() + 2);
        match header_row(node.node) {
            Some(header) => {
                let cells = row_cells(header);
                let padding = "     |".repeat(columns.saturating_sub(cells.len()));
                table.push(format!("{}{}", rows[0], padding));
                table.push(delimiter_row(&cells, columns));
                table.extend(rows[1..].iter().map(|r| r.to_string()));
            }
            None => {
                let cells = table_rows(node.node)
                    .into_iter()
                    .map(row_cells)
                    .find(|cells| !cells.is_empty())
                    .unwrap_or_default();
                table.push(format!("|{}", "     |".repeat(columns)));
                table.push(delimiter_row(&cells, columns));
                table.extend(rows.iter().map(|r| r.to_string()));
            }
        }

        let mut result = String::from("\n\n");
        if !preamble.is_empty() {
            result.push_str(&preamble.join("\n"));
            result.push_str("\n\n");
        }
        result.push_str(&table.join("\n"));
        result.push_str("\n\n");
        result
    })
}

fn table_caption_rule() -> Rule {
    Rule::for_tag("caption", |_, content| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", escape_leading_pipes(content))
    })
}

// Text sitting directly in a table section, outside any cell
fn loose_table_text_rule() -> Rule {
    let filter = Filter::predicate(|tag, node| {
        tag == "#text"
            && node
                .parent_tag()
                .map_or(false, |p| matches!(p.as_str(), "table" | "thead" | "tbody" | "tfoot"))
    });
    Rule::new(filter, |node, _| {
        let text = collapse_whitespace(node.node_value().unwrap_or(""));
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }
        format!("\n\n{}\n\n", escape_leading_pipes(&escape_gfm(text)))
    })
}

fn escape_leading_pipes(text: &str) -> String {
    text.lines()
        .map(|line| {
            let body = line.trim_start();
            if body.starts_with('|') {
                format!("{}\\{}", &line[..line.len() - body.len()], body)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn table_row_rule() -> Rule {
    Rule::for_tag("tr", |node, content| {
        if row_cells(node.node).is_empty() {
            return String::new();
        }
        format!("|{}\n", content)
    })
}

fn table_cell_rule() -> Rule {
    Rule::for_tags(&["td", "th"], |_, content| {
        // A cell has to stay on one line
        let cell = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|");
        format!(" {} |", cell)
    })
}

/// All rows of a table in document order, looking through row groups
fn table_rows(table: &Node) -> Vec<&Node> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        match child.tag_name().as_str() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.element_children().filter(|c| c.tag_name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

/// The row that reads as a header: the first row if it sits in `thead` or has only `th` cells.
///
/// Rows without cells render as nothing, so they never become the header.
fn header_row(table: &Node) -> Option<&Node> {
    let in_thead = table
        .element_children()
        .filter(|c| c.tag_name() == "thead")
        .flat_map(|thead| thead.element_children())
        .find(|c| c.tag_name() == "tr");
    if let Some(row) = in_thead {
        return (!row_cells(row).is_empty()).then_some(row);
    }

    table_rows(table).into_iter().next().filter(|row| {
        let cells = row_cells(row);
        !cells.is_empty() && cells.iter().all(|c| c.tag_name() == "th")
    })
}

fn row_cells(row: &Node) -> Vec<&Node> {
    row.element_children()
        .filter(|c| matches!(c.tag_name().as_str(), "td" | "th"))
        .collect()
}

fn delimiter_row(cells: &[&Node], columns: usize) -> String {
    let mut row = String::from("|");
    for i in 0..columns {
        let marker = match cells.get(i).and_then(|cell| cell_alignment(cell)).as_deref() {
            Some("left") => ":---",
            Some("center") => ":---:",
            Some("right") => "---:",
            _ => "---",
        };
        row.push(' ');
        row.push_str(marker);
        row.push_str(" |");
    }
    row
}

/// `align` attribute, or `text-align` from the inline style
fn cell_alignment(cell: &Node) -> Option<String> {
    if let Some(align) = cell.attr("align") {
        return Some(align.trim().to_lowercase());
    }
    cell.attr("style")?.split(';').find_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        (property.trim().eq_ignore_ascii_case("text-align")).then(|| value.trim().to_lowercase())
    })
}
