//! Utility functions and constants for HTML processing.

/// Elements whose whitespace-only text children are source formatting, not content
pub const CONTAINER_ELEMENTS: &[&str] = &[
    "article", "aside", "blockquote", "body", "dl", "div", "fieldset", "figure",
    "footer", "form", "header", "html", "main", "nav", "ol", "section", "table",
    "tbody", "tfoot", "thead", "tr", "ul",
];

/// Check if a tag only groups block content
pub fn is_container(tag: &str) -> bool {
    CONTAINER_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Escape Markdown special characters for the basic dialect
pub fn escape_markdown(text: &str) -> String {
    escape(text, &[])
}

/// Escape Markdown special characters for GFM, which adds `~` strikethrough
pub fn escape_gfm(text: &str) -> String {
    escape(text, &['~'])
}

fn escape(text: &str, extra: &[char]) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    let mut at_start = true;

    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            // Block markers only matter where a line could start
            '#' | '>' | '+' | '-' if at_start => {
                result.push('\\');
                result.push(c);
            }
            c if extra.contains(&c) => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
        if !c.is_whitespace() {
            at_start = false;
        }
    }

    escape_ordered_marker(result)
}

/// `1. text` at the start would turn into a list item
fn escape_ordered_marker(mut text: String) -> String {
    let start = text.len() - text.trim_start().len();
    let digits = text[start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits > 0 && text[start + digits..].starts_with('.') {
        text.insert(start + digits, '\\');
    }
    text
}

/// Collapse runs of ASCII whitespace into single spaces.
///
/// Non-breaking spaces are content and are left alone.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("*test*"), "\\*test\\*");
        assert_eq!(escape_markdown("_test_"), "\\_test\\_");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("normal"), "normal");
        assert_eq!(escape_markdown("hello world"), "hello world");
    }

    #[test]
    fn test_escape_block_markers_only_at_start() {
        assert_eq!(escape_markdown("# title"), "\\# title");
        assert_eq!(escape_markdown("  - item"), "  \\- item");
        assert_eq!(escape_markdown("> quote"), "\\> quote");
        assert_eq!(escape_markdown("a-b # c > d"), "a-b # c > d");
    }

    #[test]
    fn test_escape_ordered_marker() {
        assert_eq!(escape_markdown("1. item"), "1\\. item");
        assert_eq!(escape_markdown("2024 was"), "2024 was");
        assert_eq!(escape_markdown("v1.2"), "v1.2");
    }

    #[test]
    fn test_escape_gfm_strikethrough() {
        assert_eq!(escape_gfm("~~no~~"), "\\~\\~no\\~\\~");
        assert_eq!(escape_markdown("~~no~~"), "~~no~~");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n  "), " ");
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_clean_attribute() {
        assert_eq!(clean_attribute(Some("  x.png ")), "x.png");
        assert_eq!(clean_attribute(Some("   ")), "");
        assert_eq!(clean_attribute(None), "");
    }

    #[test]
    fn test_is_container() {
        assert!(is_container("div"));
        assert!(is_container("UL"));
        assert!(!is_container("p"));
        assert!(!is_container("span"));
    }
}
