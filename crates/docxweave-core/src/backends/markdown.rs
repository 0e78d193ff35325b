//! Markdown backend
//!
//! CommonMark with the GitHub extensions for tables and strikethrough.
//! Markdown has no insertion or underline syntax, so those fall back to
//! inline HTML.

use docxweave_ooxml::Comment;

use super::html::escape_html;
use super::{expand_items, mark_item, strip_item_markers};
use crate::renderer::Renderer;

/// Renders semantic calls as Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    annotate_comments: bool,
}

impl MarkdownRenderer {
    /// Create a Markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a footnote-style marker for every comment reference
    pub fn with_comments(mut self, annotate: bool) -> Self {
        self.annotate_comments = annotate;
        self
    }
}

/// Backslash-escape characters with inline meaning
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '|' | '~') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Collapse block output into a single table-cell line
fn cell_line(text: &str) -> String {
    let text = expand_items(text, false);
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Number of cells in a rendered row, ignoring escaped pipes
fn count_cells(row: &str) -> usize {
    let mut count = 0usize;
    let mut escaped = false;
    for c in row.chars() {
        match c {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '|' if !escaped => count += 1,
            _ => {}
        }
        escaped = false;
    }
    count.saturating_sub(1)
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn escape(&self, text: &str) -> String {
        escape_markdown(&strip_item_markers(text))
    }

    fn linebreak(&self) -> String {
        "  \n".to_string()
    }

    fn paragraph(&self, text: &str) -> String {
        format!("{}\n\n", text.trim_end())
    }

    fn insertion(&self, text: &str, _author: &str, _date: &str) -> String {
        format!("<ins>{text}</ins>")
    }

    fn deletion(&self, text: &str, _author: &str, _date: &str) -> String {
        format!("~~{text}~~")
    }

    fn bold(&self, text: &str) -> String {
        format!("**{text}**")
    }

    fn italics(&self, text: &str) -> String {
        format!("*{text}*")
    }

    fn underline(&self, text: &str) -> String {
        format!("<u>{text}</u>")
    }

    fn tab(&self) -> String {
        "&emsp;".to_string()
    }

    fn ordered_list(&self, text: &str) -> String {
        format!("{}\n", expand_items(text, true))
    }

    fn unordered_list(&self, text: &str) -> String {
        format!("{}\n", expand_items(text, false))
    }

    fn list_element(&self, text: &str) -> String {
        mark_item(text)
    }

    fn table(&self, text: &str) -> String {
        let mut lines = text.lines();
        let Some(header) = lines.next() else {
            return String::new();
        };

        let mut out = String::with_capacity(text.len() + 16);
        out.push_str(header);
        out.push('\n');
        out.push('|');
        out.push_str(&"---|".repeat(count_cells(header).max(1)));
        out.push('\n');
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn table_row(&self, text: &str) -> String {
        format!("|{text}\n")
    }

    fn table_cell(&self, text: &str) -> String {
        format!(" {} |", cell_line(text))
    }

    fn comment_reference(&self, comment: &Comment) -> String {
        if !self.annotate_comments {
            return String::new();
        }
        format!(
            "<sup title=\"{}: {}\">[{}]</sup>",
            escape_html(&comment.author),
            escape_html(&comment.text),
            escape_html(&comment.id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("2*3_x|y"), r"2\*3\_x\|y");
    }

    #[test]
    fn test_count_cells_skips_escaped_pipes() {
        assert_eq!(count_cells("| a | b |"), 2);
        assert_eq!(count_cells(r"| a \| b | c |"), 2);
        assert_eq!(count_cells(""), 0);
    }

    #[test]
    fn test_table_gets_header_separator() {
        let r = MarkdownRenderer::new();
        let row1 = r.table_row(&(r.table_cell("a") + &r.table_cell("b")));
        let row2 = r.table_row(&(r.table_cell("c") + &r.table_cell("d")));
        assert_eq!(
            r.table(&(row1 + &row2)),
            "| a | b |\n|---|---|\n| c | d |\n\n"
        );
    }

    #[test]
    fn test_cell_flattens_paragraphs() {
        let r = MarkdownRenderer::new();
        let content = r.paragraph("one") + &r.paragraph("two");
        assert_eq!(r.table_cell(&content), " one<br>two |");
    }

    #[test]
    fn test_lists() {
        let r = MarkdownRenderer::new();
        let items = r.list_element("a") + &r.list_element("b");
        assert_eq!(r.unordered_list(&items), "- a\n- b\n\n");
        assert_eq!(r.ordered_list(&items), "1. a\n2. b\n\n");
    }

    #[test]
    fn test_comment_annotation_is_attribute_safe() {
        let r = MarkdownRenderer::new().with_comments(true);
        let comment = Comment {
            id: "3".to_string(),
            author: "A <b>".to_string(),
            date: String::new(),
            text: "say \"hi\" & go".to_string(),
        };
        assert_eq!(
            r.comment_reference(&comment),
            "<sup title=\"A &lt;b&gt;: say &quot;hi&quot; &amp; go\">[3]</sup>"
        );
    }

    #[test]
    fn test_private_use_marker_in_text_is_escaped_away() {
        let r = MarkdownRenderer::new();
        let para = r.paragraph(&r.escape("x\u{E000}y"));
        assert_eq!(para, "xy\n\n");
    }
}
