//! HTML backend

use std::fmt::Write;

use docxweave_ooxml::Comment;

use crate::renderer::Renderer;

/// Renders semantic calls as an HTML fragment
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    annotate_comments: bool,
}

impl HtmlRenderer {
    /// Create an HTML renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a marker for every comment reference
    pub fn with_comments(mut self, annotate: bool) -> Self {
        self.annotate_comments = annotate;
        self
    }

    /// Wrap a rendered fragment in a complete HTML document
    pub fn standalone(&self, body: &str, title: &str) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
        writeln!(html, "<title>{}</title>", escape_html(title)).unwrap();
        html.push_str("</head>\n<body>\n");
        html.push_str(body);
        html.push_str("\n</body>\n</html>\n");
        html
    }
}

/// Escape the HTML special characters `& < > "`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<ins>`/`<del>` with optional attribution
fn revision(tag: &str, text: &str, author: &str, date: &str) -> String {
    let mut out = format!("<{tag}");
    if !author.is_empty() {
        write!(out, " data-author=\"{}\"", escape_html(author)).unwrap();
    }
    if !date.is_empty() {
        write!(out, " datetime=\"{}\"", escape_html(date)).unwrap();
    }
    write!(out, ">{text}</{tag}>").unwrap();
    out
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn escape(&self, text: &str) -> String {
        escape_html(text)
    }

    fn linebreak(&self) -> String {
        "<br />".to_string()
    }

    fn paragraph(&self, text: &str) -> String {
        format!("<p>{text}</p>")
    }

    fn insertion(&self, text: &str, author: &str, date: &str) -> String {
        revision("ins", text, author, date)
    }

    fn deletion(&self, text: &str, author: &str, date: &str) -> String {
        revision("del", text, author, date)
    }

    fn bold(&self, text: &str) -> String {
        format!("<strong>{text}</strong>")
    }

    fn italics(&self, text: &str) -> String {
        format!("<em>{text}</em>")
    }

    fn underline(&self, text: &str) -> String {
        format!("<u>{text}</u>")
    }

    fn tab(&self) -> String {
        "&emsp;".to_string()
    }

    fn ordered_list(&self, text: &str) -> String {
        format!("<ol>{text}</ol>")
    }

    fn unordered_list(&self, text: &str) -> String {
        format!("<ul>{text}</ul>")
    }

    fn list_element(&self, text: &str) -> String {
        format!("<li>{text}</li>")
    }

    fn table(&self, text: &str) -> String {
        format!("<table>{text}</table>")
    }

    fn table_row(&self, text: &str) -> String {
        format!("<tr>{text}</tr>")
    }

    fn table_cell(&self, text: &str) -> String {
        format!("<td>{text}</td>")
    }

    fn comment_reference(&self, comment: &Comment) -> String {
        if !self.annotate_comments {
            return String::new();
        }
        format!(
            "<span class=\"comment\" data-comment-id=\"{}\" title=\"{}: {}\"></span>",
            escape_html(&comment.id),
            escape_html(&comment.author),
            escape_html(&comment.text)
        )
    }
}
