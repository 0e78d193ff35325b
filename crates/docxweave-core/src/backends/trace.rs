//! Call-trace backend
//!
//! Renders every call as `name(args)`, exposing the exact nesting the
//! interpreter produced. Useful when debugging a document and for asserting
//! call structure in tests.

use docxweave_ooxml::Comment;

use crate::renderer::Renderer;

/// Renders semantic calls in function-call notation
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRenderer;

impl TraceRenderer {
    /// Create a trace renderer
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TraceRenderer {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn linebreak(&self) -> String {
        "linebreak()".to_string()
    }

    fn paragraph(&self, text: &str) -> String {
        format!("paragraph({text})")
    }

    fn insertion(&self, text: &str, author: &str, date: &str) -> String {
        format!("insertion({text}, {author}, {date})")
    }

    fn deletion(&self, text: &str, author: &str, date: &str) -> String {
        format!("deletion({text}, {author}, {date})")
    }

    fn bold(&self, text: &str) -> String {
        format!("bold({text})")
    }

    fn italics(&self, text: &str) -> String {
        format!("italics({text})")
    }

    fn underline(&self, text: &str) -> String {
        format!("underline({text})")
    }

    fn tab(&self) -> String {
        "tab()".to_string()
    }

    fn ordered_list(&self, text: &str) -> String {
        format!("orderedList({text})")
    }

    fn unordered_list(&self, text: &str) -> String {
        format!("unorderedList({text})")
    }

    fn list_element(&self, text: &str) -> String {
        format!("listElement({text})")
    }

    fn table(&self, text: &str) -> String {
        format!("table({text})")
    }

    fn table_row(&self, text: &str) -> String {
        format!("tableRow({text})")
    }

    fn table_cell(&self, text: &str) -> String {
        format!("tableCell({text})")
    }

    fn comment_reference(&self, comment: &Comment) -> String {
        format!("comment({}, {})", comment.id, comment.author)
    }
}
