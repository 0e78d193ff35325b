//! Plain-text backend
//!
//! Produces the document as it reads with all tracked changes accepted:
//! insertions are kept, deletions dropped, formatting discarded.

use super::{expand_items, mark_item, strip_item_markers};
use crate::renderer::Renderer;

/// Renders semantic calls as plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Create a plain-text renderer
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn escape(&self, text: &str) -> String {
        strip_item_markers(text)
    }

    fn linebreak(&self) -> String {
        "\n".to_string()
    }

    fn paragraph(&self, text: &str) -> String {
        format!("{text}\n")
    }

    fn insertion(&self, text: &str, _author: &str, _date: &str) -> String {
        text.to_string()
    }

    fn deletion(&self, _text: &str, _author: &str, _date: &str) -> String {
        String::new()
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn italics(&self, text: &str) -> String {
        text.to_string()
    }

    fn underline(&self, text: &str) -> String {
        text.to_string()
    }

    fn tab(&self) -> String {
        "\t".to_string()
    }

    fn ordered_list(&self, text: &str) -> String {
        expand_items(text, true)
    }

    fn unordered_list(&self, text: &str) -> String {
        expand_items(text, false)
    }

    fn list_element(&self, text: &str) -> String {
        mark_item(text)
    }

    fn table(&self, text: &str) -> String {
        format!("{text}\n")
    }

    fn table_row(&self, text: &str) -> String {
        format!("{}\n", text.trim_end_matches('\t'))
    }

    fn table_cell(&self, text: &str) -> String {
        let text = expand_items(text, false);
        format!("{}\t", text.trim().replace('\n', " "))
    }
}
