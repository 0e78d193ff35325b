//! Rendering capability interface
//!
//! The interpreter decides *what* a piece of the document is (a bold run, a
//! list item, a table cell) and hands already-composed text to a
//! [`Renderer`], which decides *how* it looks. Every operation takes text
//! and returns text, so wrappers nest by re-wrapping:
//! `underline(italics(bold("x")))`.

use docxweave_ooxml::Comment;

/// Backend that turns semantic calls into markup
///
/// Implementations hold no per-document state; the interpreter calls them
/// through a shared reference.
pub trait Renderer {
    /// Human-readable name of this backend
    fn name(&self) -> &'static str;

    /// Escape raw run text before any wrapping is applied
    fn escape(&self, text: &str) -> String {
        text.to_string()
    }

    /// An empty paragraph or an explicit break
    fn linebreak(&self) -> String;

    /// A block of running text
    fn paragraph(&self, text: &str) -> String;

    /// Tracked insertion
    fn insertion(&self, text: &str, author: &str, date: &str) -> String;

    /// Tracked deletion
    fn deletion(&self, text: &str, author: &str, date: &str) -> String;

    /// Bold text
    fn bold(&self, text: &str) -> String;

    /// Italic text
    fn italics(&self, text: &str) -> String;

    /// Underlined text
    fn underline(&self, text: &str) -> String;

    /// A tab character inside a run
    fn tab(&self) -> String;

    /// Container for numbered list items
    fn ordered_list(&self, text: &str) -> String;

    /// Container for bulleted list items
    fn unordered_list(&self, text: &str) -> String;

    /// A single list item
    fn list_element(&self, text: &str) -> String;

    /// A whole table
    fn table(&self, text: &str) -> String;

    /// One table row
    fn table_row(&self, text: &str) -> String;

    /// One table cell
    fn table_cell(&self, text: &str) -> String;

    /// Output placed where a comment is anchored
    ///
    /// Empty by default; the comment is still resolved so dangling
    /// references are reported.
    fn comment_reference(&self, _comment: &Comment) -> String {
        String::new()
    }
}
