//! Output backends
//!
//! Each backend implements [`Renderer`] for one markup language. The core
//! never depends on a concrete backend; [`renderer_for`] picks one from the
//! configured output format.

pub mod html;
pub mod markdown;
pub mod text;
pub mod trace;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
pub use text::TextRenderer;
pub use trace::TraceRenderer;

use crate::config::{OutputFormat, Settings};
use crate::renderer::Renderer;

/// Prefix of a list item awaiting its container, from the private use area
const ITEM_MARKER: char = '\u{E000}';

/// Render a list item whose bullet is decided by the enclosing list
pub(crate) fn mark_item(text: &str) -> String {
    format!("{ITEM_MARKER}{}\n", text.trim_end())
}

/// Drop item markers from document text so only renderer output carries them
pub(crate) fn strip_item_markers(text: &str) -> String {
    text.replace(ITEM_MARKER, "")
}

/// Replace item markers with bullets or sequential numbers
pub(crate) fn expand_items(text: &str, ordered: bool) -> String {
    let mut pieces = text.split(ITEM_MARKER);
    let mut out = String::with_capacity(text.len() + 8);
    if let Some(leading) = pieces.next() {
        out.push_str(leading);
    }
    for (n, item) in pieces.enumerate() {
        if ordered {
            out.push_str(&format!("{}. ", n + 1));
        } else {
            out.push_str("- ");
        }
        out.push_str(item);
    }
    out
}

/// Build the backend selected by the settings
pub fn renderer_for(settings: &Settings) -> Box<dyn Renderer> {
    let annotate = settings.comments.annotate;
    match settings.output.format {
        OutputFormat::Html => Box::new(HtmlRenderer::new().with_comments(annotate)),
        OutputFormat::Markdown => Box::new(MarkdownRenderer::new().with_comments(annotate)),
        OutputFormat::Text => Box::new(TextRenderer::new()),
        OutputFormat::Trace => Box::new(TraceRenderer::new()),
    }
}

/// Apply document-level framing to rendered output
///
/// Only HTML has any: with `standalone` set the fragment is wrapped in a
/// full document titled `title`.
pub fn finish(settings: &Settings, body: String, title: &str) -> String {
    match settings.output.format {
        OutputFormat::Html if settings.output.standalone => {
            HtmlRenderer::new().standalone(&body, title)
        }
        _ => body,
    }
}
