//! docxweave-core - DOCX to semantic markup
//!
//! Walks the element tree of a WordprocessingML document and turns it into
//! calls on a [`Renderer`]: paragraphs, runs with bold/italic/underline,
//! tracked insertions and deletions, lists and tables. The renderer decides
//! what the output looks like; HTML, Markdown, plain text and a call trace
//! ship in [`backends`].
//!
//! # Example
//!
//! ```
//! use docxweave_core::{convert, HtmlRenderer, Settings};
//! use docxweave_ooxml::test_utils::{document_xml, para};
//! use std::collections::HashMap;
//!
//! let mut package = HashMap::new();
//! package.insert(
//!     "word/document.xml".to_string(),
//!     document_xml(&para("Hello")).into_bytes(),
//! );
//!
//! let html = convert(&package, &HtmlRenderer::new(), &Settings::default()).unwrap();
//! assert_eq!(html, "<p>Hello</p>");
//! ```

pub mod backends;
pub mod config;
pub mod renderer;
pub mod segment;
pub mod session;
pub mod visitor;

pub use backends::{
    finish, renderer_for, HtmlRenderer, MarkdownRenderer, TextRenderer, TraceRenderer,
};
pub use config::{OutputFormat, Settings, CONFIG_FILE_NAME};
pub use renderer::Renderer;
pub use segment::{segment, ListChunk};
pub use session::{convert, ChunkKind, ChunkSummary, DocumentOutline, ParseOptions, ParseSession};
pub use visitor::{Interpreter, TraversalContext};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
