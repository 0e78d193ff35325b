//! Parse session
//!
//! One session converts one document. It owns the element tree and the
//! resolvers built from the package, segments the top-level paragraphs and
//! interprets each chunk in document order. Rendering consumes the session.

use serde::Serialize;
use tracing::{debug, info};

use docxweave_ooxml::{
    strip_namespaces, CommentResolver, NodeTree, Numbering, PackageReader, Result, COMMENTS_PART,
    DOCUMENT_PART, NUMBERING_PART,
};

use crate::config::Settings;
use crate::renderer::Renderer;
use crate::segment::{document_paragraphs, paragraph_list_style, segment, ListChunk};
use crate::visitor::{Interpreter, TraversalContext};

/// Options that change what the interpreter emits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Pass revision author/date to insertion and deletion calls
    pub revision_metadata: bool,
}

impl From<&Settings> for ParseOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            revision_metadata: settings.revisions.metadata,
        }
    }
}

/// State for converting a single document
pub struct ParseSession<'r> {
    tree: NodeTree,
    numbering: Numbering,
    comments: CommentResolver,
    renderer: &'r dyn Renderer,
    options: ParseOptions,
}

impl<'r> ParseSession<'r> {
    /// Load the document, numbering and comments parts from a package
    ///
    /// Fails if `word/document.xml` is absent or any loaded part is not
    /// well-formed. The comments part is only parsed on first use.
    pub fn from_package<P>(package: &P, renderer: &'r dyn Renderer, options: ParseOptions) -> Result<Self>
    where
        P: PackageReader + ?Sized,
    {
        let document = package.require_part(DOCUMENT_PART)?;
        Self::from_parts(
            document,
            package.read_part(NUMBERING_PART),
            package.read_part(COMMENTS_PART),
            renderer,
            options,
        )
    }

    /// Build a session from raw part bytes
    pub fn from_parts(
        document: &[u8],
        numbering: Option<&[u8]>,
        comments: Option<&[u8]>,
        renderer: &'r dyn Renderer,
        options: ParseOptions,
    ) -> Result<Self> {
        let tree = NodeTree::parse(&strip_namespaces(document, DOCUMENT_PART)?, DOCUMENT_PART)?;
        debug!("Built document tree with {} elements", tree.len());

        let numbering = match numbering {
            Some(xml) => {
                let numbering_tree =
                    NodeTree::parse(&strip_namespaces(xml, NUMBERING_PART)?, NUMBERING_PART)?;
                Numbering::from_tree(&numbering_tree)
            }
            None => {
                debug!("Package has no numbering part");
                Numbering::unavailable()
            }
        };

        Ok(Self {
            tree,
            numbering,
            comments: CommentResolver::new(comments.map(<[u8]>::to_vec)),
            renderer,
            options,
        })
    }

    /// The document element tree
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Segment the document's top-level paragraphs
    ///
    /// Paragraphs inside a table never join a list chunk here; their lists
    /// are segmented per cell when the table is rendered.
    pub fn chunks(&self) -> Result<Vec<ListChunk>> {
        let paragraphs = document_paragraphs(&self.tree);
        segment(&paragraphs, |p| {
            if self.tree.closest_ancestor(p, "tbl").is_some() {
                return Ok(None);
            }
            paragraph_list_style(&self.tree, &self.numbering, p)
        })
    }

    /// Summarize how the document segments, without rendering
    pub fn outline(&self) -> Result<DocumentOutline> {
        let chunks = self.chunks()?;
        let paragraphs = chunks.iter().map(|c| c.paragraphs.len()).sum();
        let tables = self.tree.descendants_named(self.tree.root(), "tbl").count();

        Ok(DocumentOutline {
            has_numbering: self.numbering.is_available(),
            has_comments: self.comments.is_available(),
            paragraphs,
            tables,
            chunks: chunks
                .iter()
                .enumerate()
                .map(|(index, chunk)| ChunkSummary::new(index, chunk))
                .collect(),
        })
    }

    /// Render the whole document
    pub fn render(self) -> Result<String> {
        let chunks = self.chunks()?;
        let interpreter =
            Interpreter::new(&self.tree, &self.numbering, &self.comments, self.renderer)
                .with_revision_metadata(self.options.revision_metadata);
        let mut ctx = TraversalContext::new();
        let mut output = String::new();

        for chunk in &chunks {
            ctx.begin_chunk();
            output.push_str(&interpreter.interpret_chunk(chunk, &mut ctx)?);
        }

        info!(
            "Rendered {} chunks ({} tables) with the {} backend",
            chunks.len(),
            ctx.tables_emitted(),
            self.renderer.name()
        );
        Ok(output)
    }
}

/// Convert a package with the given backend
pub fn convert<P>(package: &P, renderer: &dyn Renderer, settings: &Settings) -> Result<String>
where
    P: PackageReader + ?Sized,
{
    ParseSession::from_package(package, renderer, ParseOptions::from(settings))?.render()
}

/// Segmentation summary of a document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutline {
    /// Package carries `word/numbering.xml`
    pub has_numbering: bool,
    /// Package carries `word/comments.xml`
    pub has_comments: bool,
    /// Top-level paragraphs
    pub paragraphs: usize,
    /// Table elements, nested ones included
    pub tables: usize,
    /// Chunks in document order
    pub chunks: Vec<ChunkSummary>,
}

/// How a chunk renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Plain paragraphs
    Paragraphs,
    /// Numbered list
    OrderedList,
    /// Bulleted list
    UnorderedList,
}

/// One chunk of a [`DocumentOutline`]
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    /// Position in document order
    pub index: usize,
    /// Rendering kind
    pub kind: ChunkKind,
    /// Member paragraph count
    pub paragraphs: usize,
    /// Numbering id that opened the list
    pub num_id: Option<String>,
    /// Number format of the list
    pub format: Option<String>,
}

impl ChunkSummary {
    fn new(index: usize, chunk: &ListChunk) -> Self {
        let kind = match &chunk.style {
            Some(style) if style.format.is_bullet() => ChunkKind::UnorderedList,
            Some(_) => ChunkKind::OrderedList,
            None => ChunkKind::Paragraphs,
        };
        Self {
            index,
            kind,
            paragraphs: chunk.paragraphs.len(),
            num_id: chunk.style.as_ref().map(|s| s.num_id.clone()),
            format: chunk.style.as_ref().map(|s| s.format.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::TraceRenderer;
    use docxweave_ooxml::test_utils::{document_xml, list_para, numbering_xml, para};
    use docxweave_ooxml::OoxmlError;
    use std::collections::HashMap;

    fn render(body: &str, numbering: Option<&str>) -> Result<String> {
        let renderer = TraceRenderer::new();
        let document = document_xml(body);
        ParseSession::from_parts(
            document.as_bytes(),
            numbering.map(str::as_bytes),
            None,
            &renderer,
            ParseOptions::default(),
        )?
        .render()
    }

    #[test]
    fn test_bullets_then_paragraph() {
        let body = format!("{}{}{}", list_para(1, "one"), list_para(1, "two"), para("three"));
        let out = render(&body, Some(&numbering_xml(&[(1, 0, "bullet")]))).unwrap();
        assert_eq!(
            out,
            "unorderedList(listElement(one)listElement(two))paragraph(three)"
        );
    }

    #[test]
    fn test_style_change_splits_lists() {
        let body = format!(
            "{}{}{}{}{}",
            para("a"),
            list_para(1, "b"),
            list_para(1, "c"),
            list_para(2, "d"),
            para("e")
        );
        let numbering = numbering_xml(&[(1, 0, "bullet"), (2, 1, "decimal")]);
        let out = render(&body, Some(&numbering)).unwrap();
        assert_eq!(
            out,
            "paragraph(a)\
             unorderedList(listElement(b)listElement(c))\
             orderedList(listElement(d))\
             paragraph(e)"
        );
    }

    #[test]
    fn test_table_between_paragraphs() {
        let body = format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            para("before"),
            para("x"),
            para("y"),
            para("after")
        );
        let out = render(&body, None).unwrap();
        assert_eq!(
            out,
            "paragraph(before)\
             table(tableRow(tableCell(paragraph(x))tableCell(paragraph(y))))\
             paragraph(after)"
        );
    }

    #[test]
    fn test_list_before_table_with_same_style() {
        let body = format!(
            "{}{}<w:tbl><w:tr><w:tc>{}{}</w:tc></w:tr></w:tbl>",
            list_para(1, "a"),
            list_para(1, "b"),
            list_para(1, "c"),
            para("d")
        );
        let out = render(&body, Some(&numbering_xml(&[(1, 0, "bullet")]))).unwrap();
        assert_eq!(
            out,
            "unorderedList(listElement(a)listElement(b))\
             table(tableRow(tableCell(unorderedList(listElement(c))paragraph(d))))"
        );
    }

    #[test]
    fn test_list_without_numbering_part_fails() {
        let result = render(&list_para(1, "x"), None);
        assert!(matches!(result, Err(OoxmlError::StyleNotFound(_))));
    }

    #[test]
    fn test_malformed_document() {
        let renderer = TraceRenderer::new();
        let result = ParseSession::from_parts(
            b"<w:document><w:body>",
            None,
            None,
            &renderer,
            ParseOptions::default(),
        );
        assert!(matches!(result, Err(OoxmlError::MalformedDocument { .. })));
    }

    #[test]
    fn test_missing_document_part() {
        let renderer = TraceRenderer::new();
        let package: HashMap<String, Vec<u8>> = HashMap::new();
        let result = ParseSession::from_package(&package, &renderer, ParseOptions::default());
        assert!(matches!(result, Err(OoxmlError::PartMissing(_))));
    }

    #[test]
    fn test_malformed_comments_only_fail_when_used() {
        let renderer = TraceRenderer::new();
        let document = document_xml(&para("no comments referenced"));
        let session = ParseSession::from_parts(
            document.as_bytes(),
            None,
            Some(b"<not-closed>"),
            &renderer,
            ParseOptions::default(),
        )
        .unwrap();
        assert_eq!(session.render().unwrap(), "paragraph(no comments referenced)");
    }

    #[test]
    fn test_outline() {
        let body = format!(
            "{}{}{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>",
            list_para(1, "a"),
            list_para(1, "b"),
            para("c"),
            para("cell")
        );
        let renderer = TraceRenderer::new();
        let document = document_xml(&body);
        let numbering = numbering_xml(&[(1, 4, "decimal")]);
        let session = ParseSession::from_parts(
            document.as_bytes(),
            Some(numbering.as_bytes()),
            None,
            &renderer,
            ParseOptions::default(),
        )
        .unwrap();

        let outline = session.outline().unwrap();
        assert!(outline.has_numbering);
        assert!(!outline.has_comments);
        assert_eq!(outline.paragraphs, 4);
        assert_eq!(outline.tables, 1);
        assert_eq!(outline.chunks.len(), 2);
        assert_eq!(outline.chunks[0].kind, ChunkKind::OrderedList);
        assert_eq!(outline.chunks[0].num_id.as_deref(), Some("1"));
        assert_eq!(outline.chunks[0].format.as_deref(), Some("decimal"));
        assert_eq!(outline.chunks[1].kind, ChunkKind::Paragraphs);
        assert_eq!(outline.chunks[1].paragraphs, 2);

        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["chunks"][0]["kind"], "ordered_list");
    }
}
