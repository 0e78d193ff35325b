//! Recursive visitor
//!
//! Walks a paragraph's subtree depth-first, post-order: every child is
//! interpreted first and the concatenated child output becomes the input of
//! the parent's own interpretation. Dispatch is by element name, in a fixed
//! priority order:
//!
//! 1. table promotion (a node whose third ancestor is `tbl`)
//! 2. `commentReference`
//! 3. `ilvl` (list-level marker, sets the in-list flag)
//! 4. `r` run
//! 5. `p` paragraph
//! 6. `ins` insertion
//! 7. `tr` / `tc` table row and cell
//! 8. anything else passes its children's output through
//!
//! Tables are not containers the segmenter can see: it only sees the
//! paragraphs inside cells. The first such paragraph reached promotes the
//! outermost enclosing table, which is then interpreted from its root and
//! emitted once. Later paragraphs of the same table produce nothing. Inside
//! a cell, consecutive paragraphs are segmented again so list items get
//! their own list container.

use std::collections::HashSet;

use tracing::{debug, trace};

use docxweave_ooxml::{CommentResolver, NodeId, NodeTree, Numbering, Result};

use crate::renderer::Renderer;
use crate::segment::{paragraph_list_style, segment, ListChunk};

/// Distance from a cell paragraph up to its table: `p` -> `tc` -> `tr` -> `tbl`
const TABLE_ANCESTOR_DEPTH: usize = 3;

/// Mutable traversal state of one parse
///
/// `in_list` and `promoting` are scoped to a chunk; the set of emitted
/// tables lives for the whole document.
#[derive(Debug, Default)]
pub struct TraversalContext {
    in_list: bool,
    promoting: bool,
    emitted_tables: HashSet<NodeId>,
}

impl TraversalContext {
    /// Fresh state for a new document
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the chunk-scoped flags
    pub fn begin_chunk(&mut self) {
        self.in_list = false;
        self.promoting = false;
    }

    /// Whether a list-level marker is waiting for its paragraph
    pub fn in_list(&self) -> bool {
        self.in_list
    }

    /// Whether a table is currently being re-interpreted from its root
    pub fn is_promoting(&self) -> bool {
        self.promoting
    }

    /// Whether a table root has already been emitted
    pub fn table_emitted(&self, table: NodeId) -> bool {
        self.emitted_tables.contains(&table)
    }

    /// Number of tables emitted so far
    pub fn tables_emitted(&self) -> usize {
        self.emitted_tables.len()
    }
}

/// Interprets element subtrees against a [`Renderer`]
pub struct Interpreter<'a> {
    tree: &'a NodeTree,
    numbering: &'a Numbering,
    comments: &'a CommentResolver,
    renderer: &'a dyn Renderer,
    revision_metadata: bool,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over a document tree
    pub fn new(
        tree: &'a NodeTree,
        numbering: &'a Numbering,
        comments: &'a CommentResolver,
        renderer: &'a dyn Renderer,
    ) -> Self {
        Self {
            tree,
            numbering,
            comments,
            renderer,
            revision_metadata: false,
        }
    }

    /// Pass revision author/date to insertion and deletion calls
    pub fn with_revision_metadata(mut self, enabled: bool) -> Self {
        self.revision_metadata = enabled;
        self
    }

    /// Interpret one chunk of paragraphs
    ///
    /// Members are concatenated and, for a list chunk, wrapped once in the
    /// list container matching its format. A chunk that renders empty gets
    /// no container.
    pub fn interpret_chunk(&self, chunk: &ListChunk, ctx: &mut TraversalContext) -> Result<String> {
        ctx.in_list = false;
        let mut body = String::new();
        for &paragraph in &chunk.paragraphs {
            body.push_str(&self.interpret(paragraph, ctx)?);
        }

        // Every member was already emitted as part of a promoted table
        if body.is_empty() {
            return Ok(body);
        }

        Ok(match &chunk.style {
            Some(style) if style.format.is_bullet() => self.renderer.unordered_list(&body),
            Some(_) => self.renderer.ordered_list(&body),
            None => body,
        })
    }

    /// Interpret a node and everything beneath it
    pub fn interpret(&self, node: NodeId, ctx: &mut TraversalContext) -> Result<String> {
        if let Some(table) = self.promotion_target(node, ctx) {
            return self.promote_table(table, ctx);
        }
        if self.tree.tag(node) == "tc" {
            return self.interpret_cell(node, ctx);
        }

        let mut text = String::new();
        for &child in self.tree.children(node) {
            text.push_str(&self.interpret(child, ctx)?);
        }

        let element = self.tree.node(node);
        match element.tag.as_str() {
            "commentReference" => {
                let id = element.attr("id").unwrap_or_default();
                let comment = self.comments.resolve_comment(id)?;
                trace!("Comment {} by {:?}", comment.id, comment.author);
                text.push_str(&self.renderer.comment_reference(comment));
                Ok(text)
            }
            "ilvl" => {
                ctx.in_list = true;
                Ok(text)
            }
            "r" => Ok(self.interpret_run(node, text)),
            "p" => Ok(self.interpret_paragraph(node, text, ctx)),
            "ins" => {
                let (author, date) = self.revision_info(node);
                Ok(self.renderer.insertion(&text, author, date))
            }
            "tr" => Ok(self.renderer.table_row(&text)),
            "tbl" if ctx.promoting => {
                ctx.emitted_tables.insert(node);
                Ok(self.renderer.table(&text))
            }
            _ => Ok(text),
        }
    }

    /// Outermost table enclosing a cell paragraph, when not yet promoting
    fn promotion_target(&self, node: NodeId, ctx: &TraversalContext) -> Option<NodeId> {
        if ctx.promoting {
            return None;
        }
        let mut table = self
            .tree
            .ancestor(node, TABLE_ANCESTOR_DEPTH)
            .filter(|&a| self.tree.tag(a) == "tbl")?;
        while let Some(outer) = self.tree.closest_ancestor(table, "tbl") {
            table = outer;
        }
        Some(table)
    }

    fn promote_table(&self, table: NodeId, ctx: &mut TraversalContext) -> Result<String> {
        if ctx.table_emitted(table) {
            return Ok(String::new());
        }

        debug!("Promoting table at node {}", table.index());
        ctx.promoting = true;
        let result = self.interpret(table, ctx);
        ctx.promoting = false;
        result
    }

    /// Cell content, with runs of direct paragraphs segmented into chunks
    fn interpret_cell(&self, cell: NodeId, ctx: &mut TraversalContext) -> Result<String> {
        let mut text = String::new();
        let mut paragraphs: Vec<NodeId> = Vec::new();

        for &child in self.tree.children(cell) {
            if self.tree.tag(child) == "p" {
                paragraphs.push(child);
                continue;
            }
            text.push_str(&self.interpret_paragraph_run(&paragraphs, ctx)?);
            paragraphs.clear();
            text.push_str(&self.interpret(child, ctx)?);
        }
        text.push_str(&self.interpret_paragraph_run(&paragraphs, ctx)?);

        Ok(self.renderer.table_cell(&text))
    }

    fn interpret_paragraph_run(
        &self,
        paragraphs: &[NodeId],
        ctx: &mut TraversalContext,
    ) -> Result<String> {
        let chunks = segment(paragraphs, |p| {
            paragraph_list_style(self.tree, self.numbering, p)
        })?;
        let mut text = String::new();
        for chunk in &chunks {
            text.push_str(&self.interpret_chunk(chunk, ctx)?);
        }
        Ok(text)
    }

    /// Run text with bold/italics/underline applied in that order, then
    /// wrapped as a deletion for `delText` runs
    fn interpret_run(&self, run: NodeId, children_text: String) -> String {
        let deleted = !self.tree.has_child(run, "t") && self.tree.has_child(run, "delText");
        let text_tag = if deleted { "delText" } else { "t" };
        if !self.tree.has_child(run, text_tag) {
            return children_text;
        }

        let mut text = String::new();
        for &child in self.tree.children(run) {
            let element = self.tree.node(child);
            match element.tag.as_str() {
                tag if tag == text_tag => text.push_str(&self.renderer.escape(&element.text)),
                "tab" => text.push_str(&self.renderer.tab()),
                "br" | "cr" => text.push_str(&self.renderer.linebreak()),
                _ => {}
            }
        }
        if text.is_empty() {
            return children_text;
        }

        if let Some(props) = self.tree.child(run, "rPr") {
            if self.toggle(props, "b") {
                text = self.renderer.bold(&text);
            }
            if self.toggle(props, "i") {
                text = self.renderer.italics(&text);
            }
            if self.toggle(props, "u") {
                text = self.renderer.underline(&text);
            }
        }

        if deleted {
            let (author, date) = self
                .tree
                .closest_ancestor(run, "del")
                .map(|del| self.revision_info(del))
                .unwrap_or(("", ""));
            text = self.renderer.deletion(&text, author, date);
        }

        text.push_str(&children_text);
        text
    }

    fn interpret_paragraph(
        &self,
        paragraph: NodeId,
        text: String,
        ctx: &mut TraversalContext,
    ) -> String {
        if ctx.in_list {
            ctx.in_list = false;
            self.renderer.list_element(&text)
        } else if !self.has_visible_text(paragraph) {
            self.renderer.linebreak()
        } else {
            self.renderer.paragraph(&text)
        }
    }

    /// A run property element that is present and not switched off
    fn toggle(&self, props: NodeId, tag: &str) -> bool {
        let Some(flag) = self.tree.child(props, tag) else {
            return false;
        };
        match self.tree.node(flag).attr("val") {
            Some("0") | Some("false") | Some("off") => false,
            Some("none") => tag != "u",
            _ => true,
        }
    }

    fn has_visible_text(&self, paragraph: NodeId) -> bool {
        self.tree.descendants(paragraph).any(|d| {
            let element = self.tree.node(d);
            (element.is("t") || element.is("delText")) && !element.text.trim().is_empty()
        })
    }

    fn revision_info(&self, node: NodeId) -> (&'a str, &'a str) {
        if !self.revision_metadata {
            return ("", "");
        }
        let tree: &'a NodeTree = self.tree;
        let element = tree.node(node);
        (
            element.attr("author").unwrap_or_default(),
            element.attr("date").unwrap_or_default(),
        )
    }
}
