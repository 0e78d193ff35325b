//! Comments (word/comments.xml)
//!
//! Most documents never reference a comment, so the comments part is kept
//! as raw bytes and only parsed on the first lookup. The parsed map is
//! memoized for the lifetime of the resolver.

use std::cell::OnceCell;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::archive::COMMENTS_PART;
use crate::error::{OoxmlError, Result};
use crate::normalize::strip_namespaces;
use crate::tree::NodeTree;

/// A review comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment id, referenced by `commentReference/@id`
    pub id: String,
    /// Author name, empty if not recorded
    pub author: String,
    /// Timestamp as written in the part, empty if not recorded
    pub date: String,
    /// Comment body; paragraphs separated by `\n`
    pub text: String,
}

/// Parse a normalized comments tree into an id -> comment map
pub fn collect_comments(tree: &NodeTree) -> HashMap<String, Comment> {
    let mut comments = HashMap::new();

    for node in tree.descendants_named(tree.root(), "comment") {
        let element = tree.node(node);
        let Some(id) = element.attr("id") else {
            continue;
        };

        let paragraphs: Vec<String> = tree
            .descendants_named(node, "p")
            .map(|p| {
                tree.descendants_named(p, "t")
                    .map(|t| tree.node(t).text.as_str())
                    .collect()
            })
            .collect();
        let text = if paragraphs.is_empty() {
            // Text runs directly under the comment, no paragraph wrapper
            tree.descendants_named(node, "t")
                .map(|t| tree.node(t).text.as_str())
                .collect()
        } else {
            paragraphs.join("\n")
        };

        comments.entry(id.to_string()).or_insert_with(|| Comment {
            id: id.to_string(),
            author: element.attr("author").unwrap_or_default().to_string(),
            date: element.attr("date").unwrap_or_default().to_string(),
            text,
        });
    }

    comments
}

/// Lazily parsed comment lookup
#[derive(Debug, Default)]
pub struct CommentResolver {
    source: Option<Vec<u8>>,
    store: OnceCell<HashMap<String, Comment>>,
}

impl CommentResolver {
    /// Resolver over the raw (not yet normalized) comments part
    pub fn new(source: Option<Vec<u8>>) -> Self {
        Self {
            source,
            store: OnceCell::new(),
        }
    }

    /// Whether the package carried a comments part
    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }

    /// Whether the comments part has been parsed yet
    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    /// Look up a comment by id, parsing the part on first use
    pub fn resolve_comment(&self, id: &str) -> Result<&Comment> {
        trace!("Resolving comment {}", id);
        self.store()?
            .get(id)
            .ok_or_else(|| OoxmlError::CommentNotFound(id.to_string()))
    }

    fn store(&self) -> Result<&HashMap<String, Comment>> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let source = self
            .source
            .as_deref()
            .ok_or(OoxmlError::CommentsUnavailable)?;
        let normalized = strip_namespaces(source, COMMENTS_PART)?;
        let tree = NodeTree::parse(&normalized, COMMENTS_PART)?;
        let comments = collect_comments(&tree);
        debug!("Loaded {} comments", comments.len());

        Ok(self.store.get_or_init(|| comments))
    }
}
