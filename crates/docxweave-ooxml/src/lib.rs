//! # docxweave-ooxml
//!
//! OOXML (Office Open XML) package access for docxweave.
//!
//! This crate provides functionality to:
//! - Read parts out of a DOCX package
//! - Strip namespace prefixes from WordprocessingML parts
//! - Build immutable element trees with parent back-references
//! - Resolve list numbering ids and comment ids
//!
//! ## Example: Building a tree
//!
//! ```no_run
//! use docxweave_ooxml::{strip_namespaces, NodeTree, OoxmlArchive, DOCUMENT_PART};
//!
//! let archive = OoxmlArchive::open("document.docx")?;
//! let xml = strip_namespaces(archive.document_xml()?, DOCUMENT_PART)?;
//! let tree = NodeTree::parse(&xml, DOCUMENT_PART)?;
//!
//! for p in tree.descendants_named(tree.root(), "p") {
//!     println!("{:?}", tree.node(p).attributes);
//! }
//! # Ok::<(), docxweave_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod comments;
pub mod error;
pub mod normalize;
pub mod numbering;
pub mod test_utils;
pub mod tree;

pub use archive::{OoxmlArchive, PackageReader, COMMENTS_PART, DOCUMENT_PART, NUMBERING_PART};
pub use comments::{Comment, CommentResolver};
pub use error::{OoxmlError, Result};
pub use normalize::strip_namespaces;
pub use numbering::{NumberFormat, Numbering, NumberingStyle};
pub use tree::{Node, NodeId, NodeTree};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
