//! Element tree with parent back-references
//!
//! A part is parsed once into an arena of [`Node`]s addressed by
//! [`NodeId`]. Every node records its parent at construction time, which
//! makes ancestor queries (table cell detection, revision lookup) cheap
//! without shared ownership. The tree is immutable once built.
//!
//! The builder expects namespace-free XML (see [`crate::normalize`]); tags
//! and attribute keys are stored exactly as read.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Index of a node within its [`NodeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document (pre-)order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single element
#[derive(Debug, Clone)]
pub struct Node {
    /// Element name
    pub tag: String,
    /// Attributes, keys unique
    pub attributes: HashMap<String, String>,
    /// Character data directly inside this element, unescaped
    pub text: String,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Enclosing element, `None` for the root
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(tag: String, attributes: HashMap<String, String>, parent: Option<NodeId>) -> Self {
        Self {
            tag,
            attributes,
            text: String::new(),
            children: Vec::new(),
            parent,
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Check the element name
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// An immutable element tree
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Parse namespace-free XML into a tree
    ///
    /// `part` names the source in error messages.
    pub fn parse(xml: &[u8], part: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Keep whitespace, `w:t` content may be significant
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let id = push_node(&mut nodes, &stack, e, part)?;
                    stack.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    push_node(&mut nodes, &stack, e, part)?;
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| OoxmlError::malformed(part, err))?;
                    match stack.last() {
                        Some(current) => nodes[current.0].text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(OoxmlError::malformed(part, "text outside root element")),
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(current) = stack.last() {
                        nodes[current.0].text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(OoxmlError::malformed(part, e)),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OoxmlError::malformed(
                part,
                format!("unclosed element <{}>", nodes[stack[stack.len() - 1].0].tag),
            ));
        }
        if nodes.is_empty() {
            return Err(OoxmlError::malformed(part, "no root element"));
        }

        Ok(Self { nodes })
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of elements in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a parsed tree; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Element name of a node
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Walk `levels` parents up; `ancestor(id, 1)` is the parent
    pub fn ancestor(&self, id: NodeId, levels: usize) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..levels {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// Nearest proper ancestor with the given tag
    pub fn closest_ancestor(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.tag(node) == tag {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Children in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First direct child with the given tag
    pub fn child(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.tag(c) == tag)
    }

    /// Check for a direct child with the given tag
    pub fn has_child(&self, id: NodeId, tag: &str) -> bool {
        self.child(id, tag).is_some()
    }

    /// All proper descendants in document order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Proper descendants with the given tag, in document order
    pub fn descendants_named<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id).filter(move |&d| self.tag(d) == tag)
    }

    /// First proper descendant with the given tag
    pub fn find_descendant(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants_named(id, tag).next()
    }

    /// Check for a proper descendant with the given tag
    pub fn has_descendant(&self, id: NodeId, tag: &str) -> bool {
        self.find_descendant(id, tag).is_some()
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

fn push_node(
    nodes: &mut Vec<Node>,
    stack: &[NodeId],
    e: &BytesStart,
    part: &str,
) -> Result<NodeId> {
    let parent = stack.last().copied();
    if parent.is_none() && !nodes.is_empty() {
        return Err(OoxmlError::malformed(part, "multiple root elements"));
    }

    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OoxmlError::malformed(part, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| OoxmlError::malformed(part, err))?;
        attributes.insert(key, value.into_owned());
    }

    let id = NodeId(nodes.len());
    nodes.push(Node::new(tag, attributes, parent));
    if let Some(parent) = parent {
        nodes[parent.0].children.push(id);
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(xml: &str) -> NodeTree {
        NodeTree::parse(xml.as_bytes(), "test.xml").unwrap()
    }

    #[test]
    fn test_parent_links_match_children() {
        let t = tree("<document><body><p><r><t>Hi</t></r></p><p/></body></document>");

        for id in std::iter::once(t.root()).chain(t.descendants(t.root())) {
            for &child in t.children(id) {
                assert_eq!(t.parent(child), Some(id));
            }
        }
        assert_eq!(t.parent(t.root()), None);
    }

    #[test]
    fn test_text_and_attributes() {
        let t = tree(r#"<r><rPr><b val="0"/></rPr><t space="preserve"> a &lt; b </t></r>"#);

        let text = t.find_descendant(t.root(), "t").unwrap();
        assert_eq!(t.node(text).text, " a < b ");
        assert_eq!(t.node(text).attr("space"), Some("preserve"));

        let bold = t.find_descendant(t.root(), "b").unwrap();
        assert_eq!(t.node(bold).attr("val"), Some("0"));
        assert_eq!(t.node(bold).attr("missing"), None);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let t = tree("<a><b><c/><d/></b><e><f/></e></a>");
        let tags: Vec<&str> = t.descendants(t.root()).map(|id| t.tag(id)).collect();
        assert_eq!(tags, vec!["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_ancestor_walk() {
        let t = tree("<tbl><tr><tc><p><r/></p></tc></tr></tbl>");
        let p = t.find_descendant(t.root(), "p").unwrap();
        let r = t.find_descendant(t.root(), "r").unwrap();

        assert_eq!(t.tag(t.ancestor(p, 3).unwrap()), "tbl");
        assert_eq!(t.tag(t.ancestor(r, 3).unwrap()), "tr");
        assert_eq!(t.ancestor(p, 4), None);
        assert_eq!(t.ancestor(p, 0), Some(p));
        assert_eq!(t.closest_ancestor(r, "tc"), t.find_descendant(t.root(), "tc"));
    }

    #[test]
    fn test_child_versus_descendant() {
        let t = tree("<p><pPr><numPr><ilvl val=\"0\"/></numPr></pPr></p>");
        assert!(t.has_descendant(t.root(), "ilvl"));
        assert!(!t.has_child(t.root(), "ilvl"));
        assert!(t.has_child(t.root(), "pPr"));
        assert!(!t.has_descendant(t.root(), "p"));
    }

    #[test]
    fn test_cdata_appends_text() {
        let t = tree("<t><![CDATA[1 < 2]]></t>");
        assert_eq!(t.node(t.root()).text, "1 < 2");
    }

    #[test]
    fn test_unclosed_element_is_malformed() {
        let result = NodeTree::parse(b"<document><body>", "word/document.xml");
        assert!(matches!(result, Err(OoxmlError::MalformedDocument { .. })));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let result = NodeTree::parse(b"  ", "word/document.xml");
        assert!(matches!(result, Err(OoxmlError::MalformedDocument { .. })));
    }

    #[test]
    fn test_second_root_is_malformed() {
        let result = NodeTree::parse(b"<a/><b/>", "test.xml");
        assert!(matches!(result, Err(OoxmlError::MalformedDocument { .. })));
    }
}
