//! Block segmentation
//!
//! WordprocessingML has no list container. A list is just a run of
//! consecutive paragraphs whose properties carry a level (`ilvl`) and a
//! numbering id (`numId`). This module recovers the containers: it splits
//! the document-order paragraph sequence into chunks that are either one
//! list with one resolved style, or plain paragraphs.

use tracing::debug;

use docxweave_ooxml::{NodeId, NodeTree, Numbering, NumberingStyle, OoxmlError, Result};

/// A maximal run of paragraphs sharing list membership and style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChunk {
    /// Member paragraphs in document order
    pub paragraphs: Vec<NodeId>,
    /// Style of the list, `None` for plain paragraphs
    pub style: Option<NumberingStyle>,
}

impl ListChunk {
    /// Whether this chunk renders as a list
    pub fn is_list(&self) -> bool {
        self.style.is_some()
    }
}

/// Split paragraphs into chunks
///
/// `list_style` reports the resolved style of a paragraph, or `None` when
/// it is not a list paragraph. A boundary falls before a paragraph when a
/// list starts, when the list style changes, or when a list ends; empty
/// chunks are never produced.
pub fn segment<F>(paragraphs: &[NodeId], mut list_style: F) -> Result<Vec<ListChunk>>
where
    F: FnMut(NodeId) -> Result<Option<NumberingStyle>>,
{
    let mut chunks = Vec::new();
    let mut current: Vec<NodeId> = Vec::new();
    let mut open: Option<NumberingStyle> = None;

    for &paragraph in paragraphs {
        let style = list_style(paragraph)?;
        let boundary = match (&open, &style) {
            (None, Some(_)) => true,
            (Some(open), Some(style)) => !open.same_list_style(style),
            (Some(_), None) => true,
            (None, None) => false,
        };

        if boundary {
            if !current.is_empty() {
                chunks.push(ListChunk {
                    paragraphs: std::mem::take(&mut current),
                    style: open.take(),
                });
            }
            open = style;
        }
        current.push(paragraph);
    }

    if !current.is_empty() {
        chunks.push(ListChunk {
            paragraphs: current,
            style: open,
        });
    }

    debug!(
        "Segmented {} paragraphs into {} chunks",
        paragraphs.len(),
        chunks.len()
    );
    Ok(chunks)
}

/// Top-level paragraphs of a document in document order
///
/// Paragraphs nested inside another paragraph (text boxes) are rendered
/// through their enclosing paragraph and are not listed.
pub fn document_paragraphs(tree: &NodeTree) -> Vec<NodeId> {
    tree.descendants_named(tree.root(), "p")
        .filter(|&p| tree.closest_ancestor(p, "p").is_none())
        .collect()
}

/// Resolve the list style of a paragraph
///
/// A paragraph is a list paragraph when its properties carry a list level.
/// Its numbering id must then resolve, otherwise the lookup error is
/// returned.
pub fn paragraph_list_style(
    tree: &NodeTree,
    numbering: &Numbering,
    paragraph: NodeId,
) -> Result<Option<NumberingStyle>> {
    let Some(props) = tree.child(paragraph, "pPr") else {
        return Ok(None);
    };
    if !tree.has_descendant(props, "ilvl") {
        return Ok(None);
    }

    let num_id = tree
        .find_descendant(props, "numId")
        .and_then(|n| tree.node(n).attr("val"))
        .ok_or_else(|| {
            OoxmlError::StyleNotFound(format!(
                "list paragraph at node {} has no numbering id",
                paragraph.index()
            ))
        })?;

    numbering.resolve_style(num_id).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docxweave_ooxml::test_utils::{document_xml, list_para, numbering_xml, para};
    use docxweave_ooxml::{strip_namespaces, NumberFormat};

    fn style(num_id: &str, format: NumberFormat) -> NumberingStyle {
        NumberingStyle {
            num_id: num_id.to_string(),
            abstract_num_id: num_id.to_string(),
            format,
        }
    }

    fn parse(xml: &str, part: &str) -> NodeTree {
        let normalized = strip_namespaces(xml.as_bytes(), part).unwrap();
        NodeTree::parse(&normalized, part).unwrap()
    }

    /// Segment a synthetic sequence where paragraph `i` has `styles[i]`
    fn segment_styles(styles: &[Option<NumberingStyle>]) -> Vec<Vec<usize>> {
        let t = parse(&document_xml(&para("x").repeat(styles.len())), "word/document.xml");
        let ids = document_paragraphs(&t);
        let chunks = segment(&ids, |p| {
            let i = ids.iter().position(|&q| q == p).unwrap();
            Ok(styles[i].clone())
        })
        .unwrap();
        chunks
            .iter()
            .map(|c| {
                c.paragraphs
                    .iter()
                    .map(|p| ids.iter().position(|q| q == p).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_boundaries_at_start_change_and_end() {
        let s1 = style("1", NumberFormat::Bullet);
        let s2 = style("2", NumberFormat::Decimal);
        let chunks = segment_styles(&[None, Some(s1.clone()), Some(s1), Some(s2), None]);
        assert_eq!(chunks, vec![vec![0], vec![1, 2], vec![3], vec![4]]);
    }

    #[test]
    fn test_list_at_document_start() {
        let s1 = style("1", NumberFormat::Bullet);
        let chunks = segment_styles(&[Some(s1.clone()), Some(s1), None]);
        assert_eq!(chunks, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_plain_paragraphs_form_one_chunk() {
        let chunks = segment_styles(&[None, None, None]);
        assert_eq!(chunks, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_same_format_different_ids_continue() {
        let a = style("1", NumberFormat::Decimal);
        let b = style("2", NumberFormat::Decimal);
        let chunks = segment_styles(&[Some(a), Some(b)]);
        assert_eq!(chunks, vec![vec![0, 1]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment(&[], |_| Ok(None)).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_keeps_opening_style() {
        let t = parse(&document_xml(&para("x").repeat(2)), "word/document.xml");
        let ids = document_paragraphs(&t);
        let s = style("7", NumberFormat::Bullet);
        let chunks = segment(&ids, |_| Ok(Some(s.clone()))).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_list());
        assert_eq!(chunks[0].style.as_ref().unwrap().num_id, "7");
    }

    #[test]
    fn test_lookup_error_propagates() {
        let t = parse(&document_xml(&para("x")), "word/document.xml");
        let ids = document_paragraphs(&t);
        let result = segment(&ids, |_| Err(OoxmlError::StyleNotFound("1".to_string())));
        assert!(matches!(result, Err(OoxmlError::StyleNotFound(_))));
    }

    #[test]
    fn test_paragraph_list_style_from_numbering() {
        let body = format!("{}{}", para("plain"), list_para(1, "item"));
        let t = parse(&document_xml(&body), "word/document.xml");
        let n = Numbering::from_tree(&parse(
            &numbering_xml(&[(1, 0, "bullet")]),
            "word/numbering.xml",
        ));
        let ids = document_paragraphs(&t);

        assert_eq!(paragraph_list_style(&t, &n, ids[0]).unwrap(), None);
        let style = paragraph_list_style(&t, &n, ids[1]).unwrap().unwrap();
        assert_eq!(style.format, NumberFormat::Bullet);
    }

    #[test]
    fn test_list_paragraph_without_numbering_part() {
        let t = parse(&document_xml(&list_para(1, "item")), "word/document.xml");
        let ids = document_paragraphs(&t);
        let result = paragraph_list_style(&t, &Numbering::unavailable(), ids[0]);
        assert!(matches!(result, Err(OoxmlError::StyleNotFound(_))));
    }

    #[test]
    fn test_level_without_numbering_id() {
        let t = parse(
            &document_xml(
                r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/></w:numPr></w:pPr></w:p>"#,
            ),
            "word/document.xml",
        );
        let ids = document_paragraphs(&t);
        let result = paragraph_list_style(&t, &Numbering::unavailable(), ids[0]);
        assert!(matches!(result, Err(OoxmlError::StyleNotFound(msg)) if msg.contains("no numbering id")));
    }

    #[test]
    fn test_text_box_paragraphs_are_not_top_level() {
        let body = r#"<w:p><w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r></w:p><w:p/>"#;
        let t = parse(&document_xml(body), "word/document.xml");
        assert_eq!(document_paragraphs(&t).len(), 2);
        assert_eq!(t.descendants_named(t.root(), "p").count(), 3);
    }
}
