//! Numbering definitions (word/numbering.xml)
//!
//! Paragraphs never declare their list style inline. They carry a `numId`
//! that points at a `num` entry, which in turn points at a shared
//! `abstractNum` template holding the per-level formats:
//!
//! ```text
//! <num numId="3"><abstractNumId val="1"/></num>
//! <abstractNum abstractNumId="1"><lvl ilvl="0"><numFmt val="bullet"/></lvl>…</abstractNum>
//! ```
//!
//! Resolution is level-agnostic: every level of a list resolves to the
//! first `numFmt` found depth-first inside the abstract definition.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{OoxmlError, Result};
use crate::tree::NodeTree;

/// Kind of list marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFormat {
    /// Bullet glyphs, rendered as an unordered list
    Bullet,
    /// Arabic numerals
    Decimal,
    /// Any other format (`lowerLetter`, `upperRoman`, ...), kept verbatim
    Other(String),
}

impl NumberFormat {
    /// Interpret a `numFmt/@val` value
    pub fn from_val(val: &str) -> Self {
        match val {
            "bullet" => NumberFormat::Bullet,
            "decimal" => NumberFormat::Decimal,
            other => NumberFormat::Other(other.to_string()),
        }
    }

    /// Whether lists of this format are unordered
    pub fn is_bullet(&self) -> bool {
        matches!(self, NumberFormat::Bullet)
    }

    /// The OOXML name of the format
    pub fn as_str(&self) -> &str {
        match self {
            NumberFormat::Bullet => "bullet",
            NumberFormat::Decimal => "decimal",
            NumberFormat::Other(s) => s,
        }
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A list style resolved from a numbering id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingStyle {
    /// The `numId` the paragraph referenced
    pub num_id: String,
    /// The abstract definition it points at
    pub abstract_num_id: String,
    /// Marker format of the definition
    pub format: NumberFormat,
}

impl NumberingStyle {
    /// Whether two styles render as the same kind of list
    ///
    /// Only the format descriptor is compared: two numbering ids sharing a
    /// format continue the same list.
    pub fn same_list_style(&self, other: &NumberingStyle) -> bool {
        self.format == other.format
    }
}

/// Index over a numbering part
///
/// Built once per document. A document without a numbering part gets an
/// empty resolver on which every lookup fails.
#[derive(Debug, Clone, Default)]
pub struct Numbering {
    available: bool,
    /// numId -> abstractNumId
    nums: HashMap<String, String>,
    /// abstractNumId -> first format found in the definition
    abstracts: HashMap<String, Option<NumberFormat>>,
}

impl Numbering {
    /// Resolver for a package without a numbering part
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Index a parsed numbering part
    pub fn from_tree(tree: &NodeTree) -> Self {
        let root = tree.root();
        let mut nums = HashMap::new();
        let mut abstracts = HashMap::new();

        for num in tree.descendants_named(root, "num") {
            let Some(num_id) = tree.node(num).attr("numId") else {
                continue;
            };
            let Some(abstract_id) = tree
                .child(num, "abstractNumId")
                .and_then(|a| tree.node(a).attr("val"))
            else {
                continue;
            };
            if nums.contains_key(num_id) {
                warn!("Duplicate numbering id {}, keeping the first", num_id);
                continue;
            }
            nums.insert(num_id.to_string(), abstract_id.to_string());
        }

        for def in tree.descendants_named(root, "abstractNum") {
            let Some(abstract_id) = tree.node(def).attr("abstractNumId") else {
                continue;
            };
            if abstracts.contains_key(abstract_id) {
                continue;
            }
            let format = tree
                .find_descendant(def, "numFmt")
                .map(|f| NumberFormat::from_val(tree.node(f).attr("val").unwrap_or_default()));
            abstracts.insert(abstract_id.to_string(), format);
        }

        debug!(
            "Indexed {} numbering ids over {} abstract definitions",
            nums.len(),
            abstracts.len()
        );
        Self {
            available: true,
            nums,
            abstracts,
        }
    }

    /// Whether the package carried a numbering part
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Resolve a numbering id to its list style
    pub fn resolve_style(&self, num_id: &str) -> Result<NumberingStyle> {
        if !self.available {
            return Err(OoxmlError::StyleNotFound(format!(
                "numbering id {num_id}: document has no numbering part"
            )));
        }

        let abstract_num_id = self
            .nums
            .get(num_id)
            .ok_or_else(|| OoxmlError::StyleNotFound(format!("numbering id {num_id}")))?;

        let format = self
            .abstracts
            .get(abstract_num_id)
            .ok_or_else(|| {
                OoxmlError::StyleNotFound(format!(
                    "abstract numbering {abstract_num_id} (referenced by numbering id {num_id})"
                ))
            })?
            .clone()
            .ok_or_else(|| {
                OoxmlError::StyleNotFound(format!(
                    "abstract numbering {abstract_num_id} has no number format"
                ))
            })?;

        Ok(NumberingStyle {
            num_id: num_id.to_string(),
            abstract_num_id: abstract_num_id.clone(),
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::strip_namespaces;
    use crate::test_utils::numbering_xml;

    fn numbering(xml: &str) -> Numbering {
        let normalized = strip_namespaces(xml.as_bytes(), "word/numbering.xml").unwrap();
        let tree = NodeTree::parse(&normalized, "word/numbering.xml").unwrap();
        Numbering::from_tree(&tree)
    }

    #[test]
    fn test_resolves_through_abstract_definition() {
        let n = numbering(&numbering_xml(&[(1, 10, "bullet"), (2, 20, "decimal")]));

        let bullet = n.resolve_style("1").unwrap();
        assert_eq!(bullet.abstract_num_id, "10");
        assert_eq!(bullet.format, NumberFormat::Bullet);

        let decimal = n.resolve_style("2").unwrap();
        assert_eq!(decimal.format, NumberFormat::Decimal);
        assert!(!decimal.format.is_bullet());
    }

    #[test]
    fn test_other_formats_are_kept() {
        let n = numbering(&numbering_xml(&[(4, 0, "lowerRoman")]));
        let style = n.resolve_style("4").unwrap();
        assert_eq!(style.format, NumberFormat::Other("lowerRoman".to_string()));
        assert_eq!(style.format.to_string(), "lowerRoman");
    }

    #[test]
    fn test_first_format_wins_across_levels() {
        let n = numbering(
            r#"<numbering>
                <abstractNum abstractNumId="0">
                    <lvl ilvl="0"><numFmt val="decimal"/></lvl>
                    <lvl ilvl="1"><numFmt val="bullet"/></lvl>
                </abstractNum>
                <num numId="1"><abstractNumId val="0"/></num>
            </numbering>"#,
        );
        assert_eq!(n.resolve_style("1").unwrap().format, NumberFormat::Decimal);
    }

    #[test]
    fn test_shared_abstract_definition() {
        let n = numbering(&numbering_xml(&[(1, 0, "bullet"), (2, 0, "bullet")]));
        let a = n.resolve_style("1").unwrap();
        let b = n.resolve_style("2").unwrap();
        assert_ne!(a, b);
        assert!(a.same_list_style(&b));
    }

    #[test]
    fn test_unknown_id_fails() {
        let n = numbering(&numbering_xml(&[(1, 0, "bullet")]));
        assert!(matches!(
            n.resolve_style("9"),
            Err(OoxmlError::StyleNotFound(_))
        ));
    }

    #[test]
    fn test_dangling_abstract_reference_fails() {
        let n = numbering(r#"<numbering><num numId="1"><abstractNumId val="5"/></num></numbering>"#);
        assert!(matches!(
            n.resolve_style("1"),
            Err(OoxmlError::StyleNotFound(_))
        ));
    }

    #[test]
    fn test_definition_without_format_fails() {
        let n = numbering(
            r#"<numbering><abstractNum abstractNumId="0"><lvl ilvl="0"/></abstractNum><num numId="1"><abstractNumId val="0"/></num></numbering>"#,
        );
        assert!(matches!(
            n.resolve_style("1"),
            Err(OoxmlError::StyleNotFound(_))
        ));
    }

    #[test]
    fn test_missing_part_always_fails() {
        let n = Numbering::unavailable();
        assert!(!n.is_available());
        match n.resolve_style("1") {
            Err(OoxmlError::StyleNotFound(msg)) => assert!(msg.contains("no numbering part")),
            other => panic!("Expected StyleNotFound, got {:?}", other),
        }
    }
}
