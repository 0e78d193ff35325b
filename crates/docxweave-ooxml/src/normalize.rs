//! Namespace normalization
//!
//! WordprocessingML qualifies every element and attribute (`w:p`,
//! `w:val`). The element tree works on local names only, so each part is
//! rewritten before building: prefixes are stripped from tags and attribute
//! keys and `xmlns` declarations are dropped. Everything else (text,
//! declarations, comments) passes through untouched.

use std::collections::HashSet;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{OoxmlError, Result};

/// Strip namespace prefixes from all tags and attribute keys of a part
///
/// `part` names the part in error messages. If two attributes collide after
/// stripping (`w:val` and `x:val`), the first one wins.
pub fn strip_namespaces(xml: &[u8], part: &str) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                writer.write_event(Event::Start(strip_element(e, part)?))?;
            }
            Ok(Event::Empty(ref e)) => {
                writer.write_event(Event::Empty(strip_element(e, part)?))?;
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event)?,
            Err(e) => return Err(OoxmlError::malformed(part, e)),
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn strip_element(e: &BytesStart, part: &str) -> Result<BytesStart<'static>> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut stripped = BytesStart::new(name);
    let mut seen = HashSet::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| OoxmlError::malformed(part, err))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        if !seen.insert(key.clone()) {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|err| OoxmlError::malformed(part, err))?;
        stripped.push_attribute((key.as_str(), value.as_ref()));
    }

    Ok(stripped)
}
