//! Archive handling for DOCX files
//!
//! DOCX files are ZIP archives containing XML parts. The interpreter only
//! needs read access to a handful of named parts, expressed by the
//! [`PackageReader`] trait so callers can supply parts from memory.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::read::ZipArchive;

use crate::error::{OoxmlError, Result};

/// Main document content part
pub const DOCUMENT_PART: &str = "word/document.xml";
/// Numbering definitions part
pub const NUMBERING_PART: &str = "word/numbering.xml";
/// Comments part
pub const COMMENTS_PART: &str = "word/comments.xml";

/// Read access to the parts of a document package
pub trait PackageReader {
    /// Get a part's raw bytes, or `None` if the package has no such part
    fn read_part(&self, name: &str) -> Option<&[u8]>;

    /// Get a part that must be present
    fn require_part(&self, name: &str) -> Result<&[u8]> {
        self.read_part(name)
            .ok_or_else(|| OoxmlError::PartMissing(name.to_string()))
    }
}

impl PackageReader for HashMap<String, Vec<u8>> {
    fn read_part(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|v| v.as_slice())
    }
}

/// Represents an unpacked OOXML document
#[derive(Debug)]
pub struct OoxmlArchive {
    /// All files in the archive, keyed by path
    files: HashMap<String, Vec<u8>>,
}

impl OoxmlArchive {
    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening package {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from an in-memory DOCX
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(std::io::Cursor::new(bytes))
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut files = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            files.insert(name, contents);
        }

        debug!("Unpacked {} parts", files.len());
        Ok(Self { files })
    }

    /// Get a file's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|v| v.as_slice())
    }

    /// Get the main document content (word/document.xml)
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.require_part(DOCUMENT_PART)
    }

    /// Get the numbering definitions (word/numbering.xml)
    pub fn numbering_xml(&self) -> Option<&[u8]> {
        self.get(NUMBERING_PART)
    }

    /// Get the comments (word/comments.xml)
    pub fn comments_xml(&self) -> Option<&[u8]> {
        self.get(COMMENTS_PART)
    }

    /// Check if a file exists in the archive
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// List all files in the archive, sorted
    pub fn file_list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.files.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl PackageReader for OoxmlArchive {
    fn read_part(&self, name: &str) -> Option<&[u8]> {
        self.get(name)
    }
}
