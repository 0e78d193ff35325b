//! docxweave CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docxweave:
//! - Convert: render one DOCX file as HTML, Markdown, text or a call trace
//! - Batch: convert every DOCX file matching a glob pattern
//! - Inspect: list package parts and the paragraph/list outline
//!
//! # Library Usage
//!
//! ```ignore
//! use docxweave_cli::{convert_file, Inspection};
//! use docxweave_core::Settings;
//!
//! let html = convert_file(Path::new("report.docx"), &Settings::default())?;
//! let outline = Inspection::load(Path::new("report.docx"))?.to_json();
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Convert to Markdown on stdout
//! docxweave convert report.docx --format markdown
//!
//! # Convert a folder to standalone HTML pages
//! docxweave batch "docs/*.docx" --output site/ --standalone
//!
//! # Show how a document segments into lists
//! docxweave inspect report.docx --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{batch_command, convert_command, convert_file, inspect_command};
pub use app::{run_cli, BatchSummary, Format, InspectFormat, Inspection, RenderArgs};
