//! Configuration Settings
//!
//! Conversion options, loadable from a `docxweave.toml`:
//!
//! ```toml
//! [output]
//! format = "markdown"
//!
//! [revisions]
//! metadata = true
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "docxweave.toml";

/// Output markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML fragment (or document, with `standalone`)
    #[default]
    Html,
    /// GitHub-flavored Markdown
    Markdown,
    /// Plain text with tracked changes accepted
    Text,
    /// Function-call notation of every rendering call
    Trace,
}

impl OutputFormat {
    /// Conventional file extension for converted output
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Trace => "trace",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Text => "text",
            OutputFormat::Trace => "trace",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "trace" => Ok(OutputFormat::Trace),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Output settings
    pub output: OutputSettings,
    /// Tracked-change settings
    pub revisions: RevisionSettings,
    /// Comment settings
    pub comments: CommentSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Backend to render with
    pub format: OutputFormat,
    /// Wrap HTML output in a complete document
    pub standalone: bool,
}

/// Tracked-change configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RevisionSettings {
    /// Pass author and date of insertions/deletions to the backend
    pub metadata: bool,
}

/// Comment configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CommentSettings {
    /// Render a marker where comments are anchored
    pub annotate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.output.format, OutputFormat::Html);
        assert!(!settings.output.standalone);
        assert!(!settings.revisions.metadata);
        assert!(!settings.comments.annotate);
    }

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::from_toml_str(
            r#"
            [output]
            format = "markdown"
            standalone = true

            [revisions]
            metadata = true

            [comments]
            annotate = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.output.format, OutputFormat::Markdown);
        assert!(settings.output.standalone);
        assert!(settings.revisions.metadata);
        assert!(settings.comments.annotate);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str("[revisions]\nmetadata = true\n").unwrap();
        assert!(settings.revisions.metadata);
        assert_eq!(settings.output, OutputSettings::default());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Settings::from_toml_str("[output]\nformat = \"pdf\"\n").is_err());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("docx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }
}
