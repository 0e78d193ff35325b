//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use docxweave_core::{
    convert, finish, renderer_for, ChunkKind, DocumentOutline, OutputFormat, ParseOptions,
    ParseSession, Settings, TraceRenderer, CONFIG_FILE_NAME,
};
use docxweave_ooxml::OoxmlArchive;

/// Output markup selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// HTML fragment
    Html,
    /// GitHub-flavored Markdown
    #[value(alias = "md")]
    Markdown,
    /// Plain text, tracked changes accepted
    #[value(alias = "txt")]
    Text,
    /// Rendering-call trace
    Trace,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Markdown => OutputFormat::Markdown,
            Format::Text => OutputFormat::Text,
            Format::Trace => OutputFormat::Trace,
        }
    }
}

/// Output format for the inspect report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docxweave")]
#[command(author, version, about = "Convert DOCX documents to HTML, Markdown or text", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Rendering options shared by `convert` and `batch`
///
/// Flags given here win over the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Configuration file (defaults to ./docxweave.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Wrap HTML output in a complete document
    #[arg(long)]
    pub standalone: bool,

    /// Include author and date of tracked changes
    #[arg(long)]
    pub revisions: bool,

    /// Mark comment anchors in the output
    #[arg(long)]
    pub comments: bool,
}

impl RenderArgs {
    /// Load the configuration file and apply the command-line overrides
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = load_settings(self.config.as_deref())?;
        self.apply(&mut settings);
        Ok(settings)
    }

    /// Apply the command-line overrides to loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(format) = self.format {
            settings.output.format = format.into();
        }
        settings.output.standalone |= self.standalone;
        settings.revisions.metadata |= self.revisions;
        settings.comments.annotate |= self.comments;
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single DOCX file
    Convert {
        /// Input DOCX file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Convert every DOCX file matching a glob pattern
    Batch {
        /// Glob pattern, e.g. "docs/**/*.docx"
        pattern: String,

        /// Output directory (defaults to next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show the parts and list structure of a DOCX file
    Inspect {
        /// Input DOCX file
        input: PathBuf,

        /// Report format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: InspectFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            render,
        } => {
            let settings = render.settings()?;
            convert_command(&input, output.as_deref(), &settings)?;
        }
        Commands::Batch {
            pattern,
            output,
            render,
        } => {
            let settings = render.settings()?;
            batch_command(&pattern, output.as_deref(), &settings)?;
        }
        Commands::Inspect { input, format } => {
            inspect_command(&input, format)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` directives are honored; `-v` raises the default level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

/// Convert one DOCX file to a string in the configured format
pub fn convert_file(input: &Path, settings: &Settings) -> Result<String> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let archive = OoxmlArchive::open(input)
        .with_context(|| format!("Failed to open DOCX file: {}", input.display()))?;
    let renderer = renderer_for(settings);
    let body = convert(&archive, renderer.as_ref(), settings)
        .with_context(|| format!("Failed to convert document: {}", input.display()))?;

    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(finish(settings, body, &title))
}

/// Execute the convert command
pub fn convert_command(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    info!("Converting {} to {}", input.display(), settings.output.format);
    let converted = convert_file(input, settings)?;

    match output {
        Some(path) => {
            fs::write(path, &converted)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Wrote {} ({} bytes)", path.display(), converted.len());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(converted.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Outcome of a batch run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files written
    pub converted: Vec<PathBuf>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

/// Execute the batch command
///
/// Every match is attempted; the command fails afterwards if any input did.
pub fn batch_command(
    pattern: &str,
    output_dir: Option<&Path>,
    settings: &Settings,
) -> Result<BatchSummary> {
    println!("docxweave v{}", docxweave_core::VERSION);
    println!("Converting: {}", pattern);

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create output directory: {}", dir.display())
        })?;
    }

    let mut summary = BatchSummary::default();
    for entry in glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
        let input = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Could not read {}", e);
                continue;
            }
        };
        if !is_docx(&input) {
            debug!("Skipping {}", input.display());
            continue;
        }

        let output = batch_output_path(&input, output_dir, settings.output.format);
        let result = convert_file(&input, settings).and_then(|converted| {
            fs::write(&output, converted)
                .with_context(|| format!("Failed to write output file: {}", output.display()))
        });

        match result {
            Ok(()) => {
                println!("  Created: {}", output.display());
                summary.converted.push(output);
            }
            Err(e) => {
                eprintln!("  Failed: {}: {:#}", input.display(), e);
                summary.failed.push((input, format!("{:#}", e)));
            }
        }
    }

    println!();
    println!(
        "Converted {} document(s), {} failed",
        summary.converted.len(),
        summary.failed.len()
    );

    if !summary.failed.is_empty() {
        anyhow::bail!(
            "{} of {} document(s) failed to convert",
            summary.failed.len(),
            summary.failed.len() + summary.converted.len()
        );
    }

    Ok(summary)
}

fn is_docx(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

/// Where batch output for `input` goes
fn batch_output_path(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let target = input.with_extension(format.extension());
    match (output_dir, target.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => target,
    }
}

/// Package parts and segmentation of one document
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Part names in the package, sorted
    pub parts: Vec<String>,
    /// Chunk outline of the main document
    pub outline: DocumentOutline,
}

impl Inspection {
    /// Open a DOCX file and outline it
    pub fn load(input: &Path) -> Result<Self> {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }

        let archive = OoxmlArchive::open(input)
            .with_context(|| format!("Failed to open DOCX file: {}", input.display()))?;
        let renderer = TraceRenderer::new();
        let session = ParseSession::from_package(&archive, &renderer, ParseOptions::default())
            .with_context(|| format!("Failed to parse document: {}", input.display()))?;
        let outline = session
            .outline()
            .with_context(|| format!("Failed to outline document: {}", input.display()))?;

        Ok(Self {
            parts: archive.file_list().into_iter().map(String::from).collect(),
            outline,
        })
    }

    /// JSON report
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "parts": self.parts,
            "outline": self.outline,
        })
    }

    /// Human-readable report
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Parts:").unwrap();
        for part in &self.parts {
            writeln!(out, "  {}", part).unwrap();
        }
        writeln!(out).unwrap();

        let outline = &self.outline;
        writeln!(out, "Paragraphs: {}", outline.paragraphs).unwrap();
        writeln!(out, "Tables: {}", outline.tables).unwrap();
        writeln!(out, "Chunks: {}", outline.chunks.len()).unwrap();
        for chunk in &outline.chunks {
            let kind = match chunk.kind {
                ChunkKind::Paragraphs => "paragraphs",
                ChunkKind::OrderedList => "ordered list",
                ChunkKind::UnorderedList => "unordered list",
            };
            write!(out, "  [{}] {} ({} paragraph(s))", chunk.index, kind, chunk.paragraphs).unwrap();
            if let (Some(num_id), Some(format)) = (&chunk.num_id, &chunk.format) {
                write!(out, " numId={} format={}", num_id, format).unwrap();
            }
            writeln!(out).unwrap();
        }
        out
    }
}

/// Execute the inspect command
pub fn inspect_command(input: &Path, format: InspectFormat) -> Result<()> {
    let inspection = Inspection::load(input)?;

    match format {
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&inspection.to_json())
                .context("Failed to serialize outline to JSON")?;
            println!("{}", json);
        }
        InspectFormat::Text => {
            println!("docxweave v{}", docxweave_core::VERSION);
            println!("Inspecting: {}", input.display());
            println!();
            print!("{}", inspection.to_text());
        }
    }

    Ok(())
}

/// Load settings from a config file or use defaults
fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_settings(path)
        }
        None => {
            let default = Path::new(CONFIG_FILE_NAME);
            if default.exists() {
                debug!("Using {}", default.display());
                return read_settings(default);
            }
            Ok(Settings::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}
