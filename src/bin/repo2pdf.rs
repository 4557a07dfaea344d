//! CLI binary for the single-document export.
//!
//! Aggregates every notebook and Markdown file under the current directory
//! into `cookbook.html` and renders `cookbook.pdf` from it.

mod cli_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::{bold, cyan, dim, green, init_logging, show_progress, CliProgressCallback};
use cookbook_docs::{export_repo, ExportConfig};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Export the repository in the current directory
  repo2pdf

  # Show every file as it is converted
  RUST_LOG=debug repo2pdf

EXTERNAL TOOLS (looked up on PATH):
  jupyter      notebook export (nbconvert)   required when notebooks exist
  wkhtmltopdf  HTML to PDF                   required

Files that fail to convert are skipped and listed; the export continues.
"#;

/// Export every notebook and Markdown file in the repository as one PDF.
#[derive(Parser, Debug)]
#[command(
    name = "repo2pdf",
    version,
    about = "Export every notebook and Markdown file in the repository as one PDF",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let progress = show_progress();
    init_logging(progress);

    let mut builder = ExportConfig::builder();
    if progress {
        builder = builder.progress_callback(CliProgressCallback::new().into_callback());
    }
    let config = builder.build().context("Invalid configuration")?;

    let output = export_repo(&config).context("Export failed")?;

    eprintln!(
        "{}  {} sections  {}ms",
        if output.skipped.is_empty() {
            green("✔")
        } else {
            cyan("⚠")
        },
        output.sections,
        output.duration_ms,
    );
    if !output.skipped.is_empty() {
        eprintln!("   {}", dim(&format!("{} files skipped", output.skipped.len())));
    }
    eprintln!("   →  {}", bold(&output.html_path.display().to_string()));
    println!("Wrote {}", output.pdf_path.display());
    Ok(())
}
