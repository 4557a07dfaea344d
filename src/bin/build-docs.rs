//! CLI binary for the primary documentation build.
//!
//! Runs in the current directory: normalizes `articles/` and `examples/` into
//! `docs/build/`, writes `docs/toc.yaml`, runs `mkdocs build` and, with
//! `--build-pdf`, renders `dist/cookbook.pdf`.

mod cli_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli_support::{bold, cyan, dim, green, init_logging, show_progress, CliProgressCallback};
use cookbook_docs::{run_build, tool_available, BuildConfig};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Normalize, index and build the site
  build-docs

  # Also render the consolidated PDF
  build-docs --build-pdf

  # Verbose logging
  RUST_LOG=debug build-docs

EXTERNAL TOOLS (looked up on PATH):
  pandoc     Markdown reformatting and the PDF   optional for reformatting
  jupyter    notebook export (nbconvert)         required when notebooks exist
  mkdocs     static site                         required

OUTPUTS:
  docs/build/**.md    normalized Markdown tree
  docs/build/index.md copy of README.md
  docs/toc.yaml       table of contents
  dist/cookbook.pdf   with --build-pdf
"#;

/// Build the documentation site from articles and notebooks.
#[derive(Parser, Debug)]
#[command(
    name = "build-docs",
    version,
    about = "Build the documentation site from articles and notebooks",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Also build the consolidated PDF.
    #[arg(long)]
    build_pdf: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = show_progress();
    init_logging(progress);

    let mut builder = BuildConfig::builder();
    if progress {
        builder = builder.progress_callback(CliProgressCallback::new().into_callback());
    }
    let config = builder.build().context("Invalid configuration")?;

    if !tool_available(&config.tools.markdown_converter) {
        eprintln!(
            "{} {} not found, Markdown files will be copied without reformatting",
            cyan("⚠"),
            bold(&config.tools.markdown_converter)
        );
    }

    let output = run_build(&config, cli.build_pdf).context("Documentation build failed")?;

    eprintln!(
        "{}  {} documents  {} TOC entries  {}ms",
        green("✔"),
        output.documents.len(),
        output.toc.len(),
        output.stats.duration_ms,
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{} converted  /  {} copied  /  {} notebooks",
            output.stats.markdown_converted,
            output.stats.markdown_copied,
            output.stats.notebooks_exported
        ))
    );
    if output.stats.overwritten > 0 {
        eprintln!(
            "   {} {} sources overwrote another with the same stem",
            cyan("⚠"),
            output.stats.overwritten
        );
    }
    if cli.build_pdf {
        eprintln!("   →  {}", bold(&config.pdf_file().display().to_string()));
    }
    Ok(())
}
