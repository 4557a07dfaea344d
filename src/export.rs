//! Secondary entry points: export a whole repository as one HTML page and
//! one PDF.
//!
//! ```text
//! **.ipynb (sorted) ┐
//!                   ├─▶ aggregated Markdown ─▶ HTML + CSS ─▶ cookbook.html ─▶ wkhtmltopdf ─▶ cookbook.pdf
//! **.md (sorted) ───┘
//! ```

use crate::config::ExportConfig;
use crate::error::DocsError;
use crate::output::{write_atomic, AggregatedDocument, ExportOutput};
use crate::pipeline::aggregate::Aggregator;
use crate::pipeline::render::{self, DEFAULT_STYLESHEET};
use crate::publish;
use std::fs;
use std::time::Instant;
use tracing::info;

/// Aggregate every notebook and Markdown file under the repository root.
///
/// Individual files that fail are listed in
/// [`AggregatedDocument::skipped`]; only a missing exporter is fatal.
pub fn build_markdown(config: &ExportConfig) -> Result<AggregatedDocument, DocsError> {
    Aggregator::new(&config.repo_root, &config.tools)
        .with_progress(config.progress_callback.as_ref())
        .aggregate()
}

/// Render aggregated Markdown to a standalone HTML page.
pub fn render_html(markdown: &str, config: &ExportConfig) -> Result<String, DocsError> {
    let body = render::markdown_to_html(markdown)?;
    let highlight_css = render::highlight_css(&config.theme)?;
    let stylesheet = match config.css_path {
        Some(ref path) => fs::read_to_string(path).map_err(|e| DocsError::io(path, e))?,
        None => DEFAULT_STYLESHEET.to_string(),
    };
    Ok(render::wrap_html(&body, &highlight_css, &stylesheet))
}

/// Aggregate, render and write the HTML file, without the PDF step.
pub fn write_html(config: &ExportConfig) -> Result<(AggregatedDocument, std::path::PathBuf), DocsError> {
    let doc = build_markdown(config)?;
    let html = render_html(&doc.to_markdown(), config)?;
    let html_path = config.html_file();
    write_atomic(&html_path, html.as_bytes())?;
    info!(
        "Wrote {} ({} sections, {} skipped)",
        html_path.display(),
        doc.sections.len(),
        doc.skipped.len()
    );
    Ok((doc, html_path))
}

/// The full export: aggregate, render HTML, write it, render the PDF.
pub fn export_repo(config: &ExportConfig) -> Result<ExportOutput, DocsError> {
    let start = Instant::now();
    let (doc, html_path) = write_html(config)?;
    let pdf_path = config.pdf_file();
    publish::render_pdf(&config.tools, &html_path, &pdf_path)?;

    Ok(ExportOutput {
        html_path,
        pdf_path,
        sections: doc.sections.len(),
        skipped: doc.skipped,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
