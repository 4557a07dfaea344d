//! Publishers: hand the normalized tree or aggregated HTML to external
//! builders.
//!
//! All three tools are mandatory where they are used; a missing one is
//! [`DocsError::MissingTool`] and a failing one is
//! [`DocsError::ExternalProcess`].

use crate::config::{BuildConfig, ToolSet};
use crate::error::DocsError;
use crate::pipeline::scan::walk_files;
use crate::tools::{require_tool, ExternalCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run the static-site builder (`mkdocs build`) in the repository root.
pub fn build_html(config: &BuildConfig) -> Result<(), DocsError> {
    let tool = &config.tools.site_builder;
    require_tool(tool, "build HTML documentation")?;
    info!("Building HTML site with {}", tool);
    ExternalCommand::new(tool.as_str())
        .arg("build")
        .current_dir(&config.repo_root)
        .run()
}

/// Concatenate every normalized Markdown file into one PDF with the
/// document converter. Returns the PDF path.
pub fn build_pdf(config: &BuildConfig) -> Result<PathBuf, DocsError> {
    let tool = &config.tools.markdown_converter;
    require_tool(tool, "build the PDF")?;

    let mut files: Vec<PathBuf> = walk_files(&config.build_root(), &["md"]).collect();
    files.sort();

    let pdf = config.pdf_file();
    if let Some(parent) = pdf.parent() {
        fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
    }

    info!("Rendering {} Markdown files to {}", files.len(), pdf.display());
    ExternalCommand::new(tool.as_str())
        .args(&files)
        .arg("-o")
        .arg(&pdf)
        .run()?;
    Ok(pdf)
}

/// Render an HTML file to PDF with the HTML-to-PDF renderer.
pub fn render_pdf(tools: &ToolSet, html: &Path, pdf: &Path) -> Result<(), DocsError> {
    let tool = &tools.pdf_renderer;
    require_tool(tool, "render the PDF")?;
    if let Some(parent) = pdf.parent() {
        fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
    }
    info!("Rendering {} to {}", html.display(), pdf.display());
    ExternalCommand::new(tool.as_str())
        .args(["--quiet", "--encoding", "utf-8", "--enable-local-file-access"])
        .arg(html)
        .arg(pdf)
        .run()
}
