//! Format normalization: turn every source into canonical Markdown under the
//! build root.
//!
//! The two source kinds follow different policies when their tool is
//! missing:
//!
//! | Kind      | Tool                 | Tool missing                      |
//! |-----------|----------------------|-----------------------------------|
//! | Markdown  | `pandoc -t gfm`      | copy the source bytes verbatim    |
//! | Notebook  | `jupyter nbconvert`  | [`DocsError::MissingTool`], fatal |
//!
//! Markdown reformatting only improves consistency, the raw file is already
//! readable by the site builder. A notebook is JSON and is useless without
//! export.

use crate::config::ToolSet;
use crate::error::DocsError;
use crate::output::{NormalizedDocument, Normalization};
use crate::pipeline::scan::{SourceKind, SourcePath};
use crate::tools::{require_tool, tool_available, ExternalCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Fixed name the repository readme is copied to inside the build root.
pub const INDEX_FILE: &str = "index.md";

/// Map a source path (relative to the repository root) to its destination.
///
/// The relative path is kept whole under `build_root`, so the section root
/// (`articles`, `examples`, …) survives, and the extension becomes `.md`.
/// Two sources collide only when they share a directory and a stem
/// (`a.md` and `a.mdx`); the later one overwrites the earlier, and
/// [`crate::site::generate_docs`] logs a warning and counts it in
/// [`crate::output::BuildStats::overwritten`].
///
/// ```rust
/// use cookbook_docs::pipeline::normalize::destination_for;
/// use std::path::Path;
///
/// let dest = destination_for(Path::new("examples/sub/b.ipynb"), Path::new("docs/build"));
/// assert_eq!(dest, Path::new("docs/build/examples/sub/b.md"));
/// ```
pub fn destination_for(relative: &Path, build_root: &Path) -> PathBuf {
    build_root.join(relative).with_extension("md")
}

/// Converts discovered sources into the build tree.
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    build_root: &'a Path,
    tools: &'a ToolSet,
}

impl<'a> Normalizer<'a> {
    pub fn new(build_root: &'a Path, tools: &'a ToolSet) -> Self {
        Self { build_root, tools }
    }

    /// Normalize one source, dispatching on its kind.
    pub fn normalize(&self, source: &SourcePath) -> Result<NormalizedDocument, DocsError> {
        let destination = destination_for(&source.relative, self.build_root);
        ensure_parent(&destination)?;

        let normalization = match source.kind {
            SourceKind::Markdown => self.convert_markdown(&source.path, &destination)?,
            SourceKind::Notebook => self.convert_notebook(&source.path, &destination)?,
        };

        debug!(
            "Normalized {} -> {}",
            source.relative.display(),
            destination.display()
        );
        Ok(NormalizedDocument {
            source: source.relative.clone(),
            destination,
            normalization,
        })
    }

    /// Reformat Markdown/MDX to GitHub-flavoured Markdown, or copy verbatim
    /// when the converter is not installed.
    pub fn convert_markdown(&self, src: &Path, dest: &Path) -> Result<Normalization, DocsError> {
        let tool = &self.tools.markdown_converter;
        if tool_available(tool) {
            ExternalCommand::new(tool.as_str())
                .arg(src)
                .args(["-t", "gfm", "-o"])
                .arg(dest)
                .run()?;
            Ok(Normalization::Converted)
        } else {
            warn!(
                "'{}' not found, copying {} verbatim",
                tool,
                src.display()
            );
            fs::copy(src, dest).map_err(|e| DocsError::io(src, e))?;
            Ok(Normalization::CopiedVerbatim {
                missing_tool: tool.clone(),
            })
        }
    }

    /// Export a notebook to Markdown next to `dest`. There is no fallback.
    pub fn convert_notebook(&self, src: &Path, dest: &Path) -> Result<Normalization, DocsError> {
        let tool = &self.tools.notebook_exporter;
        require_tool(tool, "convert notebooks to Markdown")?;

        // nbconvert appends the `.md` itself, so it receives the bare stem.
        let stem = dest.file_stem().unwrap_or_default();
        let out_dir = dest.parent().unwrap_or(self.build_root);
        ExternalCommand::new(tool.as_str())
            .args(["nbconvert", "--to", "markdown"])
            .arg(src)
            .arg("--output")
            .arg(stem)
            .arg("--output-dir")
            .arg(out_dir)
            .run()?;
        Ok(Normalization::Converted)
    }
}

/// Copy `readme` to `<build_root>/index.md` if it exists.
///
/// Returns whether a copy was made; an absent readme is not an error.
pub fn copy_readme(readme: &Path, build_root: &Path) -> Result<bool, DocsError> {
    if !readme.is_file() {
        debug!("No readme at {}, skipping index", readme.display());
        return Ok(false);
    }
    fs::create_dir_all(build_root).map_err(|e| DocsError::io(build_root, e))?;
    let index = build_root.join(INDEX_FILE);
    fs::copy(readme, &index).map_err(|e| DocsError::io(readme, e))?;
    Ok(true)
}

fn ensure_parent(path: &Path) -> Result<(), DocsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;
    }
    Ok(())
}
