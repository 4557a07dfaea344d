//! Result types returned by the build and export pipelines.

use crate::error::{DocsError, FileError};
use crate::pipeline::toc::TableOfContents;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a normalized document was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    /// The external converter (or notebook exporter) wrote the destination.
    Converted,
    /// The Markdown converter was missing; the source bytes were copied as-is.
    CopiedVerbatim { missing_tool: String },
}

/// One source file after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    /// Source path relative to the repository root.
    pub source: PathBuf,
    /// Destination path under the build root.
    pub destination: PathBuf,
    pub normalization: Normalization,
}

/// Counters for one run of the primary pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Markdown/MDX files reformatted by the converter.
    pub markdown_converted: usize,
    /// Markdown/MDX files copied verbatim because the converter was missing.
    pub markdown_copied: usize,
    /// Notebooks exported to Markdown.
    pub notebooks_exported: usize,
    /// Sources whose destination an earlier source in the same run had
    /// already written (e.g. `a.md` next to `a.mdx`).
    pub overwritten: usize,
    /// Whether the repository readme was copied to `index.md`.
    pub readme_copied: bool,
    pub duration_ms: u64,
}

/// Everything produced by [`crate::site::generate_docs`] and
/// [`crate::site::generate_toc`].
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub documents: Vec<NormalizedDocument>,
    pub toc: TableOfContents,
    pub stats: BuildStats,
}

/// One file's contribution to the aggregated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedSection {
    /// Path relative to the repository root, used as the section heading.
    pub relative: PathBuf,
    /// Cleaned Markdown body.
    pub content: String,
}

impl AggregatedSection {
    /// `# {relative}\n\n{content}\n`
    pub fn render(&self) -> String {
        format!("# {}\n\n{}\n", display_relative(&self.relative), self.content)
    }
}

/// Ordered concatenation of every convertible notebook and Markdown file.
#[derive(Debug, Default)]
pub struct AggregatedDocument {
    pub sections: Vec<AggregatedSection>,
    /// Files left out because their conversion failed.
    pub skipped: Vec<FileError>,
}

impl AggregatedDocument {
    /// Join every section's rendering with a newline.
    pub fn to_markdown(&self) -> String {
        self.sections
            .iter()
            .map(AggregatedSection::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of [`crate::export::export_repo`].
#[derive(Debug)]
pub struct ExportOutput {
    pub html_path: PathBuf,
    pub pdf_path: PathBuf,
    pub sections: usize,
    pub skipped: Vec<FileError>,
    pub duration_ms: u64,
}

/// Render a relative path with `/` separators on every platform.
pub(crate) fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// The result has the permissions of the file it replaces, or, for a new
/// file, the same mode a plain create would give (`0o666` minus the umask).
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocsError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| DocsError::io(parent, e))?;

    let existing = fs::metadata(path).ok().map(|m| m.permissions());

    #[allow(unused_mut)]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(parent)
        .map_err(|e| DocsError::io(parent, e))?;
    if let Some(perms) = existing {
        tmp.as_file()
            .set_permissions(perms)
            .map_err(|e| DocsError::io(path, e))?;
    }
    tmp.write_all(bytes).map_err(|e| DocsError::io(path, e))?;
    tmp.persist(path).map_err(|e| DocsError::io(path, e.error))?;
    Ok(())
}
