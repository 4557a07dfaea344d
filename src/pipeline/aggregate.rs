//! Aggregation: concatenate every notebook and Markdown file in a repository
//! into one document.
//!
//! Order: all notebooks sorted by path, then all Markdown files sorted by
//! path. Each file becomes `# {relative path}` followed by its cleaned body.
//!
//! One broken notebook must not sink a several-hundred-file export, so a file
//! that fails to convert is logged, reported through the progress callback
//! and recorded in [`AggregatedDocument::skipped`]; the rest continue. A
//! missing exporter is different: it would fail every notebook the same way,
//! so it is reported once, up front, as [`DocsError::MissingTool`].

use crate::config::ToolSet;
use crate::error::{DocsError, FileError};
use crate::output::{AggregatedDocument, AggregatedSection};
use crate::pipeline::clean::BoilerplateCleaner;
use crate::pipeline::scan::{walk_files, SourceKind};
use crate::progress::ProgressCallback;
use crate::tools::{require_tool, ExternalCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Stage name reported to progress callbacks.
pub const STAGE: &str = "aggregate";

/// Notebooks and Markdown files under `root`, each list sorted by path.
pub fn discover(root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut notebooks: Vec<PathBuf> = walk_files(root, &["ipynb"]).collect();
    let mut markdown: Vec<PathBuf> = walk_files(root, &["md"]).collect();
    notebooks.sort();
    markdown.sort();
    (notebooks, markdown)
}

/// Builds an [`AggregatedDocument`] for one repository.
pub struct Aggregator<'a> {
    root: &'a Path,
    tools: &'a ToolSet,
    cleaner: BoilerplateCleaner,
    progress: Option<&'a ProgressCallback>,
}

impl<'a> Aggregator<'a> {
    pub fn new(root: &'a Path, tools: &'a ToolSet) -> Self {
        Self {
            root,
            tools,
            cleaner: BoilerplateCleaner::default(),
            progress: None,
        }
    }

    pub fn with_cleaner(mut self, cleaner: BoilerplateCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_progress(mut self, progress: Option<&'a ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Discover, convert, and concatenate.
    pub fn aggregate(&self) -> Result<AggregatedDocument, DocsError> {
        let (notebooks, markdown) = discover(self.root);
        info!(
            "Aggregating {} notebooks and {} Markdown files from {}",
            notebooks.len(),
            markdown.len(),
            self.root.display()
        );

        if !notebooks.is_empty() {
            require_tool(
                &self.tools.notebook_exporter,
                "export notebooks for the aggregated document",
            )?;
        }

        if let Some(cb) = self.progress {
            cb.on_pipeline_start(STAGE, Some(notebooks.len() + markdown.len()));
        }

        let mut doc = AggregatedDocument::default();
        for path in notebooks.iter().chain(markdown.iter()) {
            let relative = path
                .strip_prefix(self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());

            if let Some(cb) = self.progress {
                cb.on_document_start(&relative);
            }

            match self.convert(path) {
                Ok(content) => {
                    debug!("Aggregated {}", relative.display());
                    if let Some(cb) = self.progress {
                        cb.on_document_complete(&relative);
                    }
                    doc.sections.push(AggregatedSection { relative, content });
                }
                Err(err) => {
                    warn!("Skipping {} due to {}", relative.display(), err);
                    if let Some(cb) = self.progress {
                        cb.on_document_skipped(&relative, &err.to_string());
                    }
                    doc.skipped.push(err);
                }
            }
        }

        if let Some(cb) = self.progress {
            cb.on_pipeline_complete(STAGE, doc.sections.len(), doc.skipped.len());
        }
        Ok(doc)
    }

    /// Convert one file to cleaned Markdown text.
    pub fn convert(&self, path: &Path) -> Result<String, FileError> {
        let raw = match SourceKind::of(path) {
            Some(SourceKind::Notebook) => self.export_notebook(path)?,
            _ => fs::read_to_string(path).map_err(|source| FileError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?,
        };
        Ok(self.cleaner.clean(&raw))
    }

    fn export_notebook(&self, path: &Path) -> Result<String, FileError> {
        ExternalCommand::new(self.tools.notebook_exporter.as_str())
            .args(["nbconvert", "--to", "markdown", "--stdout"])
            .arg(path)
            .capture()
            .map_err(|e| FileError::ConversionFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &[u8]) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }

    fn no_exporter() -> ToolSet {
        ToolSet {
            notebook_exporter: "cookbook-docs-missing-jupyter".into(),
            ..ToolSet::default()
        }
    }

    #[test]
    fn discover_sorts_each_kind() {
        let dir = TempDir::new().unwrap();
        for rel in ["z.md", "a/b.md", "n2.ipynb", "a/n1.ipynb", "skip.mdx"] {
            write(dir.path(), rel, b"x");
        }
        let (notebooks, markdown) = discover(dir.path());
        let rel = |v: Vec<PathBuf>| -> Vec<PathBuf> {
            v.into_iter()
                .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
                .collect()
        };
        assert_eq!(
            rel(notebooks),
            vec![PathBuf::from("a/n1.ipynb"), PathBuf::from("n2.ipynb")]
        );
        assert_eq!(
            rel(markdown),
            vec![PathBuf::from("a/b.md"), PathBuf::from("z.md")]
        );
    }

    #[test]
    fn markdown_only_needs_no_exporter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", b"#!/usr/bin/env python\nBee   \n");
        write(dir.path(), "a.md", b"Ay");
        let tools = no_exporter();

        let doc = Aggregator::new(dir.path(), &tools).aggregate().unwrap();

        assert!(doc.skipped.is_empty());
        assert_eq!(doc.to_markdown(), "# a.md\n\nAy\n\n# b.md\n\nBee\n\n");
    }

    #[test]
    fn notebooks_without_exporter_are_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.ipynb", b"{}");
        let tools = no_exporter();

        let err = Aggregator::new(dir.path(), &tools).aggregate().unwrap_err();
        assert!(matches!(err, DocsError::MissingTool { .. }));
    }

    #[test]
    fn unreadable_markdown_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", b"fine");
        write(dir.path(), "bad.md", &[0xff, 0xfe, 0x00, 0x80]);
        let tools = no_exporter();

        let doc = Aggregator::new(dir.path(), &tools).aggregate().unwrap();

        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].relative, PathBuf::from("good.md"));
        assert_eq!(doc.skipped.len(), 1);
        assert_eq!(doc.skipped[0].path(), dir.path().join("bad.md"));
    }

    #[test]
    fn custom_cleaner_replaces_defaults() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", b"# coding: utf-8\n<!-- draft -->\nText\n");
        let tools = no_exporter();

        let doc = Aggregator::new(dir.path(), &tools)
            .with_cleaner(BoilerplateCleaner::new([r"^<!-- draft"]).unwrap())
            .aggregate()
            .unwrap();

        assert_eq!(doc.sections[0].content, "# coding: utf-8\nText\n");
    }
}
