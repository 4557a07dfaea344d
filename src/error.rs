//! Error types for the cookbook-docs library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocsError`] — **Fatal**: the pipeline stage cannot proceed (a mandatory
//!   tool is missing, an external tool exited with failure, the build tree
//!   cannot be written). Returned as `Err(DocsError)` from every entry point.
//!
//! * [`FileError`] — **Non-fatal**: a single file could not be converted
//!   during aggregation. Stored inside
//!   [`crate::output::AggregatedDocument::skipped`] so one bad notebook does
//!   not block the rest of the export.
//!
//! A missing Markdown converter is neither: normalization degrades to a
//! verbatim copy and the outcome is recorded as
//! [`crate::output::Normalization::CopiedVerbatim`].

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All fatal errors returned by the cookbook-docs library.
#[derive(Debug, Error)]
pub enum DocsError {
    // ── Tool errors ───────────────────────────────────────────────────────
    /// A mandatory external tool is not on the search path.
    #[error("'{tool}' is required to {purpose}\nInstall it or make sure it is on PATH.")]
    MissingTool { tool: String, purpose: String },

    /// The tool was found but could not be started.
    #[error("Failed to start '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited with a failure status.
    #[error("'{tool}' failed ({status}){}", stderr_suffix(.stderr))]
    ExternalProcess {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Reading or writing a file in the source or build tree failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The table of contents could not be serialised.
    #[error("Failed to serialise table of contents: {0}")]
    TocSerialize(#[from] serde_yaml::Error),

    /// syntect failed while highlighting a code block or generating CSS.
    #[error("Syntax highlighting failed: {0}")]
    Highlight(String),

    /// A tool produced output that is not valid UTF-8.
    #[error("'{tool}' produced non UTF-8 output")]
    InvalidOutput { tool: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DocsError {
    /// Shorthand for wrapping an [`std::io::Error`] with the path involved.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocsError::Io {
            path: path.into(),
            source,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// A non-fatal error for a single file in the aggregation pipeline.
#[derive(Debug, Error)]
pub enum FileError {
    /// The notebook exporter exited with failure or produced unusable output.
    #[error("{path}: conversion failed: {detail}")]
    ConversionFailed { path: PathBuf, detail: String },

    /// The Markdown file could not be read as UTF-8 text.
    #[error("{path}: unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    /// The file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileError::ConversionFailed { path, .. } | FileError::Unreadable { path, .. } => path,
        }
    }
}
