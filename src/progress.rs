//! Progress-callback trait for per-document pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::BuildConfigBuilder::progress_callback`] or
//! [`crate::config::ExportConfigBuilder::progress_callback`] to receive events
//! as each document is normalized or aggregated. The binaries use it to drive
//! a terminal spinner and to print skip notices; tests use it to count events.
//!
//! # Example
//!
//! ```rust
//! use cookbook_docs::{BuildConfig, PipelineProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, path: &Path) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}: {}", path.display());
//!     }
//! }
//!
//! let config = BuildConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { completed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipelines as they process each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Paths are relative to the repository root.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before any document is processed.
    ///
    /// # Arguments
    /// * `stage` — short stage name (`"normalize"`, `"aggregate"`, …)
    /// * `total` — number of documents, when known up front
    fn on_pipeline_start(&self, stage: &str, total: Option<usize>) {
        let _ = (stage, total);
    }

    /// Called just before a document is converted.
    fn on_document_start(&self, path: &Path) {
        let _ = path;
    }

    /// Called when a document was converted (or copied) successfully.
    fn on_document_complete(&self, path: &Path) {
        let _ = path;
    }

    /// Called when a document failed and was left out of the output.
    ///
    /// # Arguments
    /// * `path`  — the skipped document
    /// * `error` — human-readable reason
    fn on_document_skipped(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `stage`     — same name passed to `on_pipeline_start`
    /// * `processed` — documents that made it into the output
    /// * `skipped`   — documents left out
    fn on_pipeline_complete(&self, stage: &str, processed: usize, skipped: usize) {
        let _ = (stage, processed, skipped);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the pipeline configs.
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
