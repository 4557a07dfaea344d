//! # cookbook-docs
//!
//! Turn a repository of Markdown/MDX articles and Jupyter notebooks into a
//! documentation build: a normalized Markdown tree, a table of contents, a
//! static site, and PDFs.
//!
//! ## Pipelines
//!
//! ```text
//! build-docs   scan ─▶ normalize ─▶ toc ─▶ mkdocs build ─▶ (pandoc PDF)
//! repo2pdf     aggregate ─▶ clean ─▶ HTML + syntect ─▶ wkhtmltopdf
//! ```
//!
//! The heavy lifting (format conversion, notebook export, site and PDF
//! rendering) is delegated to external tools found on `PATH`. Each call site
//! states what happens when its tool is missing: the Markdown converter
//! degrades to a verbatim copy, every other tool is mandatory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cookbook_docs::{site, BuildConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BuildConfig::builder().repo_root(".").build()?;
//!     let output = site::prepare(&config)?;
//!     for (section, entries) in &output.toc.sections {
//!         println!("{section}: {} documents", entries.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `build-docs` and `repo2pdf` binaries (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod publish;
pub mod site;
pub mod tools;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BuildConfig, BuildConfigBuilder, ExportConfig, ExportConfigBuilder, ToolSet};
pub use error::{DocsError, FileError};
pub use export::export_repo;
pub use output::{
    AggregatedDocument, AggregatedSection, BuildOutput, BuildStats, ExportOutput,
    NormalizedDocument, Normalization,
};
pub use pipeline::clean::clean_text;
pub use pipeline::scan::{Scanner, SourceKind, SourcePath};
pub use pipeline::toc::{TableOfContents, TocEntry};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback};
pub use site::run_build;
pub use tools::tool_available;
