//! Primary build entry points: normalize → TOC → site → PDF.
//!
//! ```text
//! articles/**.md|mdx ─┐
//!                     ├─▶ docs/build/**.md ─▶ docs/toc.yaml ─▶ mkdocs build
//! examples/**.ipynb ──┘        │                                   │
//!        README.md ──▶ index.md                         (--build-pdf) pandoc ─▶ dist/*.pdf
//! ```
//!
//! Stages run strictly in sequence; any fatal error stops the run and leaves
//! whatever was already written on disk.

use crate::config::BuildConfig;
use crate::error::DocsError;
use crate::output::{BuildOutput, BuildStats, NormalizedDocument, Normalization};
use crate::pipeline::normalize::{copy_readme, Normalizer};
use crate::pipeline::scan::{Scanner, SourceKind};
use crate::pipeline::toc::TableOfContents;
use crate::publish;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};

/// Stage name reported to progress callbacks.
pub const STAGE: &str = "normalize";

/// Convert every source document into the build tree and copy the readme.
///
/// # Errors
/// Stops at the first fatal error: a missing notebook exporter, a converter
/// exiting with failure, or an unwritable build tree. A missing Markdown
/// converter is not an error (the file is copied verbatim).
pub fn generate_docs(config: &BuildConfig) -> Result<(Vec<NormalizedDocument>, BuildStats), DocsError> {
    let start = Instant::now();
    let build_root = config.build_root();
    let normalizer = Normalizer::new(&build_root, &config.tools);
    let cb = config.progress_callback.as_ref();

    if let Some(cb) = cb {
        cb.on_pipeline_start(STAGE, None);
    }

    let mut documents: Vec<NormalizedDocument> = Vec::new();
    let mut written = HashSet::new();
    let mut stats = BuildStats::default();
    for source in Scanner::from_config(config).scan() {
        if let Some(cb) = cb {
            cb.on_document_start(&source.relative);
        }
        let doc = normalizer.normalize(&source)?;
        if !written.insert(doc.destination.clone()) {
            stats.overwritten += 1;
            let earlier = documents
                .iter()
                .find(|d| d.destination == doc.destination)
                .map(|d| d.source.display().to_string())
                .unwrap_or_default();
            warn!(
                "{} overwrote {} (same destination as {})",
                source.relative.display(),
                doc.destination.display(),
                earlier
            );
        }
        match (&source.kind, &doc.normalization) {
            (SourceKind::Notebook, _) => stats.notebooks_exported += 1,
            (SourceKind::Markdown, Normalization::Converted) => stats.markdown_converted += 1,
            (SourceKind::Markdown, Normalization::CopiedVerbatim { .. }) => {
                stats.markdown_copied += 1
            }
        }
        if let Some(cb) = cb {
            cb.on_document_complete(&source.relative);
        }
        documents.push(doc);
    }

    stats.readme_copied = copy_readme(&config.readme_file(), &build_root)?;
    stats.duration_ms = start.elapsed().as_millis() as u64;

    if let Some(cb) = cb {
        cb.on_pipeline_complete(STAGE, documents.len(), 0);
    }
    info!(
        "Normalized {} documents into {} ({} converted, {} copied, {} notebooks) in {}ms",
        documents.len(),
        build_root.display(),
        stats.markdown_converted,
        stats.markdown_copied,
        stats.notebooks_exported,
        stats.duration_ms
    );
    Ok((documents, stats))
}

/// Build the table of contents from the build tree and write it.
pub fn generate_toc(config: &BuildConfig) -> Result<TableOfContents, DocsError> {
    let toc = TableOfContents::from_build_root(&config.build_root());
    toc.write(&config.toc_file())?;
    Ok(toc)
}

/// Normalize and index without publishing.
pub fn prepare(config: &BuildConfig) -> Result<BuildOutput, DocsError> {
    let (documents, stats) = generate_docs(config)?;
    let toc = generate_toc(config)?;
    Ok(BuildOutput {
        documents,
        toc,
        stats,
    })
}

/// The full primary pipeline: normalize, index, build the site and,
/// when `with_pdf` is set, the consolidated PDF.
pub fn run_build(config: &BuildConfig, with_pdf: bool) -> Result<BuildOutput, DocsError> {
    let output = prepare(config)?;
    publish::build_html(config)?;
    if with_pdf {
        publish::build_pdf(config)?;
    }
    Ok(output)
}
