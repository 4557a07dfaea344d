//! Pipeline stages for documentation builds.
//!
//! Each submodule implements exactly one step, so each is testable against a
//! temporary directory without the others.
//!
//! ## Data Flow
//!
//! ```text
//! build-docs:  scan ──▶ normalize ──▶ toc ──▶ (publish)
//!              (walk)   (pandoc /     (YAML)
//!                        nbconvert)
//!
//! repo2pdf:    aggregate ──▶ clean ──▶ render ──▶ (wkhtmltopdf)
//!              (walk +                 (HTML +
//!               nbconvert)              syntect)
//! ```
//!
//! 1. [`scan`]      — lazily walk source directories for recognised files
//! 2. [`clean`]     — drop shebang/encoding boilerplate lines
//! 3. [`normalize`] — map sources into the build tree, delegating to external
//!    converters
//! 4. [`toc`]       — index the build tree by section
//! 5. [`aggregate`] — concatenate a whole repository, skipping broken files
//! 6. [`render`]    — Markdown to highlighted HTML

pub mod aggregate;
pub mod clean;
pub mod normalize;
pub mod render;
pub mod scan;
pub mod toc;
