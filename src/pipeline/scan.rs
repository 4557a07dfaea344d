//! Source discovery: recursively walk the configured source directories.
//!
//! The walk is lazy: [`Scanner::scan`] returns an iterator that descends into
//! one directory at a time, so callers that stop early never touch the rest
//! of the tree. Ignore files (`.gitignore`, `.ignore`) are deliberately not
//! honoured and hidden entries are included; every file whose extension is
//! recognised is a document.

use crate::config::BuildConfig;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What kind of document a source file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// `.md` / `.mdx`, reformatted by the document converter.
    Markdown,
    /// `.ipynb`, exported by the notebook exporter.
    Notebook,
}

impl SourceKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("ipynb") {
            Some(SourceKind::Notebook)
        } else if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx") {
            Some(SourceKind::Markdown)
        } else {
            None
        }
    }

    /// Kind of a scanned file. `.ipynb` is a notebook; every other
    /// configured extension (including custom ones such as `txt`) takes the
    /// Markdown path and goes through the document converter.
    pub fn for_source(path: &Path) -> Self {
        match Self::of(path) {
            Some(SourceKind::Notebook) => SourceKind::Notebook,
            _ => SourceKind::Markdown,
        }
    }
}

/// A discovered documentation source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    /// Path as walked (repository root joined with the relative path).
    pub path: PathBuf,
    /// Path relative to the repository root, e.g. `articles/a.md`.
    pub relative: PathBuf,
    pub kind: SourceKind,
}

/// Walks source directories under a repository root.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    dirs: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl Scanner {
    /// Scanner over `dirs` (relative to `root`) with the default extensions.
    pub fn new<I, P>(root: impl Into<PathBuf>, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            root: root.into(),
            dirs: dirs.into_iter().map(Into::into).collect(),
            extensions: crate::config::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            root: config.repo_root.clone(),
            dirs: config.source_dirs.clone(),
            extensions: config.extensions.clone(),
        }
    }

    /// Replace the recognised extensions (leading dots and case are ignored).
    pub fn with_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Lazily yield every recognised source file.
    ///
    /// A directory that does not exist contributes nothing. Order follows the
    /// directory walk; callers that need a stable order sort the result.
    pub fn scan(&self) -> impl Iterator<Item = SourcePath> + '_ {
        self.dirs.iter().flat_map(move |dir| {
            let base = self.root.join(dir);
            if !base.is_dir() {
                debug!("Source directory {} does not exist, skipping", base.display());
            }
            walk_files(&base, &self.extensions).map(move |path| {
                let kind = SourceKind::for_source(&path);
                let relative = path
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.clone());
                SourcePath {
                    path,
                    relative,
                    kind,
                }
            })
        })
    }
}

/// Lazily yield every regular file under `dir` whose extension is in
/// `extensions` (compared case-insensitively, without the dot).
///
/// A symlink to a regular file counts as a file; symlinked directories are
/// not descended into. Yields nothing if `dir` is missing. Unreadable entries are logged and
/// skipped.
pub fn walk_files<'a, S>(dir: &Path, extensions: &'a [S]) -> impl Iterator<Item = PathBuf> + 'a
where
    S: AsRef<str>,
{
    let walker = dir.is_dir().then(|| {
        WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .build()
    });

    walker
        .into_iter()
        .flatten()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| match entry.file_type() {
            Some(t) if t.is_file() => true,
            Some(t) if t.is_symlink() => entry.path().is_file(),
            _ => false,
        })
        .map(ignore::DirEntry::into_path)
        .filter(move |path| has_extension(path, extensions))
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e.as_ref())))
}
