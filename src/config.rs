//! Configuration types for the build and export pipelines.
//!
//! Every output location is a path relative to a repository root, so the same
//! pipeline code runs against the real repository from the CLI and against a
//! throw-away `TempDir` from the tests. Absolute paths are also accepted and
//! used as-is.
//!
//! Both configs are built via builders with documented defaults, the same way
//! for the primary pipeline ([`BuildConfig`]) and the aggregated export
//! ([`ExportConfig`]).

use crate::error::DocsError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions recognised by the scanner by default.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["md", "mdx", "ipynb"];

/// Default syntect theme used for code highlighting in the export.
pub const DEFAULT_THEME: &str = "base16-eighties.dark";

// ── External tools ───────────────────────────────────────────────────────

/// Names (or absolute paths) of the external tools the pipelines delegate to.
///
/// Each name is resolved on `PATH` right before it is needed, so pointing a
/// field at a name that does not exist is how callers (and tests) exercise
/// the missing-tool policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    /// Document converter for Markdown/MDX and the consolidated PDF. Default: `pandoc`.
    pub markdown_converter: String,
    /// Notebook-to-Markdown exporter (`<tool> nbconvert …`). Default: `jupyter`.
    pub notebook_exporter: String,
    /// Static-site builder (`<tool> build`). Default: `mkdocs`.
    pub site_builder: String,
    /// HTML-to-PDF renderer. Default: `wkhtmltopdf`.
    pub pdf_renderer: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            markdown_converter: "pandoc".into(),
            notebook_exporter: "jupyter".into(),
            site_builder: "mkdocs".into(),
            pdf_renderer: "wkhtmltopdf".into(),
        }
    }
}

// ── Primary pipeline ─────────────────────────────────────────────────────

/// Configuration for the primary build: normalize → TOC → site → PDF.
///
/// # Example
/// ```rust
/// use cookbook_docs::BuildConfig;
///
/// let config = BuildConfig::builder()
///     .repo_root("/tmp/cookbook")
///     .source_dirs(["articles", "examples"])
///     .build_dir("docs/build")
///     .build()
///     .unwrap();
/// assert_eq!(config.build_root(), std::path::Path::new("/tmp/cookbook/docs/build"));
/// ```
#[derive(Clone)]
pub struct BuildConfig {
    /// Repository root every other path is resolved against. Default: `.`.
    pub repo_root: PathBuf,

    /// Directories scanned for documentation sources. Default: `articles`, `examples`.
    pub source_dirs: Vec<PathBuf>,

    /// Recognised source extensions, compared case-insensitively.
    /// `ipynb` is exported as a notebook; any other extension is treated as
    /// Markdown. Default: `md`, `mdx`, `ipynb`.
    pub extensions: Vec<String>,

    /// Output directory mirroring the source tree. Default: `docs/build`.
    pub build_dir: PathBuf,

    /// Generated table of contents. Default: `docs/toc.yaml`.
    pub toc_path: PathBuf,

    /// Consolidated PDF written by `--build-pdf`. Default: `dist/cookbook.pdf`.
    pub pdf_path: PathBuf,

    /// Repository readme copied to `<build_dir>/index.md`. Default: `README.md`.
    pub readme: PathBuf,

    /// External tools.
    pub tools: ToolSet,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            source_dirs: vec![PathBuf::from("articles"), PathBuf::from("examples")],
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            build_dir: PathBuf::from("docs/build"),
            toc_path: PathBuf::from("docs/toc.yaml"),
            pdf_path: PathBuf::from("dist/cookbook.pdf"),
            readme: PathBuf::from("README.md"),
            tools: ToolSet::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildConfig")
            .field("repo_root", &self.repo_root)
            .field("source_dirs", &self.source_dirs)
            .field("extensions", &self.extensions)
            .field("build_dir", &self.build_dir)
            .field("toc_path", &self.toc_path)
            .field("pdf_path", &self.pdf_path)
            .field("readme", &self.readme)
            .field("tools", &self.tools)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl BuildConfig {
    /// Create a new builder for `BuildConfig`.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute (or root-relative) location of the build tree.
    pub fn build_root(&self) -> PathBuf {
        self.repo_root.join(&self.build_dir)
    }

    /// Resolved TOC output path.
    pub fn toc_file(&self) -> PathBuf {
        self.repo_root.join(&self.toc_path)
    }

    /// Resolved consolidated PDF path.
    pub fn pdf_file(&self) -> PathBuf {
        self.repo_root.join(&self.pdf_path)
    }

    /// Resolved readme path.
    pub fn readme_file(&self) -> PathBuf {
        self.repo_root.join(&self.readme)
    }
}

/// Builder for [`BuildConfig`].
#[derive(Debug)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    pub fn repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.repo_root = root.into();
        self
    }

    pub fn source_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.source_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.build_dir = dir.into();
        self
    }

    pub fn toc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.toc_path = path.into();
        self
    }

    pub fn pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdf_path = path.into();
        self
    }

    pub fn readme(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.readme = path.into();
        self
    }

    pub fn tools(mut self, tools: ToolSet) -> Self {
        self.config.tools = tools;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BuildConfig, DocsError> {
        let c = &self.config;
        if c.source_dirs.is_empty() {
            return Err(DocsError::InvalidConfig(
                "at least one source directory is required".into(),
            ));
        }
        if c.extensions.iter().all(|e| e.is_empty()) {
            return Err(DocsError::InvalidConfig(
                "at least one source extension is required".into(),
            ));
        }
        if c.build_dir.as_os_str().is_empty() || c.build_dir == Path::new(".") {
            return Err(DocsError::InvalidConfig(
                "build directory must not be the repository root".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Export pipeline ──────────────────────────────────────────────────────

/// Configuration for the aggregated HTML/PDF export.
#[derive(Clone)]
pub struct ExportConfig {
    /// Repository root that is walked for notebooks and Markdown. Default: `.`.
    pub repo_root: PathBuf,

    /// Aggregated HTML output. Default: `cookbook.html`.
    pub html_path: PathBuf,

    /// PDF rendered from the HTML. Default: `cookbook.pdf`.
    pub pdf_path: PathBuf,

    /// Stylesheet appended after the highlighter CSS. `None` uses the
    /// built-in stylesheet.
    pub css_path: Option<PathBuf>,

    /// syntect theme for code blocks. Default: [`DEFAULT_THEME`].
    pub theme: String,

    /// External tools.
    pub tools: ToolSet,

    /// Optional per-file progress events, including skip notices.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            html_path: PathBuf::from("cookbook.html"),
            pdf_path: PathBuf::from("cookbook.pdf"),
            css_path: None,
            theme: DEFAULT_THEME.to_string(),
            tools: ToolSet::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("repo_root", &self.repo_root)
            .field("html_path", &self.html_path)
            .field("pdf_path", &self.pdf_path)
            .field("css_path", &self.css_path)
            .field("theme", &self.theme)
            .field("tools", &self.tools)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PipelineProgressCallback>"),
            )
            .finish()
    }
}

impl ExportConfig {
    /// Create a new builder for `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolved HTML output path.
    pub fn html_file(&self) -> PathBuf {
        self.repo_root.join(&self.html_path)
    }

    /// Resolved PDF output path.
    pub fn pdf_file(&self) -> PathBuf {
        self.repo_root.join(&self.pdf_path)
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn repo_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.repo_root = root.into();
        self
    }

    pub fn html_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.html_path = path.into();
        self
    }

    pub fn pdf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdf_path = path.into();
        self
    }

    pub fn css_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.css_path = Some(path.into());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.config.theme = theme.into();
        self
    }

    pub fn tools(mut self, tools: ToolSet) -> Self {
        self.config.tools = tools;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating the theme name against syntect's
    /// bundled themes.
    pub fn build(self) -> Result<ExportConfig, DocsError> {
        if !crate::pipeline::render::theme_exists(&self.config.theme) {
            return Err(DocsError::InvalidConfig(format!(
                "unknown highlight theme '{}'",
                self.config.theme
            )));
        }
        if self.config.html_path == self.config.pdf_path {
            return Err(DocsError::InvalidConfig(
                "HTML and PDF outputs must be different files".into(),
            ));
        }
        Ok(self.config)
    }
}
