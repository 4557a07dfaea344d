//! Integration tests for the build and export pipelines.
//!
//! Every test runs inside a `TempDir` laid out like a small cookbook
//! repository. External tools are either pointed at a name that cannot exist
//! (absent) or replaced by a short shell script written into the temp dir
//! (present, unix only).

use cookbook_docs::{
    export, site, BuildConfig, DocsError, ExportConfig, Normalization, PipelineProgressCallback,
    ToolSet,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(&p, body).unwrap();
    p
}

fn absent(name: &str) -> String {
    format!("cookbook-docs-test-absent-{name}")
}

fn no_tools() -> ToolSet {
    ToolSet {
        markdown_converter: absent("pandoc"),
        notebook_exporter: absent("jupyter"),
        site_builder: absent("mkdocs"),
        pdf_renderer: absent("wkhtmltopdf"),
    }
}

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

/// Stand-in for `jupyter nbconvert`. File mode copies the notebook to
/// `<output-dir>/<output>.md`; `--stdout` mode prints a shebang, an encoding
/// line and a body. Any notebook named `broken.ipynb` fails.
#[cfg(unix)]
fn fake_jupyter(dir: &Path) -> String {
    script(
        dir,
        "fake-jupyter",
        r#"if [ "$4" = "--stdout" ]; then
  case "$5" in
    *broken.ipynb) echo "notebook is corrupt" >&2; exit 1 ;;
  esac
  printf '#!/usr/bin/env python\n# coding: utf-8\nexported %s\n' "$(basename "$5")"
  exit 0
fi
case "$4" in
  *broken.ipynb) echo "notebook is corrupt" >&2; exit 1 ;;
esac
cp "$4" "$8/$6.md"
"#,
    )
}

#[derive(Default)]
struct Recorder {
    skipped: Mutex<Vec<(PathBuf, String)>>,
    completed: Mutex<Vec<PathBuf>>,
}

impl PipelineProgressCallback for Recorder {
    fn on_document_complete(&self, path: &Path) {
        self.completed.lock().unwrap().push(path.to_path_buf());
    }

    fn on_document_skipped(&self, path: &Path, error: &str) {
        self.skipped
            .lock()
            .unwrap()
            .push((path.to_path_buf(), error.to_string()));
    }
}

// ── Primary pipeline ─────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn articles_and_notebooks_normalize_and_index() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    write(&root, "articles/a.md", "# A\n");
    write(&root, "examples/sub/b.ipynb", "{\"cells\": []}");

    let config = BuildConfig::builder()
        .repo_root(&root)
        .tools(ToolSet {
            notebook_exporter: fake_jupyter(dir.path()),
            ..no_tools()
        })
        .build()
        .unwrap();

    let output = site::prepare(&config).unwrap();

    let build = config.build_root();
    assert!(build.join("articles/a.md").is_file());
    assert!(build.join("examples/sub/b.md").is_file());
    assert_eq!(output.documents.len(), 2);
    assert_eq!(output.stats.notebooks_exported, 1);
    assert_eq!(output.stats.markdown_copied, 1);

    let keys: Vec<_> = output.toc.sections.keys().cloned().collect();
    assert_eq!(keys, vec!["articles", "examples"]);
    assert_eq!(output.toc.sections["articles"][0].title, "A");
    assert_eq!(output.toc.sections["examples"][0].title, "B");
    assert_eq!(output.toc.sections["examples"][0].path, "examples/sub/b.md");

    let yaml = fs::read_to_string(config.toc_file()).unwrap();
    assert_eq!(
        yaml,
        "articles:\n- path: articles/a.md\n  title: A\nexamples:\n- path: examples/sub/b.md\n  title: B\n"
    );
}

#[test]
fn missing_markdown_converter_copies_bytes() {
    let dir = TempDir::new().unwrap();
    let body = "# Title\r\n\n<Tabs>mdx stays as-is</Tabs>\n\u{1F600}\n";
    write(dir.path(), "articles/guide.mdx", body);

    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let (docs, stats) = site::generate_docs(&config).unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(
        docs[0].normalization,
        Normalization::CopiedVerbatim {
            missing_tool: absent("pandoc")
        }
    );
    assert_eq!(stats.markdown_copied, 1);
    let copied = fs::read(config.build_root().join("articles/guide.md")).unwrap();
    assert_eq!(copied, body.as_bytes());
}

#[test]
fn missing_notebook_exporter_is_fatal_and_writes_no_toc() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "examples/nb.ipynb", "{}");

    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let err = site::run_build(&config, false).unwrap_err();
    match err {
        DocsError::MissingTool { tool, .. } => assert_eq!(tool, absent("jupyter")),
        other => panic!("expected MissingTool, got {other}"),
    }
    assert!(!config.toc_file().exists());
}

#[test]
fn readme_becomes_index() {
    let dir = TempDir::new().unwrap();
    let readme = "# Cookbook\n\nWelcome.\n";
    write(dir.path(), "README.md", readme);
    write(dir.path(), "articles/a.md", "# A\n");

    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let output = site::prepare(&config).unwrap();

    assert!(output.stats.readme_copied);
    let index = fs::read_to_string(config.build_root().join("index.md")).unwrap();
    assert_eq!(index, readme);
    assert_eq!(output.toc.sections["index.md"][0].path, "index.md");
}

#[test]
fn toc_is_byte_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    for rel in [
        "articles/zeta.md",
        "articles/alpha_beta.md",
        "articles/deep/nested-one.mdx",
        "examples/x.md",
    ] {
        write(dir.path(), rel, "text\n");
    }

    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    site::prepare(&config).unwrap();
    let first = fs::read(config.toc_file()).unwrap();
    site::prepare(&config).unwrap();
    let second = fs::read(config.toc_file()).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    let alpha = text.find("articles/alpha_beta.md").unwrap();
    let nested = text.find("articles/deep/nested-one.md").unwrap();
    let zeta = text.find("articles/zeta.md").unwrap();
    assert!(alpha < nested && nested < zeta, "entries not sorted:\n{text}");
    assert!(text.contains("title: Alpha Beta"));
    assert!(text.contains("title: Nested-One"));
}

#[test]
fn same_stem_sources_share_a_destination_and_are_counted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "articles/intro.md", "plain\n");
    write(dir.path(), "articles/intro.mdx", "mdx\n");
    write(dir.path(), "articles/other.md", "other\n");

    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let output = site::prepare(&config).unwrap();

    assert_eq!(output.documents.len(), 3);
    assert_eq!(output.stats.overwritten, 1);
    assert_eq!(output.toc.sections["articles"].len(), 2);
    let intro = config.build_root().join("articles/intro.md");
    let written: Vec<_> = output
        .documents
        .iter()
        .filter(|d| d.destination == intro)
        .collect();
    assert_eq!(written.len(), 2);
}

#[test]
fn missing_source_dirs_give_empty_build() {
    let dir = TempDir::new().unwrap();
    let config = BuildConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let output = site::prepare(&config).unwrap();
    assert!(output.documents.is_empty());
    assert!(output.toc.is_empty());
    assert_eq!(fs::read_to_string(config.toc_file()).unwrap(), "{}\n");
}

#[cfg(unix)]
#[test]
fn run_build_invokes_site_builder_in_repo_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    write(&root, "articles/a.md", "# A\n");
    let mkdocs = script(dir.path(), "fake-mkdocs", "mkdir -p site && echo \"$1\" > site/invoked\n");

    let config = BuildConfig::builder()
        .repo_root(&root)
        .tools(ToolSet {
            site_builder: mkdocs,
            ..no_tools()
        })
        .build()
        .unwrap();

    site::run_build(&config, false).unwrap();
    assert_eq!(
        fs::read_to_string(root.join("site/invoked")).unwrap(),
        "build\n"
    );
    assert!(!config.pdf_file().exists());
}

// ── Export pipeline ──────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn aggregation_skips_failed_file_and_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    write(&root, "notebooks/good.ipynb", "{}");
    write(&root, "notebooks/broken.ipynb", "{}");
    write(&root, "docs/guide.md", "# coding: utf-8\nGuide body\n");

    let recorder = Arc::new(Recorder::default());
    let config = ExportConfig::builder()
        .repo_root(&root)
        .tools(ToolSet {
            notebook_exporter: fake_jupyter(dir.path()),
            ..no_tools()
        })
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let doc = export::build_markdown(&config).unwrap();

    let sections: Vec<_> = doc.sections.iter().map(|s| s.relative.clone()).collect();
    assert_eq!(
        sections,
        vec![
            PathBuf::from("notebooks/good.ipynb"),
            PathBuf::from("docs/guide.md")
        ]
    );
    assert_eq!(doc.sections[0].content, "exported good.ipynb\n");
    assert_eq!(doc.sections[1].content, "Guide body\n");

    assert_eq!(doc.skipped.len(), 1);
    assert!(doc.skipped[0].path().ends_with("notebooks/broken.ipynb"));

    let skipped = recorder.skipped.lock().unwrap();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, PathBuf::from("notebooks/broken.ipynb"));
    assert_eq!(recorder.completed.lock().unwrap().len(), 2);

    let markdown = doc.to_markdown();
    assert!(markdown.starts_with("# notebooks/good.ipynb\n\nexported good.ipynb\n"));
    assert!(markdown.contains("# docs/guide.md\n\nGuide body\n"));
    assert!(!markdown.contains("broken"));
}

#[test]
fn aggregation_without_exporter_fails_when_notebooks_exist() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.ipynb", "{}");

    let config = ExportConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let err = export::build_markdown(&config).unwrap_err();
    assert!(matches!(err, DocsError::MissingTool { .. }), "got {err}");
}

#[test]
fn markdown_only_repo_needs_no_exporter() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.md", "B\n");
    write(dir.path(), "a.md", "#!/usr/bin/env python\nA\n");

    let config = ExportConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let doc = export::build_markdown(&config).unwrap();
    assert_eq!(doc.to_markdown(), "# a.md\n\nA\n\n\n# b.md\n\nB\n\n");
}

#[test]
fn write_html_produces_styled_page() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "guide.md",
        "Intro\n\n```python\nprint('hi')\n```\n",
    );

    let config = ExportConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let (doc, html_path) = export::write_html(&config).unwrap();
    assert_eq!(doc.sections.len(), 1);
    assert_eq!(html_path, dir.path().join("cookbook.html"));

    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.starts_with("<html><head><meta charset='utf-8'><style>"));
    assert!(html.contains("<h1>guide.md</h1>"));
    assert!(html.contains("codehilite"));
    assert!(html.ends_with("</body></html>"));
}

#[test]
fn export_requires_pdf_renderer() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.md", "A\n");

    let config = ExportConfig::builder()
        .repo_root(dir.path())
        .tools(no_tools())
        .build()
        .unwrap();

    let err = cookbook_docs::export_repo(&config).unwrap_err();
    match err {
        DocsError::MissingTool { tool, .. } => assert_eq!(tool, absent("wkhtmltopdf")),
        other => panic!("expected MissingTool, got {other}"),
    }
    // The HTML stage completed before the renderer was needed.
    assert!(config.html_file().is_file());
}

#[cfg(unix)]
#[test]
fn export_hands_html_to_renderer() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    write(&root, "a.md", "A\n");
    let renderer = script(dir.path(), "fake-wkhtmltopdf", "cp \"$5\" \"$6\"\n");

    let config = ExportConfig::builder()
        .repo_root(&root)
        .tools(ToolSet {
            pdf_renderer: renderer,
            ..no_tools()
        })
        .build()
        .unwrap();

    let output = cookbook_docs::export_repo(&config).unwrap();
    assert_eq!(output.sections, 1);
    assert!(output.skipped.is_empty());
    assert_eq!(
        fs::read(&output.pdf_path).unwrap(),
        fs::read(&output.html_path).unwrap()
    );
}
