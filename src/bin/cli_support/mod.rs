//! Terminal plumbing shared by `build-docs` and `repo2pdf`: colours, logging
//! setup and an indicatif progress callback.

use cookbook_docs::{PipelineProgressCallback, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── Logging ──────────────────────────────────────────────────────────────────

/// Whether to draw the progress bar: only when stderr is a terminal.
pub fn show_progress() -> bool {
    io::stderr().is_terminal()
}

/// Install the stderr subscriber. `RUST_LOG` wins; otherwise INFO, or ERROR
/// while the progress bar is drawing (the bar reports each file itself).
pub fn init_logging(progress: bool) {
    let fallback = if progress { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .init();
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner while the document count is unknown, bar once it is.
pub struct CliProgressCallback {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    pub fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
        })
    }

    pub fn into_callback(self: Arc<Self>) -> ProgressCallback {
        self as Arc<dyn PipelineProgressCallback>
    }

    fn activate_bar(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);
        self.bar.set_length(total as u64);
        self.bar.set_style(style);
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, stage: &str, total: Option<usize>) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        if let Some(total) = total {
            self.activate_bar(total);
        }
        self.bar.set_prefix(stage.to_string());
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&match total {
                Some(n) => format!("{stage}: {n} files…"),
                None => format!("{stage}…"),
            })
        ));
    }

    fn on_document_start(&self, path: &Path) {
        self.bar.set_message(path.display().to_string());
    }

    fn on_document_complete(&self, path: &Path) {
        self.bar
            .println(format!("  {} {}", green("✓"), dim(&path.display().to_string())));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, path: &Path, error: &str) {
        // Keep the line on one row; the full error is in the log.
        let first_line = error.lines().next().unwrap_or_default();
        let msg = if first_line.chars().count() > 80 {
            let cut: String = first_line.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            first_line.to_string()
        };
        self.bar.println(format!(
            "  {} Skipping {} due to {}",
            red("✗"),
            path.display(),
            red(&msg)
        ));
        self.bar.inc(1);
    }

    fn on_pipeline_complete(&self, stage: &str, processed: usize, skipped: usize) {
        let elapsed = self
            .started
            .lock()
            .ok()
            .and_then(|s| (*s).map(|t| t.elapsed()))
            .unwrap_or_default();
        self.bar.finish_and_clear();

        let mark = if skipped == 0 { green("✔") } else { cyan("⚠") };
        let tail = if skipped == 0 {
            String::new()
        } else {
            format!("  ({} skipped)", red(&skipped.to_string()))
        };
        eprintln!(
            "{} {stage}: {} files{}  {}",
            mark,
            bold(&processed.to_string()),
            tail,
            dim(&format!("{:.1}s", elapsed.as_secs_f64()))
        );
    }
}
