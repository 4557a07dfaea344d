//! Boilerplate cleanup: drop interpreter and encoding header lines.
//!
//! Notebook exports and raw Markdown both carry leftovers from the source
//! scripts they were written next to: `#!/usr/bin/env python` shebangs and
//! `# coding: utf-8` declarations. In an aggregated document these render as
//! stray top-level headings, so they are removed line by line before the
//! text is concatenated.
//!
//! ## Rules
//!
//! 1. Drop every line whose trimmed content matches a boilerplate pattern
//! 2. Trim trailing whitespace from every retained line
//!
//! Both rules are line-local, so cleaning is idempotent.

use crate::error::DocsError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns matched (anchored at the start) against each trimmed line.
pub const DEFAULT_PATTERNS: [&str; 2] = [r"^#!/usr/bin/env python", r"^# coding: utf-8"];

static DEFAULT_CLEANER: Lazy<BoilerplateCleaner> = Lazy::new(|| BoilerplateCleaner {
    patterns: DEFAULT_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect(),
});

/// Clean `text` with the default boilerplate patterns.
///
/// Lines are split on `\n` and re-joined with `\n`, so a trailing newline
/// survives and `\r\n` endings become `\n`. Empty input yields empty output.
pub fn clean_text(text: &str) -> String {
    DEFAULT_CLEANER.clean(text)
}

/// Line filter over a configurable set of boilerplate patterns.
#[derive(Debug, Clone)]
pub struct BoilerplateCleaner {
    patterns: Vec<Regex>,
}

impl BoilerplateCleaner {
    /// Compile a custom pattern set.
    pub fn new<I, S>(patterns: I) -> Result<Self, DocsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    DocsError::InvalidConfig(format!(
                        "invalid boilerplate pattern '{}': {e}",
                        p.as_ref()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Apply both rules to `text`.
    pub fn clean(&self, text: &str) -> String {
        text.split('\n')
            .filter(|line| !self.is_boilerplate(line))
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        let trimmed = line.trim();
        self.patterns.iter().any(|p| match p.find(trimmed) {
            Some(m) => m.start() == 0,
            None => false,
        })
    }
}

impl Default for BoilerplateCleaner {
    fn default() -> Self {
        DEFAULT_CLEANER.clone()
    }
}
