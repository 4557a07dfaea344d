//! Table of contents: index the normalized build tree by top-level section.
//!
//! The TOC is regenerated from whatever is on disk under the build root, not
//! from the normalizer's return values, so it also picks up `index.md` and
//! any file a previous run left behind.
//!
//! Output is YAML, e.g.
//!
//! ```yaml
//! articles:
//! - path: articles/a.md
//!   title: A
//! examples:
//! - path: examples/sub/b.md
//!   title: B
//! ```
//!
//! Determinism: sections live in a `BTreeMap`, entries are sorted by path,
//! and nothing time- or environment-dependent is written, so two runs over
//! the same tree produce identical bytes.

use crate::error::DocsError;
use crate::output::{display_relative, write_atomic};
use crate::pipeline::scan::walk_files;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// One document in the table of contents.
///
/// Field order is the serialised key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Path relative to the build root, `/`-separated.
    pub path: String,
    /// Human-readable title derived from the file stem.
    pub title: String,
}

/// Section name → entries sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableOfContents {
    pub sections: BTreeMap<String, Vec<TocEntry>>,
}

impl TableOfContents {
    /// Scan every `.md` file under `build_root` and group by first path
    /// segment. A missing build root gives an empty TOC.
    pub fn from_build_root(build_root: &Path) -> Self {
        let mut files: Vec<PathBuf> = walk_files(build_root, &["md"])
            .filter_map(|p| p.strip_prefix(build_root).ok().map(Path::to_path_buf))
            .collect();
        files.sort();

        let mut sections: BTreeMap<String, Vec<TocEntry>> = BTreeMap::new();
        for rel in files {
            let Some(section) = rel.components().next() else {
                continue;
            };
            let section = section.as_os_str().to_string_lossy().into_owned();
            let stem = rel
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            sections.entry(section).or_default().push(TocEntry {
                path: display_relative(&rel),
                title: title_from_stem(&stem),
            });
        }
        Self { sections }
    }

    /// Total number of entries across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    /// Serialise to YAML.
    pub fn to_yaml(&self) -> Result<String, DocsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the YAML to `path`, creating parent directories.
    ///
    /// The file is written to a temporary sibling and renamed into place.
    pub fn write(&self, path: &Path) -> Result<(), DocsError> {
        let yaml = self.to_yaml()?;
        write_atomic(path, yaml.as_bytes())?;
        info!(
            "Wrote table of contents ({} sections, {} entries) to {}",
            self.sections.len(),
            self.len(),
            path.display()
        );
        Ok(())
    }
}

/// Turn a file stem into a title: `_` becomes a space and every alphabetic
/// run is capitalised, so hyphens stay and the letter after one is upper
/// case (`getting_started-v2` → `Getting Started-V2`).
pub fn title_from_stem(stem: &str) -> String {
    let spaced = stem.replace('_', " ");
    let mut title = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            title.push(c);
            prev_alpha = false;
        }
    }
    title
}
