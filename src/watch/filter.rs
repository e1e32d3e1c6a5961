// src/watch/filter.rs

use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Decides which changed paths are allowed to trigger a rebuild.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    excludes: GlobSet,
}

impl ChangeFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
            builder.add(glob);
        }
        let excludes = builder.build().context("building exclude glob set")?;
        Ok(Self { excludes })
    }

    /// Relative (forward-slash) form of `path` if it lives under `root` and
    /// is not excluded.
    pub fn relevant(&self, root: &Path, path: &Path) -> Option<String> {
        let rel = relative_str(root, path)?;
        if self.excludes.is_match(&rel) {
            None
        } else {
            Some(rel)
        }
    }
}

/// Relativize `path` against `root`, normalizing separators to `/`.
///
/// Falls back to comparing canonical paths (macOS reports `/private/var/...`
/// for `/var/...`). `None` for paths outside `root` and for `root` itself.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            let root_canon = root.canonicalize().ok()?;
            let path_canon = path.canonicalize().ok()?;
            path_canon.strip_prefix(&root_canon).ok()?.to_path_buf()
        }
    };

    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { None } else { Some(s) }
}
