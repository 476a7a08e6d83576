//! Filesystem document store
//!
//! Resolves references the way a notes vault does: URLs pass through untouched, everything
//! else is looked up next to the referencing document first and at the vault root second.
//! Found files are returned as `file://` URLs. Files outside the vault root, reached through
//! `..` segments, absolute paths or symlinks, do not resolve.

use super::PathResolver;
use crate::block::strip_wiki_link;
use std::path::{Path, PathBuf};
use url::Url;

/// Schemes passed through without a filesystem lookup.
const PASSTHROUGH_SCHEMES: &[&str] = &["http", "https", "data", "file", "app"];

#[derive(Debug, Clone)]
pub struct VaultResolver {
    root: PathBuf,
}

impl VaultResolver {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical form of `candidate` when it lies inside the vault root.
    fn confine(&self, candidate: &Path) -> Option<PathBuf> {
        let root = self.root.canonicalize().ok()?;
        let resolved = candidate.canonicalize().ok()?;
        if resolved.starts_with(&root) {
            Some(resolved)
        } else {
            log::debug!("{} is outside the vault", candidate.display());
            None
        }
    }

    fn candidates(&self, reference: &str, context_path: &str) -> Vec<PathBuf> {
        let relative = Path::new(reference);
        if relative.is_absolute() {
            return vec![relative.to_path_buf()];
        }

        let mut candidates = Vec::new();
        if let Some(dir) = Path::new(context_path).parent() {
            let dir = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                self.root.join(dir)
            };
            candidates.push(dir.join(relative));
        }
        candidates.push(self.root.join(relative));
        candidates
    }
}

impl PathResolver for VaultResolver {
    fn resolve(&self, reference: &str, context_path: &str) -> Option<String> {
        let reference = strip_wiki_link(reference);
        if reference.is_empty() {
            return None;
        }

        if let Ok(url) = Url::parse(reference) {
            if PASSTHROUGH_SCHEMES.contains(&url.scheme()) {
                return Some(reference.to_string());
            }
        }

        let found = self
            .candidates(reference, context_path)
            .into_iter()
            .filter(|candidate| candidate.is_file())
            .find_map(|candidate| self.confine(&candidate))?;
        match Url::from_file_path(&found) {
            Ok(url) => Some(url.to_string()),
            Err(()) => {
                log::warn!("cannot address {}", found.display());
                None
            }
        }
    }
}
