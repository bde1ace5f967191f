//! Locating benchmark sources and staging working copies.
//!
//! Every file is copied to `<scratch>/<variant>/src/<relative path>` before the
//! tool chain rewrites it, so the originals are never touched and the serial
//! copies stay around as diff baselines for the other variants.

use crate::registry::{BenchmarkSpec, Variant};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the benchmark sources live on disk.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    /// Root of the main suite, holding `pkgs/<apps|kernels>/<benchmark>/src/`
    pub suite_root: PathBuf,

    /// Root of the separate OmpSs tree, holding `<benchmark>/src/`
    pub ompss_root: Option<PathBuf>,
}

impl SourceLayout {
    /// Whether sources for `variant` can be found at all.
    pub fn provides(&self, variant: Variant) -> bool {
        variant != Variant::OmpSs || self.ompss_root.is_some()
    }

    /// Source directory of `variant` of `bench`.
    pub fn source_dir(&self, bench: &BenchmarkSpec, variant: Variant) -> Option<PathBuf> {
        if variant == Variant::OmpSs {
            return self
                .ompss_root
                .as_ref()
                .map(|root| root.join(bench.name()).join("src"));
        }
        Some(
            self.suite_root
                .join("pkgs")
                .join(bench.category().dir_name())
                .join(bench.name())
                .join("src"),
        )
    }
}

/// Remove `#include` and `# include` lines. Every other byte is kept as is,
/// including encodings that are not UTF-8.
pub fn strip_include_directives(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for line in text
        .split_inclusive(|b| *b == b'\n')
        .filter(|line| !line.starts_with(b"#include") && !line.starts_with(b"# include"))
    {
        out.extend_from_slice(line);
    }
    out
}

/// Per-variant scratch directories for working copies.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
    keep_files: bool,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>, keep_files: bool) -> Self {
        Self {
            root: root.into(),
            keep_files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn variant_dir(&self, variant: Variant) -> PathBuf {
        self.root.join(variant.tag()).join("src")
    }

    pub fn staged_path(&self, variant: Variant, file: &str) -> PathBuf {
        self.variant_dir(variant).join(file)
    }

    /// Copy `source` to the working location of `file`, without include lines.
    pub fn stage(&self, source: &Path, variant: Variant, file: &str) -> Result<PathBuf> {
        let target = self.staged_path(variant, file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create scratch directory {:?}", parent))?;
        }

        let bytes =
            fs::read(source).with_context(|| format!("Failed to read source file {:?}", source))?;
        fs::write(&target, strip_include_directives(&bytes))
            .with_context(|| format!("Failed to write working copy {:?}", target))?;

        debug!("Staged {:?} -> {:?}", source, target);
        Ok(target)
    }

    /// Delete the working copies of `variants`, unless files are kept.
    pub fn cleanup(&self, variants: &[Variant]) -> Result<()> {
        if self.keep_files {
            debug!("Keeping working files under {:?}", self.root);
            return Ok(());
        }

        for variant in variants {
            let dir = self.root.join(variant.tag());
            match fs::remove_dir_all(&dir) {
                Ok(()) => debug!("Removed {:?}", dir),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove scratch directory {:?}: {}", dir, e),
            }
        }
        Ok(())
    }
}
