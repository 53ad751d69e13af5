//! Manifest output
//!
//! Writing the rendered manifest to disk is separated from rendering so the
//! pipeline can be exercised without touching the filesystem. [`FsWriter`]
//! materializes the files; [`DryRunWriter`] only records what would be
//! written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::GenerationError;
use crate::manifest::RenderManifest;

/// Sink for a rendered manifest.
pub trait ManifestWriter {
    /// Writes every manifest entry under `target`, returning the full paths
    /// in manifest order.
    fn write(
        &self,
        manifest: &RenderManifest,
        target: &Path,
    ) -> Result<Vec<PathBuf>, GenerationError>;
}

/// Writes manifest entries to the filesystem.
pub struct FsWriter {
    force: bool,
}

impl FsWriter {
    /// Creates a writer that refuses a non-empty target directory unless
    /// `force` is set.
    pub fn new(force: bool) -> Self {
        Self { force }
    }
}

impl ManifestWriter for FsWriter {
    fn write(
        &self,
        manifest: &RenderManifest,
        target: &Path,
    ) -> Result<Vec<PathBuf>, GenerationError> {
        if !self.force && target.exists() {
            let mut entries = fs::read_dir(target)?;
            if entries.next().is_some() {
                return Err(GenerationError::TargetNotEmpty(
                    target.display().to_string(),
                ));
            }
        }

        let mut written = Vec::with_capacity(manifest.len());
        for entry in manifest.entries() {
            let full = target.join(&entry.path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full, &entry.content)?;
            debug!(path = %full.display(), bytes = entry.content.len(), "wrote file");
            written.push(full);
        }
        info!(target = %target.display(), files = written.len(), "project written");
        Ok(written)
    }
}

/// Records the paths a run would produce without writing anything.
#[derive(Default)]
pub struct DryRunWriter;

impl ManifestWriter for DryRunWriter {
    fn write(
        &self,
        manifest: &RenderManifest,
        target: &Path,
    ) -> Result<Vec<PathBuf>, GenerationError> {
        Ok(manifest
            .entries()
            .iter()
            .map(|entry| target.join(&entry.path))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> RenderManifest {
        let mut manifest = RenderManifest::new();
        manifest
            .insert("project", "manage.py".to_string(), b"#!/usr/bin/env python".to_vec())
            .unwrap();
        manifest
            .insert("core", "core/settings/base.py".to_string(), b"DEBUG = False".to_vec())
            .unwrap();
        manifest
    }

    #[test]
    fn test_fs_writer_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("myproject");
        let written = FsWriter::new(false).write(&manifest(), &target).unwrap();
        assert_eq!(written.len(), 2);
        let content = fs::read_to_string(target.join("core/settings/base.py")).unwrap();
        assert_eq!(content, "DEBUG = False");
    }

    #[test]
    fn test_fs_writer_rejects_non_empty_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("existing.txt"), "x").unwrap();
        let err = FsWriter::new(false)
            .write(&manifest(), dir.path())
            .unwrap_err();
        assert!(matches!(err, GenerationError::TargetNotEmpty(_)));
    }

    #[test]
    fn test_fs_writer_force_overwrites_non_empty_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("existing.txt"), "x").unwrap();
        let written = FsWriter::new(true).write(&manifest(), dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("manage.py").exists());
    }

    #[test]
    fn test_fs_writer_accepts_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("does-not-exist-yet");
        FsWriter::new(false).write(&manifest(), &target).unwrap();
        assert!(target.join("manage.py").exists());
    }

    #[test]
    fn test_dry_run_writer_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("myproject");
        let planned = DryRunWriter.write(&manifest(), &target).unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0], target.join("manage.py"));
        assert!(!target.exists());
    }
}
