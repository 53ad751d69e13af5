//! Render manifest
//!
//! The complete set of output paths and rendered byte content for one
//! generation run. Duplicate relative paths are a hard error at insertion
//! time; last-writer-wins is never allowed. Iteration order is insertion
//! order, which the orchestrator keeps equal to declaration order.

use std::collections::HashMap;

use crate::error::GenerationError;

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Output path relative to the project root
    pub path: String,
    /// Rendered content
    pub content: Vec<u8>,
    /// The rendering stage that produced this entry
    pub stage: String,
}

/// Mapping from relative output path to rendered bytes
#[derive(Debug, Clone, Default)]
pub struct RenderManifest {
    entries: Vec<ManifestEntry>,
    index: HashMap<String, usize>,
}

impl RenderManifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rendered file, failing when the path was already produced
    /// by any stage. The error identifies both contributing stages.
    pub fn insert(
        &mut self,
        stage: &str,
        path: String,
        content: Vec<u8>,
    ) -> Result<(), GenerationError> {
        if let Some(&existing) = self.index.get(&path) {
            return Err(GenerationError::ManifestCollision {
                path,
                first_stage: self.entries[existing].stage.clone(),
                second_stage: stage.to_string(),
            });
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push(ManifestEntry {
            path,
            content,
            stage: stage.to_string(),
        });
        Ok(())
    }

    /// Absorbs another manifest, checking every entry for collisions.
    pub fn extend(&mut self, other: RenderManifest) -> Result<(), GenerationError> {
        for entry in other.entries {
            if let Some(&existing) = self.index.get(&entry.path) {
                return Err(GenerationError::ManifestCollision {
                    path: entry.path,
                    first_stage: self.entries[existing].stage.clone(),
                    second_stage: entry.stage,
                });
            }
            self.index.insert(entry.path.clone(), self.entries.len());
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Looks up rendered content by relative path.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.index
            .get(path)
            .map(|&i| self.entries[i].content.as_slice())
    }

    /// True when the manifest contains the path.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of rendered files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no file was rendered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
