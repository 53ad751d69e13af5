//! Resolved project model
//!
//! Output of the resolution stages and input of rendering. Derived once from
//! a `ProjectSpec`, read-only thereafter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use djforge_config::{AppType, ServiceId};

/// Why a resolved service exists in the expanded set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Explicitly requested in the project spec
    Requested,
    /// Auto-added to satisfy a dependency of the named service
    ImpliedBy(ServiceId),
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Requested => f.write_str("requested"),
            Provenance::ImpliedBy(id) => write!(f, "implied by {id}"),
        }
    }
}

/// A service with fully-merged options and dependency provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedService {
    /// Service identifier
    pub id: ServiceId,
    /// Catalog defaults merged under user-supplied options, per key
    pub options: BTreeMap<String, serde_json::Value>,
    /// Record of why this service is present
    pub provenance: Provenance,
}

/// An app with its resolved path and classified type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedApp {
    /// App name
    pub name: String,
    /// Output path relative to the project root, forward-slash separated
    pub path: String,
    /// Python import path (the output path with `/` replaced by `.`)
    pub import_path: String,
    /// Classified app type
    pub app_type: AppType,
}

/// Fully resolved project, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProject {
    /// Project name
    pub name: String,
    /// Core package path relative to the project root
    pub core_path: String,
    /// Python import path of the core package
    pub core_import_path: String,
    /// Resolved apps, in declaration order
    pub apps: Vec<ResolvedApp>,
    /// Expanded services, in declaration order with implied services appended
    pub services: Vec<ResolvedService>,
}

impl ResolvedProject {
    /// Looks up an expanded service by id.
    pub fn service(&self, id: ServiceId) -> Option<&ResolvedService> {
        self.services.iter().find(|s| s.id == id)
    }

    /// True when the expanded service set contains `id`.
    pub fn has_service(&self, id: ServiceId) -> bool {
        self.service(id).is_some()
    }
}

/// Converts a relative output path to a Python import path.
pub fn import_path(path: &str) -> String {
    path.replace('/', ".")
}
