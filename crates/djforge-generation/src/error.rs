//! Error types for the generation engine

use thiserror::Error;

use djforge_config::ServiceId;

/// A set of entities that resolved to the same output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    /// The colliding path, relative to the project root
    pub path: String,
    /// Names of every entity that resolved to this path, in declaration order
    pub entities: Vec<String>,
}

impl std::fmt::Display for PathCollision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <- {}", self.path, self.entities.join(", "))
    }
}

fn format_collisions(collisions: &[PathCollision]) -> String {
    collisions
        .iter()
        .map(PathCollision::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during resolution and rendering. All are fatal to
/// the current generation attempt; no partial output is ever committed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Missing or malformed required configuration
    #[error("validation failed: {}", .issues.join("; "))]
    Validation {
        /// All issues found in the same pass, in declaration order
        issues: Vec<String>,
    },

    /// The directory parent graph contains a cycle
    #[error("directory parent cycle: {}", .members.join(" -> "))]
    Cycle {
        /// Directory names along the cycle, ending where it closes
        members: Vec<String>,
    },

    /// Two or more entities resolve to the same absolute path
    #[error("conflicting output paths: {}", format_collisions(.collisions))]
    Conflict {
        /// Every collision detected in one pass, in declaration order
        collisions: Vec<PathCollision>,
    },

    /// Requested services contradict the dependency table
    #[error("unsatisfiable service dependency for {service}: {rule}")]
    UnsatisfiableDependency {
        /// The service whose requirement cannot be met
        service: ServiceId,
        /// The violated rule, naming the conflicting services
        rule: String,
    },

    /// A rendered output path escapes the project root
    #[error("unsafe template path `{path}` from template set {template_set}")]
    UnsafeTemplatePath {
        /// The offending path
        path: String,
        /// The template set that produced it
        template_set: String,
    },

    /// Two rendering stages produced the same output path
    #[error("manifest collision on `{path}`: produced by {first_stage} and {second_stage}")]
    ManifestCollision {
        /// The duplicated relative path
        path: String,
        /// Stage that wrote the path first
        first_stage: String,
        /// Stage that attempted the duplicate write
        second_stage: String,
    },

    /// The external rendering engine failed
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// IO error from the manifest writer collaborator
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The target directory already contains files and force was not set
    #[error("refusing to write into non-empty directory: {0}")]
    TargetNotEmpty(String),
}

impl GenerationError {
    /// Builds a validation error from collected issues.
    pub fn validation(issues: Vec<String>) -> Self {
        GenerationError::Validation { issues }
    }
}
