#![warn(missing_docs)]

//! Project generation module for djforge
//!
//! Turns a merged project spec into a rendered file manifest: resolves the
//! directory layout, expands service dependencies, classifies apps, renders
//! the template sets, and writes the result. Rendering is pure; filesystem
//! access is confined to the writer.

pub mod classifier;
pub mod error;
pub mod manifest;
pub mod models;
pub mod orchestrator;
pub mod paths;
pub mod services;
pub mod templates;
pub mod writer;

// Re-export public API
pub use classifier::classify;
pub use error::{GenerationError, PathCollision};
pub use manifest::{ManifestEntry, RenderManifest};
pub use models::{import_path, Provenance, ResolvedApp, ResolvedProject, ResolvedService};
pub use orchestrator::Orchestrator;
pub use paths::{resolve, ResolvedPaths};
pub use services::{expand, from_decls};
pub use templates::{HandlebarsRenderer, TemplateRenderer};
pub use writer::{DryRunWriter, FsWriter, ManifestWriter};
