#![warn(missing_docs)]

//! Configuration layer for djforge
//!
//! Provides the schema of recognized options with their defaults, the serde
//! model of the declarative input document (YAML or CLI-built), and the
//! layered merger that resolves defaults, file overrides, and CLI overrides
//! into a single immutable `ProjectSpec`.

pub mod defaults;
pub mod document;
pub mod error;
pub mod merge;
pub mod types;

pub use defaults::{
    is_valid_app_name, is_valid_directory_name, is_valid_project_name, DefaultSettings,
    ProjectStructureDefaults, RESERVED_NAMES,
};
pub use document::{AppEntry, ConfigDocument, CoreSection, DirectoryEntry, ServiceEntry};
pub use error::{ConfigError, Result};
pub use merge::{merge, ConfigLayer, MergedConfig, UnknownKeyWarning};
pub use types::{
    AppDecl, AppType, CoreFiles, CoreLocation, DirectoryDecl, ProjectSpec, ServiceDecl, ServiceId,
};
