//! Layered configuration merging
//!
//! Combines schema defaults, file-supplied overrides, and CLI/interactive
//! overrides into one resolved `ProjectSpec`. Precedence is per-field, low to
//! high: defaults < file < CLI. A field unset at a higher layer falls through
//! to the next lower layer; a set field replaces the lower value wholesale.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::defaults::{
    is_valid_app_name, is_valid_directory_name, is_valid_project_name, DefaultSettings,
};
use crate::document::ConfigDocument;
use crate::error::{ConfigError, Result};
use crate::types::{
    AppDecl, AppType, CoreFiles, CoreLocation, DirectoryDecl, ProjectSpec, ServiceDecl, ServiceId,
};

/// The layer an unknown key was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// The YAML file layer
    File,
    /// The CLI/interactive layer
    Cli,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLayer::File => f.write_str("file"),
            ConfigLayer::Cli => f.write_str("cli"),
        }
    }
}

/// Warning-class diagnostic for an unrecognized key. Non-fatal unless strict
/// mode is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyWarning {
    /// The layer the key appeared in
    pub layer: ConfigLayer,
    /// Dotted path of the key
    pub key: String,
}

impl fmt::Display for UnknownKeyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key `{}` in {} configuration", self.key, self.layer)
    }
}

/// A merged configuration: the resolved spec plus the warning side channel
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// The fully resolved, immutable project specification
    pub spec: ProjectSpec,
    /// Unknown-key warnings collected across layers
    pub warnings: Vec<UnknownKeyWarning>,
}

/// Merges the three configuration layers into a `ProjectSpec`.
///
/// Unknown keys become warnings, or a fatal [`ConfigError::UnknownKeys`] in
/// strict mode. A missing or malformed project name is fatal regardless of
/// mode, as are invalid app/directory names, duplicate names, and unknown
/// service or app-type identifiers. All validation issues detected in the
/// same pass are reported together.
pub fn merge(
    defaults: &DefaultSettings,
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    strict: bool,
) -> Result<MergedConfig> {
    let warnings = collect_unknown_keys(file, cli);
    if strict && !warnings.is_empty() {
        return Err(ConfigError::UnknownKeys {
            keys: warnings.iter().map(|w| w.key.clone()).collect(),
        });
    }

    let mut issues = Vec::new();

    let project_name = pick(cli, file, |d| d.project_name.clone());
    let project_name = match project_name {
        Some(name) if is_valid_project_name(&name) => name,
        Some(name) => {
            issues.push(format!("invalid project name: {name}"));
            name
        }
        None => {
            issues.push("missing required field: project_name".to_string());
            String::new()
        }
    };

    let core = merge_core(defaults, file, cli, &mut issues);
    let directories = merge_directories(file, cli, &mut issues);
    let apps = merge_apps(file, cli, &mut issues);
    let services = merge_services(file, cli, &mut issues);

    if !issues.is_empty() {
        return Err(ConfigError::validation(issues));
    }

    debug!(
        project_name = %project_name,
        directories = directories.len(),
        apps = apps.len(),
        services = services.len(),
        "merged configuration layers"
    );

    Ok(MergedConfig {
        spec: ProjectSpec {
            project_name,
            core,
            directories,
            apps,
            services,
        },
        warnings,
    })
}

/// Picks the highest-precedence value of one field: CLI, then file.
fn pick<T>(
    cli: Option<&ConfigDocument>,
    file: Option<&ConfigDocument>,
    get: impl Fn(&ConfigDocument) -> Option<T>,
) -> Option<T> {
    cli.and_then(&get).or_else(|| file.and_then(&get))
}

fn collect_unknown_keys(
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
) -> Vec<UnknownKeyWarning> {
    let mut warnings = Vec::new();
    if let Some(file) = file {
        warnings.extend(file.unknown_keys.iter().map(|key| UnknownKeyWarning {
            layer: ConfigLayer::File,
            key: key.clone(),
        }));
    }
    if let Some(cli) = cli {
        warnings.extend(cli.unknown_keys.iter().map(|key| UnknownKeyWarning {
            layer: ConfigLayer::Cli,
            key: key.clone(),
        }));
    }
    warnings
}

fn merge_core(
    defaults: &DefaultSettings,
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    issues: &mut Vec<String>,
) -> CoreFiles {
    let default_core = defaults.core_files();

    // location and path fall through per-field, not as a section
    let location = pick(cli, file, |d| {
        d.core.as_ref().and_then(|c| c.location.clone())
    });
    let path = pick(cli, file, |d| d.core.as_ref().and_then(|c| c.path.clone()));

    let location = match location.as_deref() {
        None => default_core.location,
        Some("root") => CoreLocation::Root,
        Some("custom") => CoreLocation::Custom,
        Some(other) => {
            issues.push(format!("invalid core location: {other} (expected root or custom)"));
            default_core.location
        }
    };

    let path = match (location, path) {
        (CoreLocation::Root, _) => default_core.path,
        (CoreLocation::Custom, Some(path)) if !path.is_empty() => path,
        (CoreLocation::Custom, _) => {
            issues.push("core location is custom but core.path is not set".to_string());
            default_core.path
        }
    };

    CoreFiles { location, path }
}

fn merge_directories(
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    issues: &mut Vec<String>,
) -> Vec<DirectoryDecl> {
    let entries = pick(cli, file, |d| d.directories.clone()).unwrap_or_default();
    let mut seen = BTreeSet::new();
    let mut directories = Vec::with_capacity(entries.len());
    for entry in entries {
        if !is_valid_directory_name(&entry.name) {
            issues.push(format!("invalid directory name: {}", entry.name));
        }
        if !seen.insert(entry.name.clone()) {
            issues.push(format!("duplicate directory name: {}", entry.name));
        }
        directories.push(DirectoryDecl {
            name: entry.name,
            parent: entry.parent.filter(|p| !p.is_empty()),
        });
    }
    directories
}

fn merge_apps(
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    issues: &mut Vec<String>,
) -> Vec<AppDecl> {
    let entries = pick(cli, file, |d| d.apps.clone()).unwrap_or_default();
    let mut seen = BTreeSet::new();
    let mut apps = Vec::with_capacity(entries.len());
    for entry in entries {
        if !is_valid_app_name(&entry.name) {
            issues.push(format!("invalid app name: {}", entry.name));
        }
        if !seen.insert(entry.name.clone()) {
            issues.push(format!("duplicate app name: {}", entry.name));
        }
        let app_type = match entry.app_type.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<AppType>() {
                Ok(app_type) => Some(app_type),
                Err(message) => {
                    issues.push(format!("app {}: {message}", entry.name));
                    None
                }
            },
        };
        apps.push(AppDecl {
            name: entry.name,
            directory: entry.dir.filter(|d| !d.is_empty()),
            path: entry.path.filter(|p| !p.is_empty()),
            app_type,
        });
    }
    apps
}

fn merge_services(
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    issues: &mut Vec<String>,
) -> Vec<ServiceDecl> {
    let entries = pick(cli, file, |d| d.services.clone()).unwrap_or_default();
    let mut services = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.name.parse::<ServiceId>() {
            Ok(id) => services.push(ServiceDecl {
                id,
                options: entry.options,
            }),
            Err(message) => issues.push(message),
        }
    }
    services
}
