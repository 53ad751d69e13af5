//! Path resolution
//!
//! Computes the output path of every directory, app, and the core package
//! from the declared layout. Fails with `Cycle` when the directory parent
//! graph loops, and with `Conflict` when two entities resolve to the same
//! path. Conflict detection runs over the full entity set in one pass, in
//! declaration order, so diagnostics are reproducible across runs.

use std::collections::BTreeMap;

use tracing::debug;

use djforge_config::{AppDecl, CoreFiles, CoreLocation, DirectoryDecl};

use crate::error::{GenerationError, PathCollision};

/// Resolved paths for every declared entity, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Core package path relative to the project root
    pub core_path: String,
    /// Directory name to resolved path, in declaration order
    pub directories: Vec<(String, String)>,
    /// App name to resolved path, in declaration order
    pub apps: Vec<(String, String)>,
}

/// Resolves all declared directories, apps, and the core placement.
pub fn resolve(
    directories: &[DirectoryDecl],
    apps: &[AppDecl],
    core: &CoreFiles,
) -> Result<ResolvedPaths, GenerationError> {
    validate_references(directories, apps)?;

    let directory_paths = resolve_directories(directories)?;

    let mut app_paths = Vec::with_capacity(apps.len());
    for app in apps {
        let path = match (&app.path, &app.directory) {
            // explicit path is used verbatim, still checked for uniqueness
            (Some(path), _) => normalize(path),
            (None, Some(directory)) => {
                let base = directory_paths
                    .iter()
                    .find(|(name, _)| name == directory)
                    .map(|(_, path)| path.as_str())
                    .unwrap_or_default();
                format!("{base}/{}", app.name)
            }
            (None, None) => app.name.clone(),
        };
        app_paths.push((app.name.clone(), path));
    }

    let core_path = match core.location {
        CoreLocation::Root => core.path.clone(),
        CoreLocation::Custom => normalize(&core.path),
    };

    detect_conflicts(&app_paths, &core_path)?;

    debug!(
        core_path = %core_path,
        directories = directory_paths.len(),
        apps = app_paths.len(),
        "resolved project paths"
    );

    Ok(ResolvedPaths {
        core_path,
        directories: directory_paths,
        apps: app_paths,
    })
}

/// Checks that every parent and directory reference names a declared
/// directory. All dangling references are reported together.
fn validate_references(
    directories: &[DirectoryDecl],
    apps: &[AppDecl],
) -> Result<(), GenerationError> {
    let declared: Vec<&str> = directories.iter().map(|d| d.name.as_str()).collect();
    let mut issues = Vec::new();

    for directory in directories {
        if let Some(parent) = &directory.parent {
            if !declared.contains(&parent.as_str()) {
                issues.push(format!(
                    "directory {} references undeclared parent {parent}",
                    directory.name
                ));
            }
        }
    }
    for app in apps {
        if let Some(directory) = &app.directory {
            if !declared.contains(&directory.as_str()) {
                issues.push(format!(
                    "app {} placed in undeclared directory {directory}",
                    app.name
                ));
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::validation(issues))
    }
}

/// Computes directory paths root-to-leaf, failing on the first cycle found.
fn resolve_directories(
    directories: &[DirectoryDecl],
) -> Result<Vec<(String, String)>, GenerationError> {
    let parents: BTreeMap<&str, Option<&str>> = directories
        .iter()
        .map(|d| (d.name.as_str(), d.parent.as_deref()))
        .collect();

    let mut resolved: BTreeMap<String, String> = BTreeMap::new();
    let mut ordered = Vec::with_capacity(directories.len());

    for directory in directories {
        // walk the parent chain, collecting unresolved ancestors
        let mut chain: Vec<&str> = Vec::new();
        let mut current = directory.name.as_str();
        let base = loop {
            if let Some(path) = resolved.get(current) {
                break Some(path.clone());
            }
            if let Some(position) = chain.iter().position(|&n| n == current) {
                let mut members: Vec<String> =
                    chain[position..].iter().map(|s| s.to_string()).collect();
                members.push(current.to_string());
                return Err(GenerationError::Cycle { members });
            }
            chain.push(current);
            match parents.get(current).copied().flatten() {
                Some(parent) => current = parent,
                None => break None,
            }
        };

        // materialize paths for the collected chain, deepest ancestor first
        let mut prefix = base.unwrap_or_default();
        for name in chain.into_iter().rev() {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };
            resolved.insert(name.to_string(), path.clone());
            prefix = path;
        }

        ordered.push((
            directory.name.clone(),
            resolved[directory.name.as_str()].clone(),
        ));
    }

    Ok(ordered)
}

/// Single declaration-order pass over the full entity set. Every collision
/// is reported, each naming all contributing entities.
fn detect_conflicts(
    app_paths: &[(String, String)],
    core_path: &str,
) -> Result<(), GenerationError> {
    let mut entities: Vec<(&str, String)> = app_paths
        .iter()
        .map(|(name, path)| (path.as_str(), format!("app {name}")))
        .collect();
    entities.push((core_path, "core files".to_string()));

    let mut collisions: Vec<PathCollision> = Vec::new();
    for (index, (path, entity)) in entities.iter().enumerate() {
        if entities[..index].iter().any(|(p, _)| p == path) {
            match collisions.iter_mut().find(|c| c.path == *path) {
                Some(collision) => collision.entities.push(entity.clone()),
                None => {
                    let first = entities[..index]
                        .iter()
                        .find(|(p, _)| p == path)
                        .map(|(_, e)| e.clone())
                        .unwrap_or_default();
                    collisions.push(PathCollision {
                        path: path.to_string(),
                        entities: vec![first, entity.clone()],
                    });
                }
            }
        }
    }

    if collisions.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::Conflict { collisions })
    }
}

/// Strips leading `./`, trailing slashes, and collapses backslashes so
/// verbatim paths compare consistently.
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .trim_start_matches("./")
        .trim_matches('/')
        .to_string()
}
