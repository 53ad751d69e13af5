//! Input configuration document
//!
//! The serde model of the declarative surface consumed by the merger. The
//! same shape backs both the YAML file layer and the CLI/interactive layer;
//! the CLI builds a `ConfigDocument` directly from parsed flags.
//!
//! Every field is optional: a field left unset falls through to the next
//! lower-precedence layer during merging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level keys recognized in a config document
const TOP_LEVEL_KEYS: &[&str] = &["project_name", "core", "directories", "apps", "services"];
const CORE_KEYS: &[&str] = &["location", "path"];
const DIRECTORY_KEYS: &[&str] = &["name", "parent"];
const APP_KEYS: &[&str] = &["name", "dir", "path", "type"];
const SERVICE_KEYS: &[&str] = &["name", "options"];

/// The `core` section of a config document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSection {
    /// Core placement kind: `root` or `custom`
    pub location: Option<String>,
    /// Core package path, required when location is `custom`
    pub path: Option<String>,
}

/// A directory declaration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Directory name
    pub name: String,
    /// Parent directory name; absent means the project root
    pub parent: Option<String>,
}

/// An app declaration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    /// App name
    pub name: String,
    /// Declared directory the app lives in
    pub dir: Option<String>,
    /// Explicit output path, used verbatim
    pub path: Option<String>,
    /// Explicit app type override: `standard`, `api`, or `auth`
    #[serde(rename = "type")]
    pub app_type: Option<String>,
}

/// A service request entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Service identifier
    pub name: String,
    /// Service-scoped options
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

/// A partially-specified configuration layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Project name
    pub project_name: Option<String>,
    /// Core placement section
    pub core: Option<CoreSection>,
    /// Directory declarations, in order
    pub directories: Option<Vec<DirectoryEntry>>,
    /// App declarations, in order
    pub apps: Option<Vec<AppEntry>>,
    /// Service requests
    pub services: Option<Vec<ServiceEntry>>,
    /// Dotted paths of keys present in the source that the schema does not
    /// recognize. Populated by [`ConfigDocument::from_yaml_str`]; empty for
    /// documents built programmatically.
    #[serde(skip)]
    pub unknown_keys: Vec<String>,
}

impl ConfigDocument {
    /// Parses a YAML document, recording unrecognized keys instead of
    /// rejecting them. Strict-mode handling is the merger's decision.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(source)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        let unknown_keys = scan_unknown_keys(&value);
        let mut document: ConfigDocument = serde_yaml::from_value(prune_unknown(value))?;
        document.unknown_keys = unknown_keys;
        Ok(document)
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.project_name.is_none()
            && self.core.is_none()
            && self.directories.is_none()
            && self.apps.is_none()
            && self.services.is_none()
    }
}

/// Walks the raw document and collects dotted paths of unrecognized keys.
fn scan_unknown_keys(value: &serde_yaml::Value) -> Vec<String> {
    let mut unknown = Vec::new();
    let Some(mapping) = value.as_mapping() else {
        return unknown;
    };

    for (key, nested) in mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        if !TOP_LEVEL_KEYS.contains(&key) {
            unknown.push(key.to_string());
            continue;
        }
        match key {
            "core" => scan_mapping_keys(nested, "core", CORE_KEYS, &mut unknown),
            "directories" => scan_sequence_keys(nested, "directories", DIRECTORY_KEYS, &mut unknown),
            "apps" => scan_sequence_keys(nested, "apps", APP_KEYS, &mut unknown),
            "services" => scan_sequence_keys(nested, "services", SERVICE_KEYS, &mut unknown),
            _ => {}
        }
    }
    unknown
}

fn scan_mapping_keys(
    value: &serde_yaml::Value,
    prefix: &str,
    known: &[&str],
    unknown: &mut Vec<String>,
) {
    if let Some(mapping) = value.as_mapping() {
        for key in mapping.keys() {
            if let Some(key) = key.as_str() {
                if !known.contains(&key) {
                    unknown.push(format!("{prefix}.{key}"));
                }
            }
        }
    }
}

fn scan_sequence_keys(
    value: &serde_yaml::Value,
    prefix: &str,
    known: &[&str],
    unknown: &mut Vec<String>,
) {
    if let Some(sequence) = value.as_sequence() {
        for (index, entry) in sequence.iter().enumerate() {
            scan_mapping_keys(entry, &format!("{prefix}[{index}]"), known, unknown);
        }
    }
}

/// Drops unrecognized keys so deserialization of the known shape succeeds.
fn prune_unknown(value: serde_yaml::Value) -> serde_yaml::Value {
    let serde_yaml::Value::Mapping(mapping) = value else {
        return value;
    };
    let pruned = mapping
        .into_iter()
        .filter(|(key, _)| {
            key.as_str()
                .map(|k| TOP_LEVEL_KEYS.contains(&k))
                .unwrap_or(false)
        })
        .map(|(key, nested)| {
            let known: &[&str] = match key.as_str() {
                Some("core") => CORE_KEYS,
                Some("directories") => DIRECTORY_KEYS,
                Some("apps") => APP_KEYS,
                Some("services") => SERVICE_KEYS,
                _ => return (key, nested),
            };
            (key, prune_nested(nested, known))
        })
        .collect();
    serde_yaml::Value::Mapping(pruned)
}

fn prune_nested(value: serde_yaml::Value, known: &[&str]) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::Mapping(mapping) => serde_yaml::Value::Mapping(
            mapping
                .into_iter()
                .filter(|(key, _)| key.as_str().map(|k| known.contains(&k)).unwrap_or(false))
                .collect(),
        ),
        serde_yaml::Value::Sequence(sequence) => serde_yaml::Value::Sequence(
            sequence
                .into_iter()
                .map(|entry| prune_nested(entry, known))
                .collect(),
        ),
        other => other,
    }
}
