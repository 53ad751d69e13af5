//! Command-line argument definitions
//!
//! Repeatable layout flags use compact colon/comma notation so a whole
//! project can be declared without a config file:
//!   --app name[:directory][:type]
//!   --dir name[:parent]
//!   --service name[:key=value,...]
//! Flag values layer on top of the config file, which layers on top of the
//! built-in defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use djforge_config::{AppEntry, ConfigDocument, CoreSection, DirectoryEntry, ServiceEntry};

/// djforge - Django project boilerplate generator
#[derive(Parser, Debug)]
#[command(name = "djforge")]
#[command(about = "Generate Django project boilerplate from a declarative layout")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a new Django project
    New {
        /// Project name
        #[arg(value_name = "NAME")]
        name: String,

        /// Config file with the project layout
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Declare an app: name[:directory][:type]
        #[arg(long = "app", value_name = "APP")]
        apps: Vec<String>,

        /// Declare a directory: name[:parent]
        #[arg(long = "dir", value_name = "DIR")]
        dirs: Vec<String>,

        /// Enable a service: name[:key=value,...]
        #[arg(long = "service", value_name = "SERVICE")]
        services: Vec<String>,

        /// Place the core package at a custom path
        #[arg(long, value_name = "PATH")]
        core_path: Option<String>,

        /// Output directory (default: ./<NAME>)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Treat unknown config keys as errors
        #[arg(long)]
        strict: bool,

        /// List the files that would be written without writing them
        #[arg(long)]
        dry_run: bool,

        /// Write into a non-empty output directory
        #[arg(long)]
        force: bool,
    },

    /// Check a config file without generating anything
    Validate {
        /// Config file with the project layout
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Treat unknown config keys as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Builds the CLI override layer for `new` from the flag values.
pub fn cli_overrides(
    name: &str,
    apps: &[String],
    dirs: &[String],
    services: &[String],
    core_path: Option<&str>,
) -> Result<ConfigDocument, String> {
    let mut document = ConfigDocument {
        project_name: Some(name.to_string()),
        ..ConfigDocument::default()
    };

    if let Some(path) = core_path {
        document.core = Some(CoreSection {
            location: Some("custom".to_string()),
            path: Some(path.to_string()),
        });
    }
    if !dirs.is_empty() {
        document.directories = Some(dirs.iter().map(|d| parse_dir(d)).collect::<Result<_, _>>()?);
    }
    if !apps.is_empty() {
        document.apps = Some(apps.iter().map(|a| parse_app(a)).collect::<Result<_, _>>()?);
    }
    if !services.is_empty() {
        document.services = Some(
            services
                .iter()
                .map(|s| parse_service(s))
                .collect::<Result<_, _>>()?,
        );
    }
    Ok(document)
}

fn parse_app(value: &str) -> Result<AppEntry, String> {
    let mut parts = value.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("app declaration `{value}` has no name"));
    }
    let dir = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    let app_type = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    Ok(AppEntry {
        name: name.to_string(),
        dir,
        path: None,
        app_type,
    })
}

fn parse_dir(value: &str) -> Result<DirectoryEntry, String> {
    let mut parts = value.splitn(2, ':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("directory declaration `{value}` has no name"));
    }
    let parent = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    Ok(DirectoryEntry {
        name: name.to_string(),
        parent,
    })
}

fn parse_service(value: &str) -> Result<ServiceEntry, String> {
    let mut parts = value.splitn(2, ':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("service declaration `{value}` has no name"));
    }

    let mut options = BTreeMap::new();
    if let Some(pairs) = parts.next() {
        for pair in pairs.split(',').filter(|p| !p.is_empty()) {
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| format!("service option `{pair}` is not key=value"))?;
            options.insert(key.to_string(), parse_option_value(raw));
        }
    }
    Ok(ServiceEntry {
        name: name.to_string(),
        options,
    })
}

/// Option values keep their YAML-like scalar types: booleans and numbers
/// parse as such, everything else stays a string.
fn parse_option_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}
