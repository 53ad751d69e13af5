#![warn(missing_docs)]

//! CLI module for djforge
//!
//! Parses the command line, layers flag values over the optional config
//! file, and drives the generation pipeline. All project semantics live in
//! `djforge-config` and `djforge-generation`; this crate only does argument
//! handling, terminal output, and exit codes.

pub mod args;
pub mod config_io;
pub mod error;

use std::path::{Path, PathBuf};

use tracing::warn;

use djforge_config::{merge, ConfigDocument, DefaultSettings, MergedConfig};
use djforge_generation::{DryRunWriter, FsWriter, ManifestWriter, Orchestrator};

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};

/// Dispatches one parsed invocation.
pub fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::New {
            name,
            config,
            apps,
            dirs,
            services,
            core_path,
            output,
            strict,
            dry_run,
            force,
        } => {
            let overrides =
                args::cli_overrides(&name, &apps, &dirs, &services, core_path.as_deref())
                    .map_err(CliError::InvalidArgument)?;
            let file = config.as_deref().map(config_io::load_config_file).transpose()?;
            if let Some(document) = &file {
                if document.is_empty() {
                    warn!("config file sets no recognized fields");
                }
            }
            let merged = merge_layers(file.as_ref(), Some(&overrides), strict)?;
            let target = output.unwrap_or_else(|| PathBuf::from(&merged.spec.project_name));
            generate(&merged, &target, dry_run, force)
        }
        Commands::Validate { config, strict } => {
            let file = config_io::load_config_file(&config)?;
            let merged = merge_layers(Some(&file), None, strict)?;
            // resolve without rendering so layout problems surface too
            let project = Orchestrator::new().resolve(&merged.spec)?;
            println!(
                "ok: {} ({} apps, {} services)",
                project.name,
                project.apps.len(),
                project.services.len()
            );
            Ok(())
        }
    }
}

fn merge_layers(
    file: Option<&ConfigDocument>,
    cli: Option<&ConfigDocument>,
    strict: bool,
) -> CliResult<MergedConfig> {
    let defaults = DefaultSettings::default();
    let merged = merge(&defaults, file, cli, strict)?;
    for warning in &merged.warnings {
        warn!("{warning}");
    }
    Ok(merged)
}

fn generate(merged: &MergedConfig, target: &Path, dry_run: bool, force: bool) -> CliResult<()> {
    let manifest = Orchestrator::new().generate(&merged.spec)?;
    if dry_run {
        let planned = DryRunWriter.write(&manifest, target)?;
        for path in &planned {
            println!("{}", path.display());
        }
        println!("dry run: {} files planned, nothing written", planned.len());
    } else {
        let written = FsWriter::new(force).write(&manifest, target)?;
        println!(
            "created {} ({} files) at {}",
            merged.spec.project_name,
            written.len(),
            target.display()
        );
    }
    Ok(())
}
