//! Config file loading

use std::fs;
use std::path::Path;

use tracing::debug;

use djforge_config::ConfigDocument;

use crate::error::CliResult;

/// Reads and parses a YAML config file.
pub fn load_config_file(path: &Path) -> CliResult<ConfigDocument> {
    let source = fs::read_to_string(path)?;
    let document = ConfigDocument::from_yaml_str(&source)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(document)
}
