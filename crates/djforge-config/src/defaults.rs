//! Schema defaults and naming rules
//!
//! The static catalog of recognized structural options and their default
//! values, plus the validity rules for project, app, and directory names.
//! This module owns no merging or resolution logic.

use crate::types::{CoreFiles, CoreLocation};

/// Names that cannot be used for projects, apps, or directories because they
/// shadow Django packages or generated files.
pub const RESERVED_NAMES: &[&str] = &[
    "django",
    "test",
    "settings",
    "setup",
    "admin",
    "contenttypes",
    "sessions",
    "messages",
    "static",
    "staticfiles",
];

/// Default project structure options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructureDefaults {
    /// Core package placement
    pub core_location: CoreLocation,
    /// Core package path used when the location is `Root`
    pub core_path: String,
    /// Folders created in every project regardless of declarations
    pub required_folders: Vec<String>,
}

impl Default for ProjectStructureDefaults {
    fn default() -> Self {
        Self {
            core_location: CoreLocation::Root,
            core_path: "core".to_string(),
            required_folders: vec![
                "static".to_string(),
                "media".to_string(),
                "templates".to_string(),
            ],
        }
    }
}

/// The lowest-precedence configuration layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSettings {
    /// Project structure defaults
    pub structure: ProjectStructureDefaults,
}

impl DefaultSettings {
    /// Core placement derived purely from defaults.
    pub fn core_files(&self) -> CoreFiles {
        CoreFiles {
            location: self.structure.core_location,
            path: self.structure.core_path.clone(),
        }
    }
}

/// Checks whether a name is a valid project name: starts with a letter,
/// continues with letters, digits, or underscores, and is not reserved.
pub fn is_valid_project_name(name: &str) -> bool {
    !is_reserved(name) && is_identifier(name, false)
}

/// Checks whether a name is a valid app name: lowercase identifier, not
/// reserved.
pub fn is_valid_app_name(name: &str) -> bool {
    !is_reserved(name) && is_identifier(name, true)
}

/// Checks whether a name is a valid directory name. Hyphens are allowed in
/// directory names since they never become Python import segments on their
/// own.
pub fn is_valid_directory_name(name: &str) -> bool {
    if is_reserved(name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_NAMES.contains(&lower.as_str())
}

fn is_identifier(name: &str, lowercase_only: bool) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() && (!lowercase_only || c.is_ascii_lowercase()) => {}
        _ => return false,
    }
    chars.all(|c| {
        (c.is_ascii_alphanumeric() && (!lowercase_only || !c.is_ascii_uppercase())) || c == '_'
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_names() {
        assert!(is_valid_project_name("myproject"));
        assert!(is_valid_project_name("MyProject2"));
        assert!(is_valid_project_name("my_project"));
    }

    #[test]
    fn test_invalid_project_names() {
        assert!(!is_valid_project_name(""));
        assert!(!is_valid_project_name("1project"));
        assert!(!is_valid_project_name("my-project"));
        assert!(!is_valid_project_name("django"));
        assert!(!is_valid_project_name("Settings"));
    }

    #[test]
    fn test_app_names_must_be_lowercase() {
        assert!(is_valid_app_name("blog"));
        assert!(is_valid_app_name("user_profiles"));
        assert!(!is_valid_app_name("Blog"));
        assert!(!is_valid_app_name("blog-posts"));
        assert!(!is_valid_app_name("admin"));
    }

    #[test]
    fn test_directory_names_allow_hyphens() {
        assert!(is_valid_directory_name("apps"));
        assert!(is_valid_directory_name("third-party"));
        assert!(!is_valid_directory_name("-apps"));
        assert!(!is_valid_directory_name("static"));
    }

    #[test]
    fn test_default_core_files() {
        let defaults = DefaultSettings::default();
        let core = defaults.core_files();
        assert_eq!(core.location, CoreLocation::Root);
        assert_eq!(core.path, "core");
    }
}
