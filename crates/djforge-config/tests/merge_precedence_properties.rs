//! Property-based tests for configuration layer precedence

use proptest::prelude::*;

use djforge_config::{merge, ConfigDocument, ConfigError, DefaultSettings, RESERVED_NAMES};

fn project_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
        .prop_filter("reserved names are rejected", |name| {
            !RESERVED_NAMES.contains(&name.as_str())
        })
}

fn named_document(name: &str) -> ConfigDocument {
    ConfigDocument {
        project_name: Some(name.to_string()),
        ..ConfigDocument::default()
    }
}

proptest! {
    /// CLI values win over file values for any pair of valid names.
    #[test]
    fn test_cli_layer_wins_over_file(
        file_name in project_name_strategy(),
        cli_name in project_name_strategy(),
    ) {
        let defaults = DefaultSettings::default();
        let file = named_document(&file_name);
        let cli = named_document(&cli_name);
        let merged = merge(&defaults, Some(&file), Some(&cli), false).unwrap();
        prop_assert_eq!(merged.spec.project_name, cli_name);
    }

    /// File values apply whenever the CLI leaves a field unset.
    #[test]
    fn test_file_layer_applies_when_cli_is_silent(name in project_name_strategy()) {
        let defaults = DefaultSettings::default();
        let file = named_document(&name);
        let cli = ConfigDocument::default();
        let merged = merge(&defaults, Some(&file), Some(&cli), false).unwrap();
        prop_assert_eq!(merged.spec.project_name, name);
    }

    /// Merging the same layers twice yields the same spec.
    #[test]
    fn test_merge_is_deterministic(
        file_name in project_name_strategy(),
        cli_name in project_name_strategy(),
    ) {
        let defaults = DefaultSettings::default();
        let file = named_document(&file_name);
        let cli = named_document(&cli_name);
        let first = merge(&defaults, Some(&file), Some(&cli), false).unwrap();
        let second = merge(&defaults, Some(&file), Some(&cli), false).unwrap();
        prop_assert_eq!(first.spec, second.spec);
    }
}

#[test]
fn test_missing_project_name_is_always_fatal() {
    let defaults = DefaultSettings::default();
    let err = merge(&defaults, None, None, false).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
}

#[test]
fn test_unknown_keys_warn_by_default_and_fail_in_strict_mode() {
    let defaults = DefaultSettings::default();
    let file = ConfigDocument::from_yaml_str(
        "project_name: myproject\nflavour: extra\n",
    )
    .unwrap();

    let merged = merge(&defaults, Some(&file), None, false).unwrap();
    assert_eq!(merged.warnings.len(), 1);
    assert_eq!(merged.warnings[0].key, "flavour");

    let err = merge(&defaults, Some(&file), None, true).unwrap_err();
    match err {
        ConfigError::UnknownKeys { keys } => assert_eq!(keys, vec!["flavour"]),
        other => panic!("expected unknown keys error, got {other}"),
    }
}

#[test]
fn test_defaults_fill_core_placement() {
    let defaults = DefaultSettings::default();
    let file = named_document("myproject");
    let merged = merge(&defaults, Some(&file), None, false).unwrap();
    assert_eq!(merged.spec.core.path, "core");
}
