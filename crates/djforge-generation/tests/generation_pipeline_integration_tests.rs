//! End-to-end pipeline tests: spec in, rendered project out

use std::collections::BTreeMap;

use djforge_config::{
    AppDecl, AppType, CoreFiles, CoreLocation, DirectoryDecl, ProjectSpec, ServiceDecl, ServiceId,
};
use djforge_generation::{
    DryRunWriter, FsWriter, GenerationError, ManifestWriter, Orchestrator, Provenance,
};

fn blog_project() -> ProjectSpec {
    ProjectSpec {
        project_name: "myproject".to_string(),
        core: CoreFiles {
            location: CoreLocation::Root,
            path: "core".to_string(),
        },
        directories: vec![DirectoryDecl {
            name: "apps".to_string(),
            parent: None,
        }],
        apps: vec![
            AppDecl {
                name: "blog".to_string(),
                directory: Some("apps".to_string()),
                path: None,
                app_type: None,
            },
            AppDecl {
                name: "users".to_string(),
                directory: Some("apps".to_string()),
                path: None,
                app_type: None,
            },
            AppDecl {
                name: "catalog_api".to_string(),
                directory: Some("apps".to_string()),
                path: None,
                app_type: None,
            },
        ],
        services: vec![
            ServiceDecl {
                id: ServiceId::Docker,
                options: BTreeMap::new(),
            },
            ServiceDecl {
                id: ServiceId::Celery,
                options: BTreeMap::new(),
            },
        ],
    }
}

#[test]
fn test_full_pipeline_produces_expected_layout() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();

    // project root
    assert!(manifest.contains("manage.py"));
    assert!(manifest.contains("requirements.txt"));
    // core package under the root placement
    assert!(manifest.contains("core/settings/base.py"));
    assert!(manifest.contains("core/urls.py"));
    // apps nested under the declared directory
    assert!(manifest.contains("apps/blog/models.py"));
    assert!(manifest.contains("apps/users/models.py"));
    assert!(manifest.contains("apps/catalog_api/serializers.py"));
    // service files
    assert!(manifest.contains("Dockerfile"));
    assert!(manifest.contains("docker-compose.yml"));
    assert!(manifest.contains("core/celery.py"));
}

#[test]
fn test_full_pipeline_expands_celery_broker() {
    let project = Orchestrator::new().resolve(&blog_project()).unwrap();
    let redis = project
        .service(ServiceId::Redis)
        .expect("broker implied by celery");
    assert_eq!(redis.provenance, Provenance::ImpliedBy(ServiceId::Celery));
}

#[test]
fn test_full_pipeline_classifies_apps() {
    let project = Orchestrator::new().resolve(&blog_project()).unwrap();
    let types: Vec<AppType> = project.apps.iter().map(|a| a.app_type).collect();
    assert_eq!(types, vec![AppType::Standard, AppType::Auth, AppType::Api]);
}

#[test]
fn test_settings_reference_every_app_import_path() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();
    let settings =
        String::from_utf8(manifest.get("core/settings/base.py").unwrap().to_vec()).unwrap();
    for import_path in ["apps.blog", "apps.users", "apps.catalog_api"] {
        assert!(
            settings.contains(&format!("'{import_path}'")),
            "settings missing {import_path}"
        );
    }
    // auth app drives the custom user model
    assert!(settings.contains("AUTH_USER_MODEL"));
}

#[test]
fn test_requirements_aggregate_in_declaration_order() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();
    let requirements =
        String::from_utf8(manifest.get("requirements.txt").unwrap().to_vec()).unwrap();
    let rest = requirements.find("djangorestframework").unwrap();
    let celery = requirements.find("celery").unwrap();
    let redis = requirements.find("redis>=").unwrap();
    // api apps first, then services as declared, implied broker last
    assert!(rest < celery);
    assert!(celery < redis);
}

#[test]
fn test_required_folders_exist_in_written_tree() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("myproject");
    FsWriter::new(false).write(&manifest, &target).unwrap();

    // the settings templates reference these directories
    let settings =
        String::from_utf8(manifest.get("core/settings/base.py").unwrap().to_vec()).unwrap();
    assert!(settings.contains("BASE_DIR / 'templates'"));
    assert!(settings.contains("MEDIA_ROOT"));
    for folder in ["static", "media", "templates"] {
        assert!(
            target.join(folder).is_dir(),
            "{folder} missing from written tree"
        );
    }
}

#[test]
fn test_written_tree_matches_manifest() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("myproject");

    let written = FsWriter::new(false).write(&manifest, &target).unwrap();
    assert_eq!(written.len(), manifest.len());
    for entry in manifest.entries() {
        let on_disk = std::fs::read(target.join(&entry.path)).unwrap();
        assert_eq!(on_disk, entry.content, "mismatch at {}", entry.path);
    }
}

#[test]
fn test_dry_run_plans_full_manifest_without_writing() {
    let manifest = Orchestrator::new().generate(&blog_project()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("planned");

    let planned = DryRunWriter.write(&manifest, &target).unwrap();
    assert_eq!(planned.len(), manifest.len());
    assert!(!target.exists());
}

#[test]
fn test_conflicting_spec_renders_nothing() {
    let mut spec = blog_project();
    spec.apps[0].path = Some("core".to_string());
    let err = Orchestrator::new().generate(&spec).unwrap_err();
    assert!(matches!(err, GenerationError::Conflict { .. }));
}
