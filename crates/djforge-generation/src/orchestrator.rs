//! Generation orchestration
//!
//! Sequences the pipeline: resolve paths, expand services, classify apps,
//! render every template set, and assemble the manifest. Stages run strictly
//! in order; the first structural error aborts the run and no partial
//! manifest is ever returned. Manifest assembly follows declaration order so
//! collision diagnostics are reproducible.

use tracing::{debug, info};

use djforge_config::{ProjectSpec, ProjectStructureDefaults};

use crate::classifier::classify;
use crate::error::GenerationError;
use crate::manifest::RenderManifest;
use crate::models::{import_path, ResolvedApp, ResolvedProject};
use crate::templates::{
    app_context, app_files, core_files, project_context, project_files, render_files,
    service_context, service_files, HandlebarsRenderer, ServiceFileBase, TemplateRenderer,
};
use crate::{paths, services};

/// Orchestrates one generation run over a pluggable renderer
pub struct Orchestrator<R: TemplateRenderer = HandlebarsRenderer> {
    renderer: R,
}

impl Orchestrator<HandlebarsRenderer> {
    /// Creates an orchestrator with the default handlebars renderer.
    pub fn new() -> Self {
        Self {
            renderer: HandlebarsRenderer::new(),
        }
    }
}

impl Default for Orchestrator<HandlebarsRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TemplateRenderer> Orchestrator<R> {
    /// Creates an orchestrator over a custom rendering capability.
    pub fn with_renderer(renderer: R) -> Self {
        Self { renderer }
    }

    /// Resolves a project spec into a read-only model without rendering.
    pub fn resolve(&self, spec: &ProjectSpec) -> Result<ResolvedProject, GenerationError> {
        let resolved_paths = paths::resolve(&spec.directories, &spec.apps, &spec.core)?;

        let requested = services::from_decls(&spec.services)?;
        let expanded = services::expand(&requested)?;

        let apps: Vec<ResolvedApp> = spec
            .apps
            .iter()
            .zip(&resolved_paths.apps)
            .map(|(decl, (_, path))| ResolvedApp {
                name: decl.name.clone(),
                path: path.clone(),
                import_path: import_path(path),
                app_type: classify(&decl.name, decl.app_type),
            })
            .collect();

        for app in &apps {
            debug!(app = %app.name, path = %app.path, app_type = %app.app_type, "classified app");
        }

        Ok(ResolvedProject {
            name: spec.project_name.clone(),
            core_path: resolved_paths.core_path.clone(),
            core_import_path: import_path(&resolved_paths.core_path),
            apps,
            services: expanded,
        })
    }

    /// Runs the full pipeline, producing the manifest for one project.
    pub fn generate(&self, spec: &ProjectSpec) -> Result<RenderManifest, GenerationError> {
        let project = self.resolve(spec)?;
        let mut manifest = RenderManifest::new();

        // base project files, including the aggregated requirements.txt
        let requirements = aggregate_requirements(&project);
        let context = project_context(&project, &requirements);
        for (path, content) in render_files(
            &self.renderer,
            "project",
            "",
            &project_files(),
            &context,
        )? {
            manifest.insert("project", path, content)?;
        }

        // required folders ship as empty keep-files; the settings templates
        // point at them, so they must exist in the written tree
        for folder in &ProjectStructureDefaults::default().required_folders {
            manifest.insert("project", format!("{folder}/.gitkeep"), Vec::new())?;
        }

        // core package
        for (path, content) in render_files(
            &self.renderer,
            "core",
            &project.core_path,
            &core_files(),
            &context,
        )? {
            manifest.insert("core", path, content)?;
        }

        // one subtree per app, in declaration order
        for app in &project.apps {
            let stage = format!("app:{}", app.name);
            let context = app_context(&project, app);
            for (path, content) in render_files(
                &self.renderer,
                &stage,
                &app.path,
                &app_files(app.app_type),
                &context,
            )? {
                manifest.insert(&stage, path, content)?;
            }
        }

        // service files, requested order then implied
        for service in &project.services {
            let (base, files) = service_files(service.id);
            if files.is_empty() {
                continue;
            }
            let stage = format!("service:{}", service.id);
            let base = match base {
                ServiceFileBase::Root => "",
                ServiceFileBase::Core => project.core_path.as_str(),
            };
            let context = service_context(&project, service);
            for (path, content) in
                render_files(&self.renderer, &stage, base, &files, &context)?
            {
                manifest.insert(&stage, path, content)?;
            }
        }

        info!(
            project = %project.name,
            files = manifest.len(),
            services = project.services.len(),
            "generation complete"
        );
        Ok(manifest)
    }
}

/// Collects Python package requirements from expanded services and app
/// types, in declaration order, de-duplicated.
fn aggregate_requirements(project: &ResolvedProject) -> Vec<String> {
    let mut requirements: Vec<String> = Vec::new();
    let mut push = |package: &str| {
        if !requirements.iter().any(|r| r == package) {
            requirements.push(package.to_string());
        }
    };

    for app in &project.apps {
        if app.app_type == djforge_config::AppType::Api {
            push("djangorestframework>=3.14");
        }
    }
    for service in &project.services {
        for package in services::requirements(service.id, &service.options) {
            push(package);
        }
    }
    requirements
}

#[cfg(test)]
mod tests {
    use super::*;
    use djforge_config::{
        AppDecl, AppType, CoreFiles, CoreLocation, ServiceDecl, ServiceId,
    };
    use std::collections::BTreeMap;

    fn spec() -> ProjectSpec {
        ProjectSpec {
            project_name: "myproject".to_string(),
            core: CoreFiles {
                location: CoreLocation::Root,
                path: "core".to_string(),
            },
            directories: vec![],
            apps: vec![
                AppDecl {
                    name: "blog".to_string(),
                    directory: None,
                    path: None,
                    app_type: None,
                },
                AppDecl {
                    name: "users".to_string(),
                    directory: None,
                    path: None,
                    app_type: None,
                },
            ],
            services: vec![ServiceDecl {
                id: ServiceId::Celery,
                options: BTreeMap::new(),
            }],
        }
    }

    #[test]
    fn test_resolve_classifies_and_expands() {
        let project = Orchestrator::new().resolve(&spec()).unwrap();
        assert_eq!(project.apps[0].app_type, AppType::Standard);
        assert_eq!(project.apps[1].app_type, AppType::Auth);
        assert!(project.has_service(ServiceId::Celery));
        assert!(project.has_service(ServiceId::Redis));
    }

    #[test]
    fn test_generate_contains_exactly_one_manage_py() {
        let manifest = Orchestrator::new().generate(&spec()).unwrap();
        let count = manifest
            .entries()
            .iter()
            .filter(|e| e.path == "manage.py")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_generate_emits_required_folders() {
        let manifest = Orchestrator::new().generate(&spec()).unwrap();
        for folder in ["static", "media", "templates"] {
            assert!(
                manifest.contains(&format!("{folder}/.gitkeep")),
                "missing keep-file for {folder}"
            );
        }
    }

    #[test]
    fn test_generate_renders_one_subtree_per_app() {
        let manifest = Orchestrator::new().generate(&spec()).unwrap();
        assert!(manifest.contains("blog/models.py"));
        assert!(manifest.contains("blog/urls.py"));
        assert!(manifest.contains("users/models.py"));
        // auth app gets the custom user model
        let users_models =
            String::from_utf8(manifest.get("users/models.py").unwrap().to_vec()).unwrap();
        assert!(users_models.contains("AbstractUser"));
    }

    #[test]
    fn test_generate_requirements_include_service_packages() {
        let manifest = Orchestrator::new().generate(&spec()).unwrap();
        let requirements =
            String::from_utf8(manifest.get("requirements.txt").unwrap().to_vec()).unwrap();
        assert!(requirements.contains("celery>="));
        assert!(requirements.contains("redis>="));
        assert!(requirements.starts_with("Django>="));
    }

    #[test]
    fn test_generate_fails_before_rendering_on_path_conflict() {
        let mut conflicted = spec();
        conflicted.apps[0].path = Some("shared".to_string());
        conflicted.apps[1].path = Some("shared".to_string());
        let err = Orchestrator::new().generate(&conflicted).unwrap_err();
        assert!(matches!(err, GenerationError::Conflict { .. }));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let orchestrator = Orchestrator::new();
        let first = orchestrator.generate(&spec()).unwrap();
        let second = orchestrator.generate(&spec()).unwrap();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.entries().iter().zip(second.entries()) {
            assert_eq!(a.path, b.path);
            assert_eq!(a.content, b.content);
        }
    }
}
