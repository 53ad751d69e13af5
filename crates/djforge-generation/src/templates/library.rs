//! Embedded template library
//!
//! Django file templates compiled into the binary. Selection tables map an
//! app type or service to the template set that renders it.

use djforge_config::{AppType, ServiceId};

/// One template source and the path it renders to, relative to its set base
#[derive(Debug)]
pub struct TemplateFile {
    /// Output path relative to the set base (project root, core package, or
    /// app directory)
    pub rel_path: &'static str,
    /// Handlebars template source
    pub source: &'static str,
}

macro_rules! template {
    ($rel_path:literal, $source:literal) => {
        TemplateFile {
            rel_path: $rel_path,
            source: include_str!($source),
        }
    };
}

/// Base project files rendered at the project root
static PROJECT_FILES: &[TemplateFile] = &[
    template!("manage.py", "../../templates/project/manage.py.hbs"),
    template!(".gitignore", "../../templates/project/gitignore.hbs"),
    template!("README.md", "../../templates/project/README.md.hbs"),
    template!("requirements.txt", "../../templates/project/requirements.txt.hbs"),
];

/// Core package files rendered under the resolved core path
static CORE_FILES: &[TemplateFile] = &[
    template!("__init__.py", "../../templates/core/init.py.hbs"),
    template!("settings/__init__.py", "../../templates/core/settings_init.py.hbs"),
    template!("settings/base.py", "../../templates/core/settings_base.py.hbs"),
    template!("settings/dev.py", "../../templates/core/settings_dev.py.hbs"),
    template!("settings/prod.py", "../../templates/core/settings_prod.py.hbs"),
    template!("urls.py", "../../templates/core/urls.py.hbs"),
    template!("wsgi.py", "../../templates/core/wsgi.py.hbs"),
    template!("asgi.py", "../../templates/core/asgi.py.hbs"),
];

/// Files every app gets, regardless of type
static APP_BASE_FILES: &[TemplateFile] = &[
    template!("__init__.py", "../../templates/app/init.py.hbs"),
    template!("apps.py", "../../templates/app/apps.py.hbs"),
    template!("views.py", "../../templates/app/views.py.hbs"),
    template!("urls.py", "../../templates/app/urls.py.hbs"),
    template!("migrations/__init__.py", "../../templates/app/init.py.hbs"),
    template!("tests/__init__.py", "../../templates/app/init.py.hbs"),
    template!("tests/test_models.py", "../../templates/app/test_models.py.hbs"),
];

static APP_STANDARD_MODEL_FILES: &[TemplateFile] = &[
    template!("models.py", "../../templates/app/models.py.hbs"),
    template!("admin.py", "../../templates/app/admin.py.hbs"),
];

/// Auth apps swap in a custom user model and its admin registration
static APP_AUTH_MODEL_FILES: &[TemplateFile] = &[
    template!("models.py", "../../templates/app/auth_models.py.hbs"),
    template!("admin.py", "../../templates/app/auth_admin.py.hbs"),
];

/// Extra files for REST API apps, on top of the standard set
static APP_API_EXTRAS: &[TemplateFile] = &[
    template!("serializers.py", "../../templates/app/serializers.py.hbs"),
    template!("api_urls.py", "../../templates/app/api_urls.py.hbs"),
];

static DOCKER_FILES: &[TemplateFile] = &[
    template!("Dockerfile", "../../templates/services/Dockerfile.hbs"),
    template!("docker-compose.yml", "../../templates/services/docker-compose.yml.hbs"),
    template!(".dockerignore", "../../templates/services/dockerignore.hbs"),
];

static CELERY_FILES: &[TemplateFile] =
    &[template!("celery.py", "../../templates/services/celery.py.hbs")];

static REST_API_FILES: &[TemplateFile] =
    &[template!("api_urls.py", "../../templates/services/api_urls.py.hbs")];

static DB_ROUTER_FILES: &[TemplateFile] =
    &[template!("router.py", "../../templates/services/router.py.hbs")];

/// Where a service's files are rooted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFileBase {
    /// Project root
    Root,
    /// The resolved core package directory
    Core,
}

/// Template set for the base project files.
pub fn project_files() -> Vec<&'static TemplateFile> {
    PROJECT_FILES.iter().collect()
}

/// Template set for the core package.
pub fn core_files() -> Vec<&'static TemplateFile> {
    CORE_FILES.iter().collect()
}

/// Template set for one app, selected by classified type.
pub fn app_files(app_type: AppType) -> Vec<&'static TemplateFile> {
    let mut files: Vec<&TemplateFile> = APP_BASE_FILES.iter().collect();
    match app_type {
        AppType::Standard => files.extend(APP_STANDARD_MODEL_FILES),
        AppType::Api => {
            files.extend(APP_STANDARD_MODEL_FILES);
            files.extend(APP_API_EXTRAS);
        }
        AppType::Auth => files.extend(APP_AUTH_MODEL_FILES),
    }
    files
}

/// Template set and base for one service. Services without file-level output
/// (redis, rabbitmq, postgres, authentication) contribute settings context
/// and requirements instead.
pub fn service_files(id: ServiceId) -> (ServiceFileBase, Vec<&'static TemplateFile>) {
    match id {
        ServiceId::Docker => (ServiceFileBase::Root, DOCKER_FILES.iter().collect()),
        ServiceId::Celery => (ServiceFileBase::Core, CELERY_FILES.iter().collect()),
        ServiceId::RestApi => (ServiceFileBase::Core, REST_API_FILES.iter().collect()),
        ServiceId::DbRouter => (ServiceFileBase::Core, DB_ROUTER_FILES.iter().collect()),
        ServiceId::Redis
        | ServiceId::Rabbitmq
        | ServiceId::Postgres
        | ServiceId::Authentication => (ServiceFileBase::Root, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_apps_get_serializers() {
        let files = app_files(AppType::Api);
        assert!(files.iter().any(|f| f.rel_path == "serializers.py"));
        assert!(files.iter().any(|f| f.rel_path == "models.py"));
    }

    #[test]
    fn test_auth_apps_swap_models_not_duplicate() {
        let files = app_files(AppType::Auth);
        let model_count = files.iter().filter(|f| f.rel_path == "models.py").count();
        assert_eq!(model_count, 1);
    }

    #[test]
    fn test_fileless_services_have_empty_sets() {
        for id in [ServiceId::Redis, ServiceId::Postgres, ServiceId::Authentication] {
            let (_, files) = service_files(id);
            assert!(files.is_empty());
        }
    }

    #[test]
    fn test_every_set_has_unique_rel_paths() {
        for app_type in [AppType::Standard, AppType::Api, AppType::Auth] {
            let files = app_files(app_type);
            let mut paths: Vec<_> = files.iter().map(|f| f.rel_path).collect();
            paths.sort_unstable();
            paths.dedup();
            assert_eq!(paths.len(), files.len());
        }
    }
}
