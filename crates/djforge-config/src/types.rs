//! Resolved configuration types
//!
//! `ProjectSpec` is the output of the merger and the sole input of the
//! generation pipeline. It is built once per invocation and never mutated
//! after resolution begins.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placement of the core Django package (settings, root urls, wsgi/asgi)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreLocation {
    /// Core package at the default location directly under the project root
    Root,
    /// Core package at an explicit custom path
    Custom,
}

/// Core file placement: location kind plus the path it resolves through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreFiles {
    /// Location kind
    pub location: CoreLocation,
    /// Path of the core package relative to the project root
    pub path: String,
}

/// Classified variant of a Django app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    /// Plain Django app (models, views, admin, urls)
    Standard,
    /// REST API app (adds serializers and API url conf)
    Api,
    /// Authentication app (custom user model variants)
    Auth,
}

impl AppType {
    /// Canonical lowercase name of the variant
    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::Standard => "standard",
            AppType::Api => "api",
            AppType::Auth => "auth",
        }
    }
}

impl FromStr for AppType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(AppType::Standard),
            "api" => Ok(AppType::Api),
            "auth" => Ok(AppType::Auth),
            other => Err(format!("unknown app type: {other}")),
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed catalog of recognized services
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceId {
    /// Containerization (Dockerfile, docker-compose)
    Docker,
    /// Asynchronous task queue
    Celery,
    /// Cache / message broker
    Redis,
    /// Message broker
    Rabbitmq,
    /// Relational database container
    Postgres,
    /// Custom user model and auth wiring
    Authentication,
    /// Django REST Framework setup
    RestApi,
    /// Multi-database router
    DbRouter,
}

impl ServiceId {
    /// Every recognized service, in catalog order
    pub const ALL: [ServiceId; 8] = [
        ServiceId::Docker,
        ServiceId::Celery,
        ServiceId::Redis,
        ServiceId::Rabbitmq,
        ServiceId::Postgres,
        ServiceId::Authentication,
        ServiceId::RestApi,
        ServiceId::DbRouter,
    ];

    /// Canonical snake_case identifier as it appears in config documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceId::Docker => "docker",
            ServiceId::Celery => "celery",
            ServiceId::Redis => "redis",
            ServiceId::Rabbitmq => "rabbitmq",
            ServiceId::Postgres => "postgres",
            ServiceId::Authentication => "authentication",
            ServiceId::RestApi => "rest_api",
            ServiceId::DbRouter => "db_router",
        }
    }
}

impl FromStr for ServiceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceId::ALL
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown service: {s}"))
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared directory in the project layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryDecl {
    /// Directory name, unique across the project
    pub name: String,
    /// Parent directory reference by name; `None` means the project root
    pub parent: Option<String>,
}

/// A declared Django app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDecl {
    /// App name, unique across the project
    pub name: String,
    /// Declared directory reference by name; `None` places the app at the root
    pub directory: Option<String>,
    /// Explicit output path, used verbatim when present
    pub path: Option<String>,
    /// Explicit app type override; wins over name heuristics
    pub app_type: Option<AppType>,
}

/// A requested service with its user-supplied options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDecl {
    /// Service identifier from the closed catalog
    pub id: ServiceId,
    /// Option name to option value, scoped to this service
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

/// Fully merged, immutable project specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Project name, a valid identifier
    pub project_name: String,
    /// Core file placement
    pub core: CoreFiles,
    /// Declared directories, in declaration order
    pub directories: Vec<DirectoryDecl>,
    /// Declared apps, in declaration order
    pub apps: Vec<AppDecl>,
    /// Requested services, in declaration order
    pub services: Vec<ServiceDecl>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_round_trips_through_str() {
        for id in ServiceId::ALL {
            assert_eq!(id.as_str().parse::<ServiceId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        assert!("kafka".parse::<ServiceId>().is_err());
    }

    #[test]
    fn test_app_type_parse() {
        assert_eq!("api".parse::<AppType>().unwrap(), AppType::Api);
        assert_eq!("auth".parse::<AppType>().unwrap(), AppType::Auth);
        assert!("API".parse::<AppType>().is_err());
    }
}
