//! Service dependency resolution
//!
//! Expands a requested service set into a closed set satisfying the static
//! dependency table, recording provenance for every auto-added service.
//! Expansion is idempotent: re-running `expand` on its own output returns
//! the same set.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use tracing::debug;

use djforge_config::{ServiceDecl, ServiceId};

use crate::error::GenerationError;
use crate::models::{Provenance, ResolvedService};

/// The celery broker option key
const BROKER_OPTION: &str = "broker";
/// Brokers celery accepts, in preference order; the first is the default
const BROKERS: [ServiceId; 2] = [ServiceId::Redis, ServiceId::Rabbitmq];

/// Catalog default options for a service. User-supplied options are merged
/// on top, per key.
pub fn default_options(id: ServiceId) -> BTreeMap<String, Value> {
    let value = match id {
        ServiceId::Docker => json!({
            "python_version": "3.11",
            "postgres_version": "15",
            "with_redis": false,
            "with_postgres": false,
        }),
        ServiceId::Celery => json!({
            "use_flower": false,
        }),
        ServiceId::Redis => json!({
            "use_for_cache": true,
            "use_for_sessions": true,
            "host": "redis",
            "port": 6379,
        }),
        ServiceId::Rabbitmq => json!({
            "host": "rabbitmq",
            "port": 5672,
        }),
        ServiceId::Postgres => json!({
            "name": "postgres",
            "user": "postgres",
            "host": "db",
            "port": 5432,
        }),
        ServiceId::Authentication => json!({
            "custom_user": true,
        }),
        ServiceId::RestApi => json!({
            "framework": "drf",
        }),
        ServiceId::DbRouter => json!({
            "db_types": ["postgres"],
        }),
    };
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

/// Python package requirements a service contributes to the generated
/// `requirements.txt`.
pub fn requirements(id: ServiceId, options: &BTreeMap<String, Value>) -> Vec<&'static str> {
    match id {
        ServiceId::Celery => {
            let mut packages = vec!["celery>=5.3", "django-celery-results>=2.5"];
            if options.get("use_flower").and_then(Value::as_bool) == Some(true) {
                packages.push("flower>=2.0");
            }
            packages
        }
        ServiceId::Redis => vec!["redis>=5.0", "django-redis>=5.4"],
        ServiceId::Rabbitmq => vec!["kombu>=5.3"],
        ServiceId::Postgres => vec!["psycopg2-binary>=2.9"],
        ServiceId::RestApi => vec!["djangorestframework>=3.14"],
        ServiceId::Docker | ServiceId::Authentication | ServiceId::DbRouter => Vec::new(),
    }
}

/// Converts explicit requests into resolved services with merged options and
/// `Requested` provenance. Duplicate requests for the same service are fatal.
pub fn from_decls(decls: &[ServiceDecl]) -> Result<Vec<ResolvedService>, GenerationError> {
    let mut issues = Vec::new();
    let mut resolved: Vec<ResolvedService> = Vec::with_capacity(decls.len());
    for decl in decls {
        if resolved.iter().any(|s| s.id == decl.id) {
            issues.push(format!("service {} requested more than once", decl.id));
            continue;
        }
        let mut options = default_options(decl.id);
        for (key, value) in &decl.options {
            options.insert(key.clone(), value.clone());
        }
        resolved.push(ResolvedService {
            id: decl.id,
            options,
            provenance: Provenance::Requested,
        });
    }
    if issues.is_empty() {
        Ok(resolved)
    } else {
        Err(GenerationError::validation(issues))
    }
}

/// Expands a service set into a closed set satisfying the dependency table.
///
/// Rules:
/// - `celery` requires exactly one broker of redis/rabbitmq. The `broker`
///   option selects one; without it, a single explicitly requested broker is
///   used, and with none requested, redis is auto-added with provenance
///   `ImpliedBy(celery)`. Requesting both brokers without a `broker` option,
///   or setting `broker` to anything outside the catalog, is fatal.
/// - `docker` optionally bundles redis/postgres via the `with_redis` and
///   `with_postgres` options; it requires neither.
///
/// Services already present are never re-added, so the function is a fixed
/// point on its own output.
pub fn expand(requested: &[ResolvedService]) -> Result<Vec<ResolvedService>, GenerationError> {
    let mut expanded: Vec<ResolvedService> = requested.to_vec();

    if let Some(celery) = expanded.iter().find(|s| s.id == ServiceId::Celery).cloned() {
        let broker = select_broker(&celery, &expanded)?;
        if !expanded.iter().any(|s| s.id == broker) {
            debug!(broker = %broker, "auto-adding celery broker");
            expanded.push(ResolvedService {
                id: broker,
                options: default_options(broker),
                provenance: Provenance::ImpliedBy(ServiceId::Celery),
            });
        }
        // record the chosen broker so rendering does not re-derive it
        if let Some(celery) = expanded.iter_mut().find(|s| s.id == ServiceId::Celery) {
            celery
                .options
                .insert(BROKER_OPTION.to_string(), json!(broker.as_str()));
        }
    }

    if let Some(docker) = expanded.iter().find(|s| s.id == ServiceId::Docker).cloned() {
        for (option, bundled) in [
            ("with_redis", ServiceId::Redis),
            ("with_postgres", ServiceId::Postgres),
        ] {
            let wanted = docker.options.get(option).and_then(Value::as_bool) == Some(true);
            if wanted && !expanded.iter().any(|s| s.id == bundled) {
                debug!(service = %bundled, "docker bundles sub-service");
                expanded.push(ResolvedService {
                    id: bundled,
                    options: default_options(bundled),
                    provenance: Provenance::ImpliedBy(ServiceId::Docker),
                });
            }
        }
    }

    Ok(expanded)
}

/// Chooses the celery broker, honoring the `broker` option and explicitly
/// requested brokers, or reports the violated rule.
fn select_broker(
    celery: &ResolvedService,
    expanded: &[ResolvedService],
) -> Result<ServiceId, GenerationError> {
    let requested_brokers: Vec<ServiceId> = BROKERS
        .into_iter()
        .filter(|b| expanded.iter().any(|s| s.id == *b))
        .collect();

    match celery.options.get(BROKER_OPTION) {
        Some(Value::String(name)) => {
            let named = BROKERS.into_iter().find(|b| b.as_str() == name);
            match named {
                // the named broker must be consistent with explicit requests
                Some(broker) if !requested_brokers.is_empty()
                    && !requested_brokers.contains(&broker) =>
                {
                    Err(GenerationError::UnsatisfiableDependency {
                        service: ServiceId::Celery,
                        rule: format!(
                            "celery broker option names {broker} but only {} was requested",
                            requested_brokers[0]
                        ),
                    })
                }
                Some(broker) => Ok(broker),
                None if name == "none" => Err(GenerationError::UnsatisfiableDependency {
                    service: ServiceId::Celery,
                    rule: "celery requires exactly one broker of redis or rabbitmq, \
                           but the broker option disables all brokers"
                        .to_string(),
                }),
                None => Err(GenerationError::UnsatisfiableDependency {
                    service: ServiceId::Celery,
                    rule: format!(
                        "celery broker option `{name}` is not in the broker catalog \
                         (redis, rabbitmq)"
                    ),
                }),
            }
        }
        Some(Value::Null) | None => match requested_brokers.as_slice() {
            [] => Ok(BROKERS[0]),
            [single] => Ok(*single),
            _ => Err(GenerationError::UnsatisfiableDependency {
                service: ServiceId::Celery,
                rule: "celery requires exactly one broker, but both redis and rabbitmq \
                       were requested without a broker option"
                    .to_string(),
            }),
        },
        Some(other) => Err(GenerationError::UnsatisfiableDependency {
            service: ServiceId::Celery,
            rule: format!("celery broker option must be a string, got {other}"),
        }),
    }
}
