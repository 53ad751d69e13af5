//! App type classification
//!
//! Maps an app's declared name to a variant through an explicit ordered rule
//! table. An explicit override always wins. Rule order is a tested contract:
//! the `api` substring rule runs before the auth name set, so `users_api`
//! classifies as `Api`, not `Auth`.

use djforge_config::AppType;

/// Names that classify an app as an authentication app when matched exactly
const AUTH_APP_NAMES: &[&str] = &["users", "accounts", "auth", "authentication"];

/// The ordered heuristic table. Each rule either claims the name or passes.
const RULES: &[fn(&str) -> Option<AppType>] = &[api_rule, auth_rule];

fn api_rule(name: &str) -> Option<AppType> {
    name.to_ascii_lowercase()
        .contains("api")
        .then_some(AppType::Api)
}

fn auth_rule(name: &str) -> Option<AppType> {
    AUTH_APP_NAMES.contains(&name).then_some(AppType::Auth)
}

/// Classifies an app by explicit override or ordered name heuristics.
pub fn classify(app_name: &str, explicit: Option<AppType>) -> AppType {
    if let Some(explicit) = explicit {
        return explicit;
    }
    RULES
        .iter()
        .find_map(|rule| rule(app_name))
        .unwrap_or(AppType::Standard)
}
