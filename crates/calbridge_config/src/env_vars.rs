//! Environment variable handling for calbridge.
//!
//! Configuration values use the `CALBRIDGE__SECTION__KEY` pattern. Secrets use
//! `CALBRIDGE_SECRET_SECTION_KEY`, with a fallback to the legacy `SECTION_KEY` form
//! (e.g. `GCAL_REFRESH_TOKEN`).

use std::env;

use serde_json::Value;
use tracing::warn;

use crate::models::SECRET_MARKER;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "CALBRIDGE";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "CALBRIDGE_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"gcal.calendar_id"` becomes `"CALBRIDGE__GCAL__CALENDAR_ID"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"gcal.refresh_token"` becomes `"CALBRIDGE_SECRET_GCAL_REFRESH_TOKEN"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name
///
/// `"gcal.refresh_token"` becomes `"GCAL_REFRESH_TOKEN"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

/// Get an environment variable for a secret path
///
/// The prefixed name is tried first, then the legacy one.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }

    env::var(legacy_secret_path_to_env_var(path)).ok()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "token", "password" or "key" are considered secret.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("token")
        || path_lower.contains("password")
        || path_lower.contains("key")
}

/// Get an environment variable for a path, secret or not
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replaces every `"secret_from_env"` string in `value` with its env var value.
///
/// Returns `true` if any value was replaced.
pub fn inject_env_vars(value: &mut Value) -> bool {
    inject_with(value, &get_env_var)
}

/// Fills `null` entries under the given paths from the environment.
///
/// Used for credentials that are usually not written to config files at all, so the
/// legacy `SECTION_KEY` form is accepted for non-secret paths too.
pub fn fill_missing_from_env(value: &mut Value, paths: &[&str]) -> bool {
    let mut replaced = false;
    for path in paths {
        let Some(slot) = lookup_mut(value, path) else {
            continue;
        };
        if slot.is_null() {
            let env_val = get_env_var(path)
                .or_else(|| env::var(legacy_secret_path_to_env_var(path)).ok());
            if let Some(env_val) = env_val {
                *slot = Value::String(env_val);
                replaced = true;
            }
        }
    }
    replaced
}

fn lookup_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object_mut()?.get_mut(key))
}

pub(crate) fn inject_with(value: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) -> bool {
    fn walk(path: Vec<String>, obj: &mut Value, lookup: &dyn Fn(&str) -> Option<String>) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v, lookup);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = lookup(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value, lookup)
}
