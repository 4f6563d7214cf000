//! Application name discovery
//!
//! The first descriptor that exists and parses decides the name:
//! 1. `app.json`: `name`, then `displayName`
//! 2. `package.json`: `name`
//!
//! When that descriptor has no usable name (missing field, non-string or
//! blank value) the fallback is used. Unreadable or malformed descriptors are
//! skipped, and with no descriptor at all the fallback is used too.

use adk_core::config::DEFAULT_APP_NAME;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Where to look for a name
const SOURCES: &[(&str, &[&str])] = &[
    ("app.json", &["name", "displayName"]),
    ("package.json", &["name"]),
];

/// Display name of the project rooted at `project_root`. Never empty.
pub fn app_name(project_root: &Path, fallback: &str) -> String {
    let decided = SOURCES.iter().find_map(|(file, keys)| {
        read_descriptor(&project_root.join(file)).map(|json| (*file, first_name(&json, keys)))
    });

    match decided {
        Some((file, Some(name))) => {
            debug!(source = file, name = %name, "Resolved app name");
            name
        }
        Some((file, None)) => {
            debug!(source = file, "Descriptor has no usable name, using fallback");
            fallback_name(fallback)
        }
        None => fallback_name(fallback),
    }
}

fn fallback_name(fallback: &str) -> String {
    let fallback = fallback.trim();
    if fallback.is_empty() {
        DEFAULT_APP_NAME.to_string()
    } else {
        fallback.to_string()
    }
}

fn read_descriptor(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(json) => Some(json),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Ignoring malformed project descriptor");
            None
        }
    }
}

fn first_name(json: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(String::from)
}
