//! Environment variable fallback.
//!
//! Environment variables are a fallback, not an override: a mapping is
//! applied only when no config file set the field.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    section: &'static str,
    key: &'static str,
}

/// All supported `SIGIL_*` mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "SIGIL_DEFAULT_HASH",
        section: "crypto",
        key: "default_hash",
    },
    EnvMapping {
        var_name: "SIGIL_DEFAULT_SCHEME",
        section: "crypto",
        key: "default_scheme",
    },
    EnvMapping {
        var_name: "SIGIL_OUTPUT_ENCODING",
        section: "crypto",
        key: "output_encoding",
    },
    EnvMapping {
        var_name: "SIGIL_LOG_LEVEL",
        section: "logging",
        key: "level",
    },
    EnvMapping {
        var_name: "SIGIL_LOG_FORMAT",
        section: "logging",
        key: "format",
    },
];

/// Names of every environment variable consulted during loading.
#[must_use]
pub fn supported_vars() -> Vec<&'static str> {
    ENV_MAPPINGS.iter().map(|m| m.var_name).collect()
}

/// Snapshot the process environment for the supported variables.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    ENV_MAPPINGS
        .iter()
        .filter_map(|m| {
            std::env::var(m.var_name)
                .ok()
                .map(|val| (m.var_name.to_owned(), val))
        })
        .collect()
}

/// Apply environment fallbacks to fields no config file set.
///
/// Returns the number of variables applied.
pub fn apply_env_fallbacks<S: BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let field_path = format!("{}.{}", mapping.section, mapping.key);
        let set_by_file = sources
            .get(&field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        let Some(val) = env_vars.get(mapping.var_name) else {
            continue;
        };
        let Some(root) = merged.as_table_mut() else {
            continue;
        };

        debug!(var = mapping.var_name, field = %field_path, "applying env var fallback");
        let section = root
            .entry(mapping.section)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        if let Some(table) = section.as_table_mut() {
            table.insert(mapping.key.to_owned(), toml::Value::String(val.clone()));
            sources.insert(field_path, ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}
