//! Deep merge of TOML values with per-field source tracking.
//!
//! Merging works on raw [`toml::Value`] trees rather than deserialized
//! structs, so a key missing from an overlay never clobbers the base layer.

use std::collections::HashMap;
use std::fmt;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// The user config file.
    User,
    /// Environment variable fallback.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user"),
            Self::Environment => write!(f, "env"),
        }
    }
}

/// Dotted field path to the layer that last set it.
pub type FieldSources = HashMap<String, ConfigLayer>;

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Merge `overlay` into `base`, recording `layer` for every leaf it sets.
///
/// Tables merge per key; scalars and arrays replace.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let path = join_path(prefix, key);
                match base_table.get_mut(key) {
                    Some(base_val) => {
                        deep_merge_tracking(base_val, overlay_val, &path, layer, sources);
                    },
                    None => {
                        base_table.insert(key.clone(), overlay_val.clone());
                        record_leaves(overlay_val, &path, layer, sources);
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            sources.insert(prefix.to_owned(), layer);
        },
    }
}

/// Mark every leaf under `val` as set by `layer`.
pub fn record_leaves(val: &toml::Value, prefix: &str, layer: ConfigLayer, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            record_leaves(child, &join_path(prefix, key), layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> toml::Value {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_overlay_replaces_only_present_keys() {
        let mut base = parse("[crypto]\ndefault_hash = \"sha256\"\noutput_encoding = \"hex\"\n");
        let mut sources = FieldSources::new();
        record_leaves(&base, "", ConfigLayer::Defaults, &mut sources);

        let overlay = parse("[crypto]\ndefault_hash = \"sha512\"\n");
        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::User, &mut sources);

        assert_eq!(base["crypto"]["default_hash"].as_str(), Some("sha512"));
        assert_eq!(base["crypto"]["output_encoding"].as_str(), Some("hex"));
        assert_eq!(sources["crypto.default_hash"], ConfigLayer::User);
        assert_eq!(sources["crypto.output_encoding"], ConfigLayer::Defaults);
    }

    #[test]
    fn test_new_table_is_recorded() {
        let mut base = parse("[crypto]\n");
        let mut sources = FieldSources::new();
        let overlay = parse("[logging]\nlevel = \"debug\"\n");
        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::User, &mut sources);
        assert_eq!(sources["logging.level"], ConfigLayer::User);
    }

    #[test]
    fn test_arrays_replace() {
        let mut base = parse("[logging]\ndirectives = [\"a=info\", \"b=info\"]\n");
        let mut sources = FieldSources::new();
        let overlay = parse("[logging]\ndirectives = [\"c=trace\"]\n");
        deep_merge_tracking(&mut base, &overlay, "", ConfigLayer::User, &mut sources);
        assert_eq!(base["logging"]["directives"].as_array().map(Vec::len), Some(1));
    }
}
