//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse the embedded `defaults.toml`
//! 2. Merge the user file (explicit path, or `<config dir>/sigil/config.toml`)
//! 3. Apply `SIGIL_*` env var fallbacks for fields no file set
//! 4. Deserialize and validate

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (64 KiB).
const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

/// Where the user layer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFile {
    /// The platform default location; skipped silently when absent.
    Discover,
    /// A path the caller named; it must exist.
    Explicit(PathBuf),
    /// No user layer.
    None,
}

/// Load configuration from the process environment and `user_file`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a file is unreadable or malformed, or if the
/// merged configuration fails validation.
pub fn load(user_file: &UserFile) -> ConfigResult<ResolvedConfig> {
    load_with_env(user_file, &collect_env_vars())
}

/// Load configuration with an explicit environment snapshot.
///
/// # Errors
///
/// As for [`load`].
pub fn load_with_env<S: BuildHasher>(
    user_file: &UserFile,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    let user_layer = match user_file {
        UserFile::Explicit(path) => Some((read_file(path)?, path.clone())),
        UserFile::Discover => {
            let path = default_config_path()?;
            try_read_file(&path)?.map(|overlay| (overlay, path))
        },
        UserFile::None => None,
    };
    if let Some((overlay, path)) = user_layer {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            ConfigLayer::User,
            &mut field_sources,
        );
        info!(path = %path.display(), "loaded user config");
        loaded_files.push(path.display().to_string());
    }

    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// The platform default user config path.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if no home directory can be found.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("sigil").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read and parse `path`, failing if it does not exist.
fn read_file(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_file(path, &content)
}

/// Read and parse `path`, returning `None` if it does not exist.
fn try_read_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_file(path, &content).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(None)
        },
        Err(e) => Err(ConfigError::ReadError {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn parse_file(path: &Path, content: &str) -> ConfigResult<toml::Value> {
    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_type_defaults() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_defaults_only() {
        let resolved = load_with_env(&UserFile::None, &HashMap::new()).unwrap();
        assert_eq!(resolved.config, Config::default());
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(
            resolved.field_sources.get("crypto.default_hash"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_with_env(
            &UserFile::Explicit(PathBuf::from("/nonexistent/sigil.toml")),
            &HashMap::new(),
        );
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_try_read_missing() {
        assert!(
            try_read_file(Path::new("/nonexistent/sigil.toml"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(MAX_CONFIG_FILE_SIZE) + "\"";
        std::fs::write(&path, data).unwrap();

        let result = try_read_file(&path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "expected ValidationError for oversized config, got: {result:?}"
        );
    }
}
