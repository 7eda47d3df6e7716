//! Post-merge configuration validation.
//!
//! Checks that every name in a deserialized [`Config`](crate::Config) is one
//! the tools understand.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Hash names accepted for `crypto.default_hash`.
pub const HASH_NAMES: [&str; 2] = ["sha256", "sha512"];
/// Scheme names accepted for `crypto.default_scheme`.
pub const SCHEME_NAMES: [&str; 2] = ["aes-cbc-pkcs7", "aes-ctr-no-padding"];
/// Encodings accepted for `crypto.output_encoding`.
pub const ENCODING_NAMES: [&str; 2] = ["hex", "base64"];
/// Levels accepted for `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// Formats accepted for `logging.format`.
pub const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crypto(config)?;
    validate_logging(config)?;
    Ok(())
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!(
            "unsupported value '{value}'; expected one of: {}",
            allowed.join(", ")
        ),
    })
}

fn validate_crypto(config: &Config) -> ConfigResult<()> {
    let c = &config.crypto;
    one_of("crypto.default_hash", &c.default_hash, &HASH_NAMES)?;
    one_of("crypto.default_scheme", &c.default_scheme, &SCHEME_NAMES)?;
    one_of("crypto.output_encoding", &c.output_encoding, &ENCODING_NAMES)?;
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    one_of("logging.level", &config.logging.level, &LOG_LEVELS)?;
    one_of("logging.format", &config.logging.format, &LOG_FORMATS)?;

    if let Some(empty) = config.logging.directives.iter().position(|d| d.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "logging.directives".to_owned(),
            message: format!("directive at index {empty} is empty"),
        });
    }

    Ok(())
}
