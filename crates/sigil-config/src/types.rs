//! Configuration types for the sigil tools.
//!
//! Values are kept as plain strings so this crate stays independent of the
//! crypto crate; names are checked in [`validate`](crate::validate) and
//! parsed into domain types by the caller. Every struct implements
//! [`Default`] so a bare `[section]` header produces a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Algorithm and encoding defaults for the CLI.
    pub crypto: CryptoSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Defaults used when a command does not name an algorithm explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoSection {
    /// Hash for `hash` and `hmac`: `"sha256"` or `"sha512"`.
    pub default_hash: String,
    /// Scheme for `encrypt` and `decrypt`: `"aes-cbc-pkcs7"` or
    /// `"aes-ctr-no-padding"`.
    pub default_scheme: String,
    /// How binary output is printed: `"hex"` or `"base64"`.
    pub output_encoding: String,
}

impl Default for CryptoSection {
    fn default() -> Self {
        Self {
            default_hash: "sha256".to_owned(),
            default_scheme: "aes-cbc-pkcs7".to_owned(),
            output_encoding: "hex".to_owned(),
        }
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["sigil_crypto=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
