#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for the sigil tools.
//!
//! # Usage
//!
//! ```rust,no_run
//! use sigil_config::Config;
//!
//! let resolved = Config::load(None).unwrap();
//! println!("default hash: {}", resolved.config.crypto.default_hash);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **User file**: `--config <path>` if given, else
//!    `<platform config dir>/sigil/config.toml`
//! 2. **Environment variables** (`SIGIL_*`): fallback only, for fields the
//!    file did not set
//! 3. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! This crate has no dependencies on other sigil crates. Conversion to domain
//! types happens in the CLI.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered merging with source tracking.
pub mod merge;
/// Resolved configuration display.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::UserFile;
pub use merge::ConfigLayer;
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// `path` names an explicit user file; `None` uses the platform default
    /// location if it exists.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a config file is malformed or the final
    /// configuration fails validation.
    pub fn load(path: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        let user_file = path.map_or(UserFile::Discover, |p| UserFile::Explicit(p.to_path_buf()));
        loader::load(&user_file)
    }
}
