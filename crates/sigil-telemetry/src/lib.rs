//! Sigil Telemetry - logging setup for the sigil tools.
//!
//! This crate provides:
//! - A serializable [`LogConfig`] with level, format and directive overrides
//! - One-call subscriber installation on top of `tracing-subscriber`
//! - (feature `config`) conversion from the `[logging]` config section
//!
//! # Example
//!
//! ```rust,no_run
//! use sigil_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), sigil_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("sigil_crypto=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
