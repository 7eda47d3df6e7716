//! Subcommand implementations.

pub(crate) mod cipher;
pub(crate) mod config;
pub(crate) mod digest;
pub(crate) mod random;
