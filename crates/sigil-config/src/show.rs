//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path to the layer that set it.
    pub field_sources: FieldSources,
    /// Config files that were loaded.
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with a trailing comment naming each value's source.
    #[default]
    Toml,
    /// Plain JSON.
    Json,
}

impl ResolvedConfig {
    /// Render the configuration, optionally limited to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or `section` does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        let tree = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        let selected = match section {
            Some(name) => tree.get(name).ok_or(fmt::Error)?,
            None => &tree,
        };
        match format {
            ShowFormat::Toml => self.show_toml(selected, section),
            ShowFormat::Json => serde_json::to_string_pretty(selected).map_err(|_| fmt::Error),
        }
    }

    fn show_toml(&self, tree: &toml::Value, section: Option<&str>) -> Result<String, fmt::Error> {
        let body = toml::to_string_pretty(tree).map_err(|_| fmt::Error)?;

        let mut output = String::from("# Resolved sigil configuration\n");
        for path in &self.loaded_files {
            writeln!(output, "# loaded: {path}")?;
        }
        output.push('\n');

        let mut current_section = section.unwrap_or_default().to_owned();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                current_section = header.to_owned();
                writeln!(output, "{line}")?;
                continue;
            }
            match self.annotation(trimmed, &current_section) {
                Some(layer) => writeln!(output, "{line}  # [{layer}]")?,
                None => writeln!(output, "{line}")?,
            }
        }
        Ok(output)
    }

    fn annotation(&self, line: &str, section: &str) -> Option<String> {
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let key = line.split('=').next()?.trim();
        let path = if section.is_empty() {
            key.to_owned()
        } else {
            format!("{section}.{key}")
        };
        self.field_sources.get(&path).map(ToString::to_string)
    }
}
