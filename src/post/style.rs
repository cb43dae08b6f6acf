//! Post-processor style
//!
//! Formatting policy for generated programs, loadable from a TOML or JSON
//! document. Missing fields fall back to the defaults below, unknown fields
//! are rejected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// Largest accepted block number increment
pub const MAX_LINE_STEP: u32 = 1000;

/// Formatting policy applied by the [`Formatter`](super::Formatter).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Replaces `.` in every rendered number
    pub decimal_separator: String,
    /// Fixed number of decimal places
    pub precision: usize,
    /// Prefix blocks with `N<counter>`
    pub line_numbers: bool,
    /// Counter increment, also the first block number
    pub line_step: u32,
    /// Lines emitted before the program body
    pub header_template: Vec<String>,
    /// Lines emitted after the program body
    pub footer_template: Vec<String>,
    pub coolant_on_cmd: String,
    pub coolant_off_cmd: String,
    /// May reference `{spindle}`
    pub spindle_on_cmd: String,
    pub spindle_off_cmd: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            decimal_separator: ".".to_string(),
            precision: 3,
            line_numbers: true,
            line_step: 10,
            header_template: vec![
                "%".to_string(),
                "O{program_number}".to_string(),
                "(PART: {comment})".to_string(),
                "(DATE: {date})".to_string(),
            ],
            footer_template: vec!["M30".to_string(), "%".to_string()],
            coolant_on_cmd: "M8".to_string(),
            coolant_off_cmd: "M9".to_string(),
            spindle_on_cmd: "M3 S{spindle}".to_string(),
            spindle_off_cmd: "M5".to_string(),
        }
    }
}

impl StyleConfig {
    /// Parse a TOML style document
    pub fn from_toml_str(content: &str) -> Result<Self, StyleError> {
        let style: Self = toml::from_str(content)?;
        style.check()?;
        Ok(style)
    }

    /// Parse a JSON style document
    pub fn from_json_str(content: &str) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_str(content)?;
        style.check()?;
        Ok(style)
    }

    /// Load a style file, choosing the format from the extension.
    ///
    /// `.json` files are read as JSON, everything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self, StyleError> {
        let content = fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let style = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };

        log::debug!("Loaded style from {}", path.display());
        Ok(style)
    }

    /// Check value ranges that serde cannot express
    pub fn check(&self) -> Result<(), StyleError> {
        if self.decimal_separator.chars().count() != 1 {
            return Err(StyleError::Invalid(format!(
                "decimal_separator must be a single character, got '{}'",
                self.decimal_separator
            )));
        }
        if self.line_numbers && self.line_step == 0 {
            return Err(StyleError::Invalid(
                "line_step must be positive when line_numbers is enabled".to_string(),
            ));
        }
        if self.line_step > MAX_LINE_STEP {
            return Err(StyleError::Invalid(format!(
                "line_step must not exceed {MAX_LINE_STEP}, got {}",
                self.line_step
            )));
        }
        Ok(())
    }

    /// Render a number in fixed-point with the configured precision and separator.
    pub fn format_number(&self, value: f64) -> String {
        let text = format!("{:.*}", self.precision, value);
        if self.decimal_separator == "." {
            text
        } else {
            text.replace('.', &self.decimal_separator)
        }
    }
}
