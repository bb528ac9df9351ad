//! Console defaults.
//!
//! [`ConsoleConfig`] is the table of defaults that per-call options fall
//! back to. Every field has a default, so a config file only needs the
//! values it changes:
//!
//! ```yaml
//! backend: ansi
//! status:
//!   text_color: yellow
//! progress:
//!   bar_length: 60
//!   fill: "#"
//! table:
//!   indent: 2
//!   col_sep: "|"
//!   row_sep: "-"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::backend::BackendKind;
use crate::color::ColorSpec;
use crate::error::{ConsoleError, Result};

/// Defaults for the whole console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend to drive; overridden by `COLOR_CONSOLE_BACKEND`.
    pub backend: BackendKind,
    pub status: StatusConfig,
    pub progress: ProgressConfig,
    pub table: TableConfig,
}

impl ConsoleConfig {
    /// Parses a config from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| ConsoleError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Status line colors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    #[serde(alias = "color")]
    pub text_color: Option<ColorSpec>,
    pub background_color: Option<ColorSpec>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            text_color: Some(ColorSpec::CYAN),
            background_color: None,
        }
    }
}

/// Progress bar shape. Colors come from [`StatusConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub total: u64,
    pub bar_length: usize,
    pub fill: char,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            total: 100,
            bar_length: 40,
            fill: '=',
        }
    }
}

/// Table layout and colors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub indent: usize,
    #[serde(alias = "color")]
    pub text_color: Option<ColorSpec>,
    pub background_color: Option<ColorSpec>,
    pub col_sep: Option<String>,
    pub row_sep: Option<String>,
    pub corner: Option<String>,
    /// Width to lay tables out in when output is not a terminal.
    pub fallback_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            indent: 0,
            text_color: Some(ColorSpec::CYAN),
            background_color: None,
            col_sep: None,
            row_sep: None,
            corner: None,
            fallback_width: 10_000,
        }
    }
}
