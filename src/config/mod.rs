//! Configuration management for `linkhint.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   └── hints      # [hints]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! ├── util.rs        # Config file lookup
//! └── mod.rs         # LinkhintConfig (this file)
//! ```
//!
//! A missing config file is not an error: every field has a default, and
//! CLI flags can override the ones that matter most.

pub mod section;
pub mod types;
mod util;

pub use section::{AsRule, HintsConfig, IncludeSetting, RelRule};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::cli::HintArgs;
use crate::hint::HintSpec;
use crate::log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing linkhint.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkhintConfig {
    /// Path the config was loaded from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Hint settings
    #[serde(default)]
    pub hints: HintsConfig,
}

impl LinkhintConfig {
    /// Load configuration for a CLI run.
    ///
    /// `config_name` is searched upward from `start_dir`; when nothing is
    /// found the defaults are used.
    pub fn load(config_name: &Path, start_dir: &Path) -> Result<Self, ConfigError> {
        match find_config_file(config_name, start_dir) {
            Some(path) => Self::from_path(&path),
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Ok(Self::default())
            }
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate the `[hints]` section and build the engine configuration.
    pub fn hint_spec(&self) -> Result<HintSpec, ConfigError> {
        self.hints.to_spec()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply `--rel` / `--include` overrides.
    pub fn apply_hint_args(&mut self, args: &HintArgs) {
        Self::update_option(&mut self.hints.rel, args.rel.as_ref());
        let include = args.include.as_deref().map(IncludeSetting::from_cli);
        Self::update_option(&mut self.hints.include, include.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> LinkhintConfig {
    let (parsed, ignored) = LinkhintConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
