//! Shell configuration module.
//!
//! Handles loading and validating `prompt-shell.toml`. Configuration is
//! sparse: every key is optional and unspecified keys keep their defaults.
//! Unknown keys are rejected to catch typos early.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! url_mode = "history"    # "history" (/history) or "hash" (#/history)
//! # fallback = "home"     # Route name to land on after a failed navigation
//! # seed = "prompts.toml" # Seed file replacing the built-in templates
//! ```
//!
//! The file is looked up as `prompt-shell.toml` in the working directory
//! unless an explicit path is given (the CLI's `--config`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "prompt-shell.toml";

/// How the session presents the current location as a URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// Rewritten paths: `/history`.
    #[default]
    History,
    /// Fragment paths: `#/history`.
    Hash,
}

impl UrlMode {
    /// Render a canonical path on this mode's URL surface.
    pub fn format(&self, path: &str) -> String {
        match self {
            UrlMode::History => path.to_string(),
            UrlMode::Hash => format!("#{path}"),
        }
    }
}

/// Shell configuration loaded from `prompt-shell.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// URL presentation mode.
    pub url_mode: UrlMode,
    /// Route name to land on when a navigation target matches nothing.
    /// Absent by default: a missed navigation then stays put and reports
    /// the failure.
    pub fallback: Option<String>,
    /// Seed file replacing the built-in template set.
    pub seed: Option<PathBuf>,
}

impl ShellConfig {
    /// Read an explicit config file, or fall back to `prompt-shell.toml`
    /// in the working directory, or defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<ShellConfig, ConfigError> {
        match explicit {
            Some(path) => ShellConfig::from_file(path),
            None => ShellConfig::load_in(Path::new(".")),
        }
    }

    /// Read `prompt-shell.toml` from `dir` if present, else defaults.
    pub fn load_in(dir: &Path) -> Result<ShellConfig, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            ShellConfig::from_file(&path)
        } else {
            Ok(ShellConfig::default())
        }
    }

    /// Read and validate a config file. A missing file is an error here;
    /// [`ShellConfig::load`] handles the optional lookup.
    pub fn from_file(path: &Path) -> Result<ShellConfig, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: ShellConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values. Whether a fallback name exists in the route
    /// table is checked at session startup, where the table is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.fallback
            && name.is_empty()
        {
            return Err(ConfigError::Validation(
                "fallback route name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Returns a fully-commented stock `prompt-shell.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Prompt Shell Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# URL presentation for the session:
#   "history" -> rewritten paths like /history
#   "hash"    -> fragment paths like #/history
url_mode = "history"

# Route name to land on when a navigation target matches nothing.
# Omit to surface failed navigations instead of redirecting.
# fallback = "home"

# Seed file replacing the built-in prompt templates. Same TOML shape as
# the embedded set: [[prompts]] tables with id, title, content, tag,
# views, stars, created_at ("YYYY-MM-DD HH:MM:SS", quoted) and type
# ("preset", "custom" or "favorite").
# seed = "prompts.toml"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.url_mode, UrlMode::History);
        assert!(config.fallback.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: ShellConfig = toml::from_str("").unwrap();
        assert_eq!(config.url_mode, UrlMode::History);
        assert!(config.fallback.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let config: ShellConfig = toml::from_str(r#"url_mode = "hash""#).unwrap();
        assert_eq!(config.url_mode, UrlMode::Hash);
        // Unspecified values keep their defaults
        assert!(config.fallback.is_none());
        assert!(config.seed.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
url_mode = "hash"
fallback = "home"
seed = "custom-prompts.toml"
"#;
        let config: ShellConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.url_mode, UrlMode::Hash);
        assert_eq!(config.fallback.as_deref(), Some("home"));
        assert_eq!(config.seed, Some(PathBuf::from("custom-prompts.toml")));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ShellConfig, _> = toml::from_str(r#"url_moed = "hash""#);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_url_mode_rejected() {
        let result: Result<ShellConfig, _> = toml::from_str(r#"url_mode = "memory""#);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(ShellConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_fallback_name() {
        let config = ShellConfig {
            fallback: Some(String::new()),
            ..ShellConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback"));
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_in_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = ShellConfig::load_in(tmp.path()).unwrap();
        assert_eq!(config.url_mode, UrlMode::History);
    }

    #[test]
    fn load_in_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), r#"url_mode = "hash""#).unwrap();
        let config = ShellConfig::load_in(tmp.path()).unwrap();
        assert_eq!(config.url_mode, UrlMode::Hash);
    }

    #[test]
    fn load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, r#"fallback = "home""#).unwrap();
        let config = ShellConfig::load(Some(&path)).unwrap();
        assert_eq!(config.fallback.as_deref(), Some("home"));
    }

    #[test]
    fn load_explicit_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = ShellConfig::load(Some(&tmp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        let result = ShellConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, r#"fallback = """#).unwrap();
        let result = ShellConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // URL modes
    // =========================================================================

    #[test]
    fn url_mode_formats_paths() {
        assert_eq!(UrlMode::History.format("/history"), "/history");
        assert_eq!(UrlMode::Hash.format("/history"), "#/history");
        assert_eq!(UrlMode::Hash.format("/"), "#/");
    }

    // =========================================================================
    // stock_config_toml
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ShellConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.url_mode, UrlMode::History);
        assert!(config.fallback.is_none());
        assert!(config.seed.is_none());
    }
}
