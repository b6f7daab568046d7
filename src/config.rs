//! Handler settings
//!
//! `Settings` is an immutable value handed to the handler at construction.
//! It is built either directly with [`Settings::new`] plus the `with_*`
//! methods, or from a TOML file with [`Settings::load`]. Validation runs
//! up front: a missing dataset or keyfile fails construction instead of a
//! later write.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw settings file shape; everything is optional until validation.
#[derive(Debug, Clone, Deserialize, Default)]
struct SettingsFile {
    dataset: Option<String>,
    keyfile: Option<String>,
    environment: Option<String>,
    exclude_env: Option<String>,
    show_results: Option<bool>,
    table_suffix: Option<String>,
}

/// Validated handler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Dataset that holds the log tables
    pub dataset: String,
    /// Service credentials file handed to the store client
    pub keyfile: PathBuf,
    /// Name of the running environment
    pub environment: String,
    /// Environments whose events are mirrored instead of persisted
    pub exclude_env: Vec<String>,
    /// Mirror events even when they are persisted
    pub show_results: bool,
    /// Optional table name suffix, used as `<table>_<suffix>`
    pub table_suffix: Option<String>,
}

impl Settings {
    /// Create settings for a dataset and credentials keyfile.
    ///
    /// The environment defaults to `production`, no environments are
    /// excluded, mirroring is off, and no suffix is applied.
    pub fn new(dataset: impl Into<String>, keyfile: impl Into<PathBuf>) -> Result<Self> {
        let dataset = dataset.into();
        if dataset.trim().is_empty() {
            return Err(Error::Config("A dataset name is required".to_string()));
        }

        let keyfile = keyfile.into();
        if keyfile.as_os_str().is_empty() {
            return Err(Error::Config(
                "A credentials keyfile path is required".to_string(),
            ));
        }

        Ok(Self {
            dataset,
            keyfile,
            environment: "production".to_string(),
            exclude_env: Vec::new(),
            show_results: false,
            table_suffix: None,
        })
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: SettingsFile = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Invalid settings file {}: {}", path.display(), e))
        })?;

        let mut settings = Settings::new(
            file.dataset.unwrap_or_default(),
            file.keyfile.unwrap_or_default(),
        )?;
        if let Some(environment) = file.environment {
            settings = settings.with_environment(environment);
        }
        if let Some(raw) = file.exclude_env {
            settings = settings.with_exclude_env(&raw);
        }
        if let Some(show_results) = file.show_results {
            settings = settings.with_show_results(show_results);
        }
        if let Some(suffix) = file.table_suffix {
            settings = settings.with_table_suffix(suffix);
        }
        Ok(settings)
    }

    /// Set the running environment name
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Set the excluded environments from a bracketed list string
    pub fn with_exclude_env(mut self, raw: &str) -> Self {
        self.exclude_env = parse_exclude_list(raw);
        self
    }

    /// Set whether persisted events are mirrored too
    pub fn with_show_results(mut self, show_results: bool) -> Self {
        self.show_results = show_results;
        self
    }

    /// Set the table name suffix; an empty suffix counts as none
    pub fn with_table_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.table_suffix = if suffix.is_empty() { None } else { Some(suffix) };
        self
    }

    /// Whether the running environment is on the exclusion list
    pub fn is_excluded(&self) -> bool {
        self.exclude_env.iter().any(|e| e == &self.environment)
    }
}

/// Parse a `[a, b]` style exclusion list.
///
/// Brackets are stripped wherever they appear and items are split on
/// commas and trimmed. Empty items are dropped, so `""` and `"[]"` both
/// give an empty list.
pub fn parse_exclude_list(raw: &str) -> Vec<String> {
    raw.replace(['[', ']'], "")
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exclude_list() {
        assert_eq!(parse_exclude_list("[test, debug]"), vec!["test", "debug"]);
        assert_eq!(parse_exclude_list("[dev]"), vec!["dev"]);
        assert_eq!(parse_exclude_list("[ dev , staging ]"), vec!["dev", "staging"]);
        assert_eq!(parse_exclude_list("dev"), vec!["dev"]);
        assert!(parse_exclude_list("").is_empty());
        assert!(parse_exclude_list("[]").is_empty());
        assert!(parse_exclude_list("[ , ]").is_empty());
    }

    #[test]
    fn test_new_applies_defaults() {
        let settings = Settings::new("acme", "/secrets/bq.json").unwrap();
        assert_eq!(settings.dataset, "acme");
        assert_eq!(settings.keyfile, PathBuf::from("/secrets/bq.json"));
        assert_eq!(settings.environment, "production");
        assert!(settings.exclude_env.is_empty());
        assert!(!settings.show_results);
        assert!(settings.table_suffix.is_none());
    }

    #[test]
    fn test_new_rejects_missing_dataset_and_keyfile() {
        let err = Settings::new("", "/secrets/bq.json").unwrap_err();
        assert!(err.to_string().contains("dataset"));

        let err = Settings::new("acme", "").unwrap_err();
        assert!(err.to_string().contains("keyfile"));
    }

    #[test]
    fn test_exclusion_matches_environment() {
        let settings = Settings::new("acme", "key.json")
            .unwrap()
            .with_environment("dev")
            .with_exclude_env("[dev, test]");
        assert!(settings.is_excluded());

        let settings = settings.with_environment("production");
        assert!(!settings.is_excluded());
    }

    #[test]
    fn test_empty_suffix_counts_as_none() {
        let settings = Settings::new("acme", "key.json")
            .unwrap()
            .with_table_suffix("");
        assert!(settings.table_suffix.is_none());

        let settings = settings.with_table_suffix("dev");
        assert_eq!(settings.table_suffix.as_deref(), Some("dev"));
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablog.toml");
        std::fs::write(
            &path,
            r#"
dataset = "acme"
keyfile = "/secrets/bq.json"
environment = "staging"
exclude_env = "[dev, test]"
show_results = true
table_suffix = "stage"
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.dataset, "acme");
        assert_eq!(settings.keyfile, PathBuf::from("/secrets/bq.json"));
        assert_eq!(settings.environment, "staging");
        assert_eq!(settings.exclude_env, vec!["dev", "test"]);
        assert!(settings.show_results);
        assert_eq!(settings.table_suffix.as_deref(), Some("stage"));
    }

    #[test]
    fn test_load_defaults_environment_to_production() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablog.toml");
        std::fs::write(&path, "dataset = \"acme\"\nkeyfile = \"key.json\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.environment, "production");
        assert!(!settings.is_excluded());
    }

    #[test]
    fn test_load_rejects_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablog.toml");
        std::fs::write(&path, "keyfile = \"key.json\"\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablog.toml");
        std::fs::write(&path, "dataset = [unterminated\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let err = Settings::load(Path::new("/nonexistent/tablog.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
