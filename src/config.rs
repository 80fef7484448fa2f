use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::loader::LoadOptions;
use crate::data::model::Value;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "campaign-analyzer.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Which dataset to open and how its columns are interpreted.
/// Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset opened at startup when it exists.
    pub dataset_path: PathBuf,
    /// CSV field separator, a single character.
    pub delimiter: String,
    pub age_column: String,
    /// Binary outcome column (`y` in the bank marketing data).
    pub outcome_column: String,
    /// Outcome value counted as a conversion.
    pub positive_outcome: String,
    /// Categorical columns offered as sidebar multiselects, in display order.
    pub filter_columns: Vec<String>,
    /// Age range preselected in the sidebar.
    pub initial_age_range: (f64, f64),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("bank-additional-full.csv"),
            delimiter: ";".to_string(),
            age_column: "age".to_string(),
            outcome_column: "y".to_string(),
            positive_outcome: "yes".to_string(),
            filter_columns: [
                "job",
                "marital",
                "default",
                "housing",
                "loan",
                "contact",
                "month",
                "day_of_week",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            initial_age_range: (30.0, 50.0),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.load_options()?;
        Ok(config)
    }

    /// Load `path` if present, falling back to defaults on absence or error.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring invalid configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        match self.delimiter.as_bytes() {
            [b] => Ok(LoadOptions { delimiter: *b }),
            _ => bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter),
        }
    }

    /// The positive outcome typed the same way loaded cells are.
    pub fn positive_value(&self) -> Value {
        Value::infer(&self.positive_outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_bank_dataset() {
        let config = AppConfig::default();
        assert_eq!(config.load_options().unwrap().delimiter, b';');
        assert_eq!(config.positive_value(), Value::from("yes"));
        assert_eq!(config.filter_columns.len(), 8);
        assert_eq!(config.initial_age_range, (30.0, 50.0));
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "delimiter": ",", "positive_outcome": "1", "filter_columns": ["job"] }"#,
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.load_options().unwrap().delimiter, b',');
        assert_eq!(config.positive_value(), Value::Integer(1));
        assert_eq!(config.filter_columns, vec!["job".to_string()]);
        assert_eq!(config.age_column, "age");
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "delimiter": ";;" }"#).unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(config, AppConfig::default());
    }
}
