use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::SpendbookError;

pub const CONFIG_FILE_NAME: &str = "spendbook.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpendbookConfig {
    pub currency: char,
    pub decimal_sep: char,
    pub date_format: String,
    pub categories: Vec<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for SpendbookConfig {
    fn default() -> Self {
        Self {
            currency: '$',
            decimal_sep: '.',
            date_format: "%-m/%-d/%Y".to_string(),
            categories: ["Food", "Transport", "Shopping", "Bills", "Entertainment", "Other"]
                .into_iter()
                .map(String::from)
                .collect(),
            data_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl SpendbookConfig {
    pub fn from_toml(content: &str) -> Result<Self, SpendbookError> {
        let config: Self = toml::from_str(content)?;
        if config.categories.is_empty() {
            return Err(SpendbookError::InvalidArgument(
                "At least one category must be configured".into(),
            ));
        }
        Ok(config)
    }

    /// Directory holding the persisted expense list.
    pub fn data_dir(&self) -> Result<PathBuf, SpendbookError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("spendbook"))
            .ok_or_else(|| SpendbookError::InvalidArgument("No data directory available".into()))
    }
}

fn candidate_paths(explicit: Option<&Path>) -> Result<Vec<PathBuf>, SpendbookError> {
    if let Some(path) = explicit {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut paths = vec![std::env::current_dir()?.join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("spendbook").join(CONFIG_FILE_NAME));
    }
    Ok(paths)
}

/// Reads the first config file found, falling back to defaults when there is none.
///
/// An explicitly requested file must exist. Returns the path the config was read from.
pub fn parse_config(
    explicit: Option<&Path>,
) -> Result<(SpendbookConfig, Option<PathBuf>), SpendbookError> {
    for path in candidate_paths(explicit)? {
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            return Ok((SpendbookConfig::from_toml(&content)?, Some(path)));
        }
    }
    if let Some(path) = explicit {
        return Err(SpendbookError::InvalidArgument(format!(
            "No config file found at {}",
            path.display()
        )));
    }
    Ok((SpendbookConfig::default(), None))
}
