use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_BOARD_NAME: &str = "My Board";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum number of undoable commands kept.
    #[serde(default)]
    pub history_capacity: Option<usize>,
    /// Upper bound on serialized store size, in bytes.
    #[serde(default)]
    pub storage_quota_bytes: Option<u64>,
    #[serde(default)]
    pub default_board_name: Option<String>,
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/pinboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("pinboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("pinboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn effective_history_capacity(&self) -> usize {
        match self.history_capacity {
            Some(0) | None => DEFAULT_HISTORY_CAPACITY,
            Some(capacity) => capacity,
        }
    }

    pub fn effective_default_board_name(&self) -> &str {
        self.default_board_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_BOARD_NAME)
    }

    pub fn default_data_file() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("pinboard").join("pinboard.json"))
    }

    pub fn effective_data_file(&self) -> Option<PathBuf> {
        self.data_file.clone().or_else(Self::default_data_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.effective_history_capacity(), 100);
        assert_eq!(config.effective_default_board_name(), "My Board");
        assert!(config.storage_quota_bytes.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            history_capacity = 25
            storage_quota_bytes = 1048576
            default_board_name = "Ideas"
            "#,
        )
        .unwrap();
        assert_eq!(config.effective_history_capacity(), 25);
        assert_eq!(config.storage_quota_bytes, Some(1_048_576));
        assert_eq!(config.effective_default_board_name(), "Ideas");
    }

    #[test]
    fn test_zero_capacity_falls_back() {
        let config = AppConfig {
            history_capacity: Some(0),
            ..Default::default()
        };
        assert_eq!(config.effective_history_capacity(), DEFAULT_HISTORY_CAPACITY);
    }
}
