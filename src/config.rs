use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "JOBFINDER_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub page_size: usize,
    /// Origin for commute directions.
    pub home_address: String,
    /// City pinned to the top of the location filter.
    pub home_city: String,
    /// Scrape runs can take a while; keep this generous.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 50,
            home_address: "Laan van Decima 1B, Haarlem".to_string(),
            home_city: "Haarlem".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load `config.toml` from the platform config dir, then apply the
    /// `JOBFINDER_API_URL` override. A missing file means defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_url = url;
        }
        config.normalize();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "jobfinder")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_url = url;
            self.normalize();
        }
        self
    }

    fn normalize(&mut self) {
        while self.api_url.ends_with('/') {
            self.api_url.pop();
        }
        if self.page_size == 0 {
            self.page_size = Config::default().page_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::from_toml(
            r#"
            api_url = "http://jobs.lan:9000/"
            page_size = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://jobs.lan:9000");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.home_city, "Haarlem");
    }

    #[test]
    fn zero_page_size_falls_back() {
        let config = Config::from_toml("page_size = 0").unwrap();
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn cli_url_wins() {
        let config = Config::default().with_api_url(Some("http://other/".into()));
        assert_eq!(config.api_url, "http://other");
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(Config::from_toml("page_size = \"lots\"").is_err());
    }
}
