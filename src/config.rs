use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

const URL_VARS: [&str; 2] = ["DIARY_READER_STORE_URL", "SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["DIARY_READER_STORE_KEY", "SUPABASE_ANON_KEY"];

/// Which collections make up the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Diary summaries and novel chapters, merged.
    #[default]
    Dual,
    /// Diary summaries only.
    Single,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store_url: Option<String>,
    pub store_key: Option<String>,

    #[serde(default)]
    pub mode: SourceMode,

    #[serde(default = "default_summary_collection")]
    pub summary_collection: String,

    #[serde(default = "default_novel_collection")]
    pub novel_collection: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Validated connection details for the remote store.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

fn default_summary_collection() -> String {
    "daily_entries".to_string()
}

fn default_novel_collection() -> String {
    "novels".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            store_key: None,
            mode: SourceMode::default(),
            summary_collection: default_summary_collection(),
            novel_collection: default_novel_collection(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> (Self, Option<AppError>) {
        Self::load_with(&Self::config_path(), |name| std::env::var(name).ok())
    }

    /// Never fails. A file that cannot be read or parsed is replaced by the
    /// defaults, and its error is handed back so it can be shown if the
    /// environment does not configure the store either.
    pub fn load_with<F>(path: &Path, lookup: F) -> (Self, Option<AppError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, error) = match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                let error = AppError::Config(format!("cannot read {}: {}", path.display(), e));
                (Self::default(), Some(error))
            }
        };
        config.apply_env(lookup);
        (config, error)
    }

    /// Reads the file at `path`, writing defaults there first if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Err(e) = config.save_to(path) {
                tracing::warn!("Could not write default config to {}: {}", path.display(), e);
            }
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("diary-reader")
            .join("config.toml")
    }

    /// Environment values win over the file; the first non-empty variable applies.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(url) = first_set(&URL_VARS[..]) {
            self.store_url = Some(url);
        }
        if let Some(key) = first_set(&KEY_VARS[..]) {
            self.store_key = Some(key);
        }
    }

    pub fn store_settings(&self) -> Result<StoreSettings> {
        let url = non_empty(self.store_url.as_deref());
        let key = non_empty(self.store_key.as_deref());

        let (Some(url), Some(key)) = (url, key) else {
            return Err(AppError::Config("store not configured".to_string()));
        };

        let base_url = Url::parse(url)
            .map_err(|e| AppError::Config(format!("invalid store url '{url}': {e}")))?;

        Ok(StoreSettings {
            base_url,
            api_key: key.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.mode, SourceMode::Dual);
        assert_eq!(config.summary_collection, "daily_entries");
        assert_eq!(config.novel_collection, "novels");
        assert!(config.store_url.is_none());
    }

    #[test]
    fn reads_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "store_url = \"https://example.supabase.co\"\nstore_key = \"anon\"\nmode = \"single\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.mode, SourceMode::Single);
        assert_eq!(config.timeout_secs, 30);
        let settings = config.store_settings().unwrap();
        assert_eq!(settings.base_url.as_str(), "https://example.supabase.co/");
        assert_eq!(settings.api_key, "anon");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = [").unwrap();

        assert!(matches!(Config::load_from(&path), Err(AppError::Toml(_))));
    }

    #[test]
    fn unwritable_config_dir_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(!path.exists());
        assert_eq!(config.mode, SourceMode::Dual);
    }

    #[test]
    fn malformed_file_yields_to_env_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = [").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SUPABASE_URL", "https://env.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);

        let (config, error) = Config::load_with(&path, |name| env.get(name).map(|v| v.to_string()));

        assert!(matches!(error, Some(AppError::Config(_))));
        assert_eq!(config.mode, SourceMode::Dual);
        let settings = config.store_settings().unwrap();
        assert_eq!(settings.base_url.as_str(), "https://env.supabase.co/");
    }

    #[test]
    fn malformed_file_without_env_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mode = [").unwrap();

        let (config, error) = Config::load_with(&path, |_| None);

        let message = error.unwrap().user_message();
        assert!(message.starts_with("cannot read "));
        assert!(message.contains("config.toml"));
        assert!(config.store_settings().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DIARY_READER_STORE_URL", ""),
            ("SUPABASE_URL", "https://env.supabase.co"),
            ("DIARY_READER_STORE_KEY", "from-env"),
        ]);
        let mut config = Config {
            store_url: Some("https://file.supabase.co".to_string()),
            ..Config::default()
        };

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.store_url.as_deref(), Some("https://env.supabase.co"));
        assert_eq!(config.store_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn unconfigured_store_is_a_config_error() {
        let config = Config {
            store_url: Some("https://example.supabase.co".to_string()),
            store_key: Some("   ".to_string()),
            ..Config::default()
        };

        let err = config.store_settings().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.user_message(), "store not configured");
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let config = Config {
            store_url: Some("not a url".to_string()),
            store_key: Some("anon".to_string()),
            ..Config::default()
        };

        assert!(matches!(config.store_settings(), Err(AppError::Config(_))));
    }
}
