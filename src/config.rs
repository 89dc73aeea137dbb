//! Application configuration.
//!
//! Stored with confy in the platform config directory; confy writes the
//! defaults on first run. An unreadable file falls back to the defaults.

use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_BASE_URL, DEFAULT_SEARCH_LIMIT};

const CONFIG_NAME: &str = "saavn-rs";
const BASE_URL_ENV: &str = "SAAVN_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub base_url: String,
    /// Languages requested from the home feed, comma separated
    pub home_language: String,
    pub search_limit: u32,
    pub preload_song_query: String,
    pub preload_album_query: String,
    pub preload_artist_query: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            base_url: DEFAULT_BASE_URL.to_string(),
            home_language: "hindi,english".to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            preload_song_query: "Latest".to_string(),
            preload_album_query: "Top".to_string(),
            preload_artist_query: "Arijit".to_string(),
        }
    }
}

impl AppConfig {
    fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            tracing::info!(%url, "Catalog URL overridden from environment");
            self.base_url = url;
        }
        self
    }
}

pub fn load_config() -> AppConfig {
    let config: AppConfig = match confy::load(CONFIG_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load config, using defaults");
            AppConfig::default()
        }
    };
    config.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_overrides_base_url() {
        let config = AppConfig::default().with_base_url_override(Some("http://localhost:3000/api".into()));
        assert_eq!(config.base_url, "http://localhost:3000/api");

        let config = AppConfig::default().with_base_url_override(Some("  ".into()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "search_limit": 50 }"#).unwrap();
        assert_eq!(config.search_limit, 50);
        assert_eq!(config.preload_song_query, "Latest");
        assert_eq!(config.home_language, "hindi,english");
    }
}
