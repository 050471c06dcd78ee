//! Configuration service.
//!
//! Loads [`ClientConfig`] from `config.toml` and layers environment
//! overrides on top.

use crate::paths::NewsdeskPaths;
use crate::storage::AtomicTomlFile;
use newsdesk_core::Result;
use newsdesk_core::config::ClientConfig;
use newsdesk_core::i18n::Language;
use std::str::FromStr;

/// Overrides `api_base_url`.
pub const API_URL_ENV: &str = "NEWSDESK_API_URL";
/// Overrides `language` (`pt` or `es`).
pub const LANG_ENV: &str = "NEWSDESK_LANG";

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(paths: &NewsdeskPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Effective configuration: the stored file with environment overrides
    /// applied.
    pub fn load(&self) -> Result<ClientConfig> {
        let stored = self.load_stored()?;
        Ok(apply_overrides(stored, |key| std::env::var(key).ok()))
    }

    /// The configuration as stored, without overrides.
    ///
    /// Writes the defaults to disk if the file does not exist yet.
    pub fn load_stored(&self) -> Result<ClientConfig> {
        if let Some(config) = self.file.load()? {
            return Ok(config);
        }

        let config = ClientConfig::default();
        if let Err(e) = self.file.save(&config) {
            // read-only homes still get a working default
            tracing::warn!("[ConfigService] Failed to write default config: {}", e);
        } else {
            tracing::info!(
                "[ConfigService] Created default config at {}",
                self.file.path().display()
            );
        }
        Ok(config)
    }

    /// Sets one stored key and returns the stored result.
    pub fn set_value(&self, key: &str, value: &str) -> Result<ClientConfig> {
        self.file
            .update(ClientConfig::default(), |config| config.set_value(key, value))
    }
}

fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> ClientConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.is_empty()) {
        tracing::debug!("[ConfigService] {} overrides api_base_url", API_URL_ENV);
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    if let Some(lang) = lookup(LANG_ENV).filter(|lang| !lang.is_empty()) {
        match Language::from_str(&lang) {
            Ok(language) => config.language = language,
            Err(_) => tracing::warn!("[ConfigService] Ignoring unsupported {}={}", LANG_ENV, lang),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsdesk_core::config::DEFAULT_API_BASE_URL;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        let service = ConfigService::new(&paths);

        let config = service.load_stored().unwrap();

        assert_eq!(config, ClientConfig::default());
        assert!(paths.config_file().exists());
    }

    #[test]
    fn test_set_value_persists() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        let service = ConfigService::new(&paths);

        service.set_value("language", "es").unwrap();
        service.set_value("theme", "plain").unwrap();

        let stored = ConfigService::new(&paths).load_stored().unwrap();
        assert_eq!(stored.language, Language::Es);
        assert_eq!(stored.theme, "plain");
        assert_eq!(stored.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_invalid_set_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        let service = ConfigService::new(&paths);
        service.set_value("theme", "plain").unwrap();

        assert!(service.set_value("language", "en").is_err());
        assert_eq!(service.load_stored().unwrap().language, Language::Pt);
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_URL_ENV, "https://news.example.com/api/v1/"),
            (LANG_ENV, "ES"),
        ]);

        let config = apply_overrides(ClientConfig::default(), |key| {
            env.get(key).map(|value| value.to_string())
        });

        assert_eq!(config.api_base_url, "https://news.example.com/api/v1");
        assert_eq!(config.language, Language::Es);
    }

    #[test]
    fn test_unsupported_language_override_is_ignored() {
        let config = apply_overrides(ClientConfig::default(), |key| {
            (key == LANG_ENV).then(|| "en".to_string())
        });

        assert_eq!(config.language, Language::Pt);
    }
}
