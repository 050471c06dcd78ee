//! Composition root: every service is built once here and handed to the
//! commands by reference.

use anyhow::{Context, Result, anyhow};
use newsdesk_core::config::ClientConfig;
use newsdesk_core::credential::CredentialStore;
use newsdesk_core::i18n::{Language, MessageKey};
use newsdesk_core::newsletter::NewsletterDispatcher;
use newsdesk_core::session::{Access, Account, SessionManager};
use newsdesk_infrastructure::{ConfigService, FileCredentialStore, NewsdeskPaths};
use newsdesk_interaction::{ApiClient, HttpNewsletterApi, HttpSessionApi};
use std::sync::Arc;

use crate::GlobalOpts;

pub struct AppContext {
    pub paths: NewsdeskPaths,
    pub config_service: ConfigService,
    pub config: ClientConfig,
    pub session: Arc<SessionManager>,
    pub dispatcher: Arc<NewsletterDispatcher>,
}

impl AppContext {
    pub fn bootstrap(opts: &GlobalOpts) -> Result<Self> {
        let paths = NewsdeskPaths::new(opts.home.as_deref())
            .map_err(|e| anyhow!("Failed to resolve Newsdesk home: {}", e))?;
        tracing::debug!("[Bootstrap] Using home {}", paths.base_dir().display());

        let config_service = ConfigService::new(&paths);
        let mut config = config_service
            .load()
            .with_context(|| format!("Failed to load {}", paths.config_file().display()))?;
        apply_flags(&mut config, opts);
        tracing::info!(
            "[Bootstrap] API {} (language: {})",
            config.api_base_url,
            config.language
        );

        let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(&paths));
        let client = ApiClient::from_config(&config);

        let session = Arc::new(SessionManager::new(
            Arc::new(HttpSessionApi::new(client.clone())),
            store.clone(),
        ));
        let dispatcher = Arc::new(NewsletterDispatcher::with_theme(
            Arc::new(HttpNewsletterApi::new(client, store)),
            config.theme.clone(),
        ));

        Ok(Self {
            paths,
            config_service,
            config,
            session,
            dispatcher,
        })
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn text(&self, key: MessageKey) -> &'static str {
        key.text(self.language())
    }

    /// Validates the stored session and returns the signed-in account.
    ///
    /// Fails with the localized "please log in" message when the guard
    /// redirects.
    pub async fn require_session(&self) -> Result<Account> {
        self.session.initialize().await;

        let mut guard = self.session.guard();
        match guard.settled().await {
            Access::Authorized => self
                .session
                .account()
                .ok_or_else(|| anyhow!(self.text(MessageKey::SessionRequired))),
            Access::Pending | Access::Redirect => {
                Err(anyhow!(self.text(MessageKey::SessionRequired)))
            }
        }
    }
}

fn apply_flags(config: &mut ClientConfig, opts: &GlobalOpts) {
    if let Some(url) = &opts.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(language) = opts.lang {
        config.language = language;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let mut config = ClientConfig::default();
        let opts = GlobalOpts {
            api_url: Some("https://news.example.com/api/v1/".to_string()),
            lang: Some(Language::Es),
            ..Default::default()
        };

        apply_flags(&mut config, &opts);

        assert_eq!(config.api_base_url, "https://news.example.com/api/v1");
        assert_eq!(config.language, Language::Es);
    }

    #[test]
    fn test_bootstrap_in_temp_home() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let opts = GlobalOpts {
            home: Some(temp_dir.path().to_path_buf()),
            lang: Some(Language::Es),
            ..Default::default()
        };

        let ctx = AppContext::bootstrap(&opts).unwrap();

        assert_eq!(ctx.language(), Language::Es);
        assert_eq!(ctx.paths.base_dir(), temp_dir.path());
        assert!(ctx.paths.config_file().exists());
        assert_eq!(ctx.text(MessageKey::LoginTitle), "Iniciar Sesión");
    }
}
