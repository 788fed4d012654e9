use color_eyre::eyre::Context;
use db::setup_db_pool;
use sqlx::PgPool;
use tracing::instrument;
use url::Url;

use crate::http_server::cookies::CookieKey;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: Url,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    #[instrument(name = "AppConfig::from_env")]
    pub fn from_env() -> crate::Result<Self> {
        let base_url =
            std::env::var("APP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).wrap_err("Invalid APP_BASE_URL not parsable")?;

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());

        Ok(Self {
            base_url,
            cors_origins: parse_origins(&cors_origins),
        })
    }

    pub fn app_url(&self, path: &str) -> String {
        let mut url = self.base_url.clone();

        url.set_path(path);

        url.into()
    }

    /// Session cookies are only marked `Secure` when we're served over TLS.
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub app: AppConfig,
    pub db: PgPool,
    pub cookie_key: CookieKey,
}

impl AppState {
    #[instrument(name = "AppState::from_env", err)]
    pub async fn from_env() -> crate::Result<Self> {
        let cookie_key = CookieKey::from_env_or_generate()?;

        let app_state = AppState {
            app: AppConfig::from_env()?,
            db: setup_db_pool().await?,
            cookie_key,
        };

        Ok(app_state)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_split() {
        assert_eq!(
            parse_origins(" http://localhost:8080/ , ,http://example.com"),
            vec!["http://localhost:8080", "http://example.com"]
        );
    }

    #[test]
    fn app_url_replaces_the_path() {
        let config = AppConfig {
            base_url: Url::parse("https://tasty.example/ignored").unwrap(),
            cors_origins: vec![],
        };

        assert_eq!(config.app_url("/recipes"), "https://tasty.example/recipes");
        assert!(config.is_https());
    }
}
