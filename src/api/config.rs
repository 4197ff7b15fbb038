//! Console configuration read from the environment.

use crate::storage::{CommerceBackend, GraphQlBackend, InMemoryBackend};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid COMMERCE_API_URL '{value}': {source}")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("COMMERCE_PROJECT_KEY is required when COMMERCE_API_URL is set")]
    MissingProjectKey,
    #[error("Invalid PORT '{0}'")]
    InvalidPort(String),
}

/// Connection details for the remote commerce API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteApiConfig {
    pub api_url: Url,
    pub project_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// `None` selects the in-memory backend
    pub remote: Option<RemoteApiConfig>,
    pub port: u16,
    pub default_locale: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            remote: None,
            port: DEFAULT_PORT,
            default_locale: DEFAULT_LOCALE.to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let remote = match non_empty("COMMERCE_API_URL") {
            Some(value) => {
                let api_url = Url::parse(value.trim()).map_err(|source| {
                    ConfigError::InvalidApiUrl {
                        value: value.clone(),
                        source,
                    }
                })?;
                let project_key =
                    non_empty("COMMERCE_PROJECT_KEY").ok_or(ConfigError::MissingProjectKey)?;
                Some(RemoteApiConfig {
                    api_url,
                    project_key: project_key.trim().to_string(),
                    access_token: non_empty("COMMERCE_ACCESS_TOKEN"),
                })
            }
            None => None,
        };

        let port = match non_empty("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let default_locale = non_empty("DEFAULT_LOCALE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        let cors_allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            remote,
            port,
            default_locale,
            cors_allowed_origins,
        })
    }

    /// Backend selected by the configuration.
    pub fn build_backend(&self) -> Result<Arc<dyn CommerceBackend>, ConfigError> {
        match &self.remote {
            Some(remote) => {
                let backend = GraphQlBackend::new(
                    &remote.api_url,
                    &remote.project_key,
                    remote.access_token.clone(),
                )
                .map_err(|source| ConfigError::InvalidApiUrl {
                    value: remote.api_url.to_string(),
                    source,
                })?;
                if remote.access_token.is_none() {
                    warn!("COMMERCE_ACCESS_TOKEN not set, requests will be unauthenticated");
                }
                info!("Using GraphQL backend at {}", backend.endpoint());
                Ok(Arc::new(backend))
            }
            None => {
                info!("COMMERCE_API_URL not set, using in-memory backend");
                Ok(Arc::new(InMemoryBackend::new()))
            }
        }
    }
}
