//! Application state management.
//!
//! Defines the AppState struct holding the services every route handler
//! shares, all backed by one `CommerceBackend`.

use crate::config::{ConfigError, ConsoleConfig};
use crate::services::{CartService, TypeDefinitionService};
use crate::storage::{CommerceBackend, InMemoryBackend};
use axum::extract::FromRef;
use std::sync::Arc;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Type definition editing
    pub types: TypeDefinitionService,
    /// Cart wizard and items table
    pub carts: CartService,
    /// Locale used when a request does not name one
    pub default_locale: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn CommerceBackend>, default_locale: impl Into<String>) -> Self {
        Self {
            types: TypeDefinitionService::new(backend.clone()),
            carts: CartService::new(backend),
            default_locale: default_locale.into(),
        }
    }

    /// State over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBackend::new()),
            crate::config::DEFAULT_LOCALE,
        )
    }

    /// State for the backend selected by `config`.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ConfigError> {
        let backend = config.build_backend()?;
        Ok(Self::new(backend, config.default_locale.clone()))
    }
}

// Allow services to be extracted directly from AppState
impl FromRef<AppState> for TypeDefinitionService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.types.clone()
    }
}

impl FromRef<AppState> for CartService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.carts.clone()
    }
}
