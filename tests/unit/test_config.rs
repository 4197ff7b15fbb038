//! Unit tests for environment configuration

use commerce_console_api::config::{ConfigError, ConsoleConfig, DEFAULT_PORT};
use commerce_console_api::routes::AppState;
use serial_test::serial;

const KEYS: [&str; 6] = [
    "COMMERCE_API_URL",
    "COMMERCE_PROJECT_KEY",
    "COMMERCE_ACCESS_TOKEN",
    "PORT",
    "DEFAULT_LOCALE",
    "CORS_ALLOWED_ORIGINS",
];

fn clear_env() {
    for key in KEYS {
        // SAFETY: tests touching the environment are serialized
        unsafe { std::env::remove_var(key) };
    }
}

fn set_env(key: &str, value: &str) {
    // SAFETY: tests touching the environment are serialized
    unsafe { std::env::set_var(key, value) };
}

#[test]
#[serial]
fn test_from_env_defaults_to_in_memory() {
    clear_env();
    let config = ConsoleConfig::from_env().unwrap();
    assert!(config.remote.is_none());
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.default_locale, "en");
    assert!(AppState::from_config(&config).is_ok());
}

#[test]
#[serial]
fn test_from_env_reads_remote_settings() {
    clear_env();
    set_env("COMMERCE_API_URL", "https://api.example.com");
    set_env("COMMERCE_PROJECT_KEY", "my-shop");
    set_env("COMMERCE_ACCESS_TOKEN", "secret");
    set_env("PORT", "9090");

    let config = ConsoleConfig::from_env().unwrap();
    let remote = config.remote.clone().unwrap();
    assert_eq!(remote.project_key, "my-shop");
    assert_eq!(remote.access_token.as_deref(), Some("secret"));
    assert_eq!(config.port, 9090);

    let backend = config.build_backend();
    assert!(backend.is_ok());
    clear_env();
}

#[test]
#[serial]
fn test_from_env_rejects_invalid_port() {
    clear_env();
    set_env("PORT", "eighty");
    let result = ConsoleConfig::from_env();
    assert!(matches!(result, Err(ConfigError::InvalidPort(value)) if value == "eighty"));
    clear_env();
}
