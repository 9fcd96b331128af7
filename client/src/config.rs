//! Client configuration, read from the environment.

use std::time::Duration;

use common::search_const::{KEY_HINTS_DEBOUNCE_MS, PAGE_SIZE};

pub const API_URL_VAR: &str = "UDIAB_API_URL";
pub const PAGE_SIZE_VAR: &str = "UDIAB_PAGE_SIZE";
pub const KEY_HINTS_DEBOUNCE_VAR: &str = "UDIAB_KEY_HINTS_DEBOUNCE_MS";
pub const REQUEST_TIMEOUT_VAR: &str = "UDIAB_REQUEST_TIMEOUT_MS";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin serving `/api/...`.
    pub api_url: String,
    pub page_size: u64,
    pub key_hints_debounce: Duration,
    /// Whole-request limit; a stalled request fails instead of hanging.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: PAGE_SIZE,
            key_hints_debounce: Duration::from_millis(KEY_HINTS_DEBOUNCE_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for missing or
    /// unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |name: &str, default: u64| match lookup(name) {
            None => default,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    tracing::warn!(name, value = %raw, default, "ignoring invalid configuration value");
                    default
                }
            },
        };
        Self {
            api_url: lookup(API_URL_VAR).filter(|url| !url.trim().is_empty()).unwrap_or(defaults.api_url),
            page_size: number(PAGE_SIZE_VAR, defaults.page_size),
            key_hints_debounce: Duration::from_millis(number(
                KEY_HINTS_DEBOUNCE_VAR,
                defaults.key_hints_debounce.as_millis() as u64,
            )),
            request_timeout: Duration::from_millis(number(REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_MS)),
        }
    }
}
