//! UI configuration supplied by the host environment.
//!
//! Values are read by name through a lookup function so the web build can
//! bake them in at compile time and the CLI can read them from the process
//! environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hash::DnaHash;

pub const ADMIN_URL_VAR: &str = "COMPOSITORY_ADMIN_URL";
pub const APP_URL_VAR: &str = "COMPOSITORY_APP_URL";
pub const APP_TIMEOUT_VAR: &str = "COMPOSITORY_APP_TIMEOUT_MS";
pub const DNA_HASH_VAR: &str = "COMPOSITORY_DNA_HASH";
pub const FILE_STORAGE_PROVIDER_VAR: &str = "FILE_STORAGE_PROVIDER";
pub const STATIC_DEMO_VAR: &str = "GH_PAGES";
pub const DOCKER_DESKTOP_URL_VAR: &str = "DOCKER_DESKTOP_URL";
pub const ASSETS_BASE_VAR: &str = "COMPOSITORY_ASSETS_BASE";

/// Every variable name [`UiConfig::from_lookup`] consults.
pub const ENV_VARS: &[&str] = &[
    ADMIN_URL_VAR,
    APP_URL_VAR,
    APP_TIMEOUT_VAR,
    DNA_HASH_VAR,
    FILE_STORAGE_PROVIDER_VAR,
    STATIC_DEMO_VAR,
    DOCKER_DESKTOP_URL_VAR,
    ASSETS_BASE_VAR,
];

/// Connection endpoints and feature flags for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    pub admin_url: String,
    pub app_url: String,
    /// The app interface can be slow to come up on a fresh conductor.
    pub app_connect_timeout_ms: u64,
    /// Serialized hash of the compository DNA this UI drives.
    pub compository_dna_hash: String,
    /// Announce this client as a file storage provider after connecting.
    pub file_storage_provider: bool,
    /// Statically hosted demo build: always show the instructions panel.
    pub static_demo: bool,
    pub docker_desktop_url: String,
    /// Base path of the downloadable helper scripts.
    pub assets_base: String,
}

impl UiConfig {
    pub const DEFAULT_ADMIN_URL: &'static str = "ws://localhost:22222";
    pub const DEFAULT_APP_URL: &'static str = "ws://localhost:22223";
    pub const DEFAULT_APP_TIMEOUT_MS: u64 = 300_000;
    pub const DEFAULT_DOCKER_DESKTOP_URL: &'static str =
        "https://www.docker.com/products/docker-desktop";
    pub const DEFAULT_ASSETS_BASE: &'static str = "assets";

    /// Config with default endpoints for the given compository DNA.
    pub fn new(compository_dna_hash: impl Into<String>) -> Self {
        Self {
            admin_url: Self::DEFAULT_ADMIN_URL.to_string(),
            app_url: Self::DEFAULT_APP_URL.to_string(),
            app_connect_timeout_ms: Self::DEFAULT_APP_TIMEOUT_MS,
            compository_dna_hash: compository_dna_hash.into(),
            file_storage_provider: false,
            static_demo: false,
            docker_desktop_url: Self::DEFAULT_DOCKER_DESKTOP_URL.to_string(),
            assets_base: Self::DEFAULT_ASSETS_BASE.to_string(),
        }
    }

    /// Build a config from named variables. Unset variables take defaults,
    /// except the DNA hash which is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dna_hash = lookup(DNA_HASH_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(DNA_HASH_VAR))?;
        dna_hash.parse::<DnaHash>()?;

        let mut config = Self::new(dna_hash);
        if let Some(url) = non_empty(lookup(ADMIN_URL_VAR)) {
            config.admin_url = url;
        }
        if let Some(url) = non_empty(lookup(APP_URL_VAR)) {
            config.app_url = url;
        }
        if let Some(value) = non_empty(lookup(APP_TIMEOUT_VAR)) {
            config.app_connect_timeout_ms =
                value.parse().map_err(|_| ConfigError::InvalidNumber {
                    name: APP_TIMEOUT_VAR,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(FILE_STORAGE_PROVIDER_VAR) {
            config.file_storage_provider = parse_flag(FILE_STORAGE_PROVIDER_VAR, &value)?;
        }
        if let Some(value) = lookup(STATIC_DEMO_VAR) {
            config.static_demo = parse_flag(STATIC_DEMO_VAR, &value)?;
        }
        if let Some(url) = non_empty(lookup(DOCKER_DESKTOP_URL_VAR)) {
            config.docker_desktop_url = url;
        }
        if let Some(base) = non_empty(lookup(ASSETS_BASE_VAR)) {
            config.assets_base = base;
        }
        Ok(config)
    }

    pub fn app_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.app_connect_timeout_ms)
    }

    /// URL of a downloadable helper script, e.g. `assets/compository-launch.bat`.
    pub fn asset_url(&self, file: &str) -> String {
        let base = self.assets_base.trim_end_matches('/');
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean feature flag. An empty value means "off".
pub fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
