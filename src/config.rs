//! Application configuration loaded from TOML and overridden by CLI flags

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "symbology.toml";

/// Default CSV export path when exporting is enabled without a path
pub const DEFAULT_CSV_FILE: &str = "symbology_convert.csv";

/// Complete application configuration.
///
/// Every key is optional. Credentials are consumed by the login loop, which
/// clears them after each attempt.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub password: Option<String>,
    pub refresh_token: Option<String>,
    /// Skips the login loop entirely when set
    pub access_token: Option<String>,

    pub use_proxy_server: bool,
    pub proxy_server: Option<String>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,

    /// Overrides the authorization endpoint base URL
    pub auth_base_url: Option<String>,
    /// Overrides the symbology endpoint base URL
    pub symbology_base_url: Option<String>,

    pub verbose: bool,
    pub export_to_csv: bool,
    pub csv_file_path: Option<PathBuf>,

    pub use_json_request_file: bool,
    pub json_request_file: Option<PathBuf>,
    /// Comma-separated instrument identifiers
    pub universe: Option<String>,
    /// Newline-delimited identifiers; replaces `universe` when set
    pub universe_list_file_path: Option<PathBuf>,
    /// Comma-separated target fields
    pub to_fields: Option<String>,

    /// Use the GET variant of the convert call instead of POST
    pub use_http_get: bool,
}

// Hand-written so secrets never end up in debug output or logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .field("password", &self.password.as_ref().map(|_| "<hidden>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<hidden>"))
            .field("access_token", &self.access_token.as_ref().map(|_| "<hidden>"))
            .field("use_proxy_server", &self.use_proxy_server)
            .field("proxy_server", &self.proxy_server)
            .field("auth_base_url", &self.auth_base_url)
            .field("symbology_base_url", &self.symbology_base_url)
            .field("verbose", &self.verbose)
            .field("export_to_csv", &self.export_to_csv)
            .field("csv_file_path", &self.csv_file_path)
            .field("use_json_request_file", &self.use_json_request_file)
            .field("json_request_file", &self.json_request_file)
            .field("universe", &self.universe)
            .field("universe_list_file_path", &self.universe_list_file_path)
            .field("to_fields", &self.to_fields)
            .field("use_http_get", &self.use_http_get)
            .finish()
    }
}

/// Returns the value when it is present and not blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn has_username(&self) -> bool {
        non_empty(&self.username).is_some()
    }

    pub fn has_client_id(&self) -> bool {
        non_empty(&self.client_id).is_some()
    }

    pub fn has_password(&self) -> bool {
        non_empty(&self.password).is_some()
    }

    pub fn has_refresh_token(&self) -> bool {
        non_empty(&self.refresh_token).is_some()
    }

    /// Forget every login credential so the next attempt prompts again.
    pub fn clear_credentials(&mut self) {
        self.username = None;
        self.password = None;
        self.refresh_token = None;
        self.client_id = None;
    }

    /// Path the CSV export writes to.
    pub fn csv_path(&self) -> PathBuf {
        self.csv_file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE))
    }

    /// Apply command-line overrides on top of the file configuration.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(username) = &cli.username {
            self.username = Some(username.clone());
        }
        if let Some(client_id) = &cli.client_id {
            self.client_id = Some(client_id.clone());
        }
        if let Some(universe) = &cli.universe {
            self.universe = Some(universe.clone());
        }
        if let Some(to) = &cli.to {
            self.to_fields = Some(to.clone());
        }
        if let Some(path) = &cli.universe_file {
            self.universe_list_file_path = Some(path.clone());
        }
        if let Some(path) = &cli.json_request {
            self.use_json_request_file = true;
            self.json_request_file = Some(path.clone());
        }
        if let Some(path) = &cli.csv {
            self.export_to_csv = true;
            self.csv_file_path = Some(path.clone());
        }
        self.use_http_get |= cli.get;
        self.verbose |= cli.verbose;
        self
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Locate the config file: `symbology.toml` in the working directory, then
/// `<config dir>/symbology-convert/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("symbology-convert").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load the explicit config file if given, else the default one if it
/// exists, else built-in defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => match default_config_path() {
            Some(path) => {
                tracing::debug!("Using config file {}", path.display());
                load_config(&path)
            }
            None => Ok(AppConfig::default()),
        },
    }
}
