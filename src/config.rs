//! Configuration: built-in defaults, overridden by an optional TOML file,
//! overridden by command-line flags / environment variables.

use crate::constants::{
    API_BASE_URL, APP_DIR_NAME, AUTH_BASE_URL, CONFIG_FILE, DATABASE_FILE, DEFAULT_MAX_RETRIES,
    OAUTH_REDIRECT_URI, PLAYLIST_PUBLIC_DEFAULT, REQUEST_TIMEOUT_SECS,
};
use crate::mood::MissingDimension;
use crate::utils::errors::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Client id baked in at build time from `.env`, if any
const BUILTIN_CLIENT_ID: Option<&str> = option_env!("SPOTIFY_CLIENT_ID");

/// Shape of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub api_base_url: Option<String>,
    pub auth_base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub playlist_public: Option<bool>,
    pub strict_features: Option<bool>,
}

impl FileConfig {
    /// `<config dir>/themesify/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    pub fn parse(contents: &str) -> Result<Self, AppError> {
        toml::from_str(contents).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load the file at `path`; a missing file is not an error
    pub fn load(path: &Path) -> Result<Option<Self>, AppError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                log::info!("[Config] Loading {}", path.display());
                Self::parse(&contents).map(Some)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Values coming from command-line flags and their environment variables
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub api_base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub max_retries: Option<u32>,
    pub strict_features: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub client_id: Option<String>,
    pub redirect_uri: String,
    pub api_base_url: String,
    pub auth_base_url: String,
    pub data_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub playlist_public: bool,
    pub strict_features: bool,
}

impl AppConfig {
    /// Resolve: CLI/env beats the TOML file, which beats built-in defaults.
    pub fn resolve(cli: &CliConfig, file: Option<FileConfig>) -> Self {
        let file = file.unwrap_or_default();

        let data_dir = cli
            .data_dir
            .clone()
            .or(file.data_dir)
            .unwrap_or_else(default_data_dir);

        Self {
            client_id: cli
                .client_id
                .clone()
                .or(file.client_id)
                .or_else(|| BUILTIN_CLIENT_ID.map(str::to_string))
                .filter(|id| !id.trim().is_empty()),
            redirect_uri: cli
                .redirect_uri
                .clone()
                .or(file.redirect_uri)
                .unwrap_or_else(|| OAUTH_REDIRECT_URI.to_string()),
            api_base_url: cli
                .api_base_url
                .clone()
                .or(file.api_base_url)
                .unwrap_or_else(|| API_BASE_URL.to_string()),
            auth_base_url: file
                .auth_base_url
                .unwrap_or_else(|| AUTH_BASE_URL.to_string()),
            data_dir,
            request_timeout_secs: file.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS),
            max_retries: cli
                .max_retries
                .or(file.max_retries)
                .unwrap_or(DEFAULT_MAX_RETRIES),
            playlist_public: file.playlist_public.unwrap_or(PLAYLIST_PUBLIC_DEFAULT),
            strict_features: cli.strict_features || file.strict_features.unwrap_or(false),
        }
    }

    pub fn require_client_id(&self) -> Result<&str, AppError> {
        self.client_id.as_deref().ok_or_else(|| {
            AppError::Config(
                "no Spotify client id; set THEMESIFY_CLIENT_ID or client_id in config.toml"
                    .to_string(),
            )
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn missing_dimension(&self) -> MissingDimension {
        if self.strict_features {
            MissingDimension::Rejected
        } else {
            MissingDimension::Satisfied
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
