use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/predict";
pub const SETTINGS_FILE_NAME: &str = "sentiment.toml";
const APP_CONFIG_DIR: &str = "sentiment_analyzer";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url"),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid endpoint '{value}': {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
    #[error("endpoint '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to parse settings file '{}': {source}", .path.display())]
    InvalidFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `sentiment.toml` (working directory first, then the user
/// config directory), then environment overrides.
pub fn load_settings() -> Result<ClientSettings, SettingsError> {
    let file = settings_file_candidates()
        .into_iter()
        .find_map(|path| fs::read_to_string(&path).ok().map(|raw| (path, raw)));

    let file_settings = match file {
        Some((path, raw)) => {
            debug!(path = %path.display(), "loading client settings file");
            parse_file_settings(&path, &raw)?
        }
        None => FileSettings::default(),
    };

    resolve_settings(file_settings, |key| std::env::var(key).ok())
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(APP_CONFIG_DIR).join(SETTINGS_FILE_NAME));
    }
    candidates
}

fn parse_file_settings(path: &Path, raw: &str) -> Result<FileSettings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_settings(
    file: FileSettings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    let mut endpoint = file.endpoint;
    if let Some(v) = env("SENTIMENT_ENDPOINT") {
        endpoint = Some(v);
    }
    if let Some(v) = env("APP__ENDPOINT") {
        endpoint = Some(v);
    }
    if let Some(raw) = endpoint {
        settings.endpoint = parse_endpoint(&raw)?;
    }

    let mut timeout_secs = file.request_timeout_secs;
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => timeout_secs = Some(parsed),
            Err(err) => warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS: {err}"),
        }
    }
    settings.request_timeout = timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs);

    Ok(settings)
}

pub fn parse_endpoint(raw: &str) -> Result<Url, SettingsError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|source| SettingsError::InvalidEndpoint {
        value: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(SettingsError::UnsupportedScheme(raw.to_string())),
    }
}
