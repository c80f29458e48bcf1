//! Application-level configuration loading: palette, leaderboard size, storage and
//! playback pacing.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{
    game::DEFAULT_LEAD_IN_MS,
    leaderboard::DEFAULT_CAPACITY,
    sequence::{Color, Palette},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COLOR_MEMORY_CONFIG_PATH";
const DEFAULT_NAMESPACE: &str = "color-memory";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOCALES_DIR: &str = "locales";
const DEFAULT_SHARE_URL: &str = "http://localhost:8080/";

/// Where scores and the leaderboard are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// One JSON document per key inside `dir`.
    File { dir: PathBuf },
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    palette: Palette,
    leaderboard_capacity: usize,
    namespace: String,
    storage: StorageConfig,
    lead_in_ms: u32,
    server_paced_playback: bool,
    language: Option<String>,
    locales_dir: PathBuf,
    share_url: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        palette = app_config.palette.len(),
                        capacity = app_config.leaderboard_capacity,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of entries the leaderboard retains.
    pub fn leaderboard_capacity(&self) -> usize {
        self.leaderboard_capacity
    }

    /// Prefix of every storage key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Delay before the first flash of each round.
    pub fn lead_in_ms(&self) -> u32 {
        self.lead_in_ms
    }

    /// Whether the server drives the flashes and closes the presentation itself.
    pub fn server_paced_playback(&self) -> bool {
        self.server_paced_playback
    }

    /// Explicitly configured UI language, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn locales_dir(&self) -> &PathBuf {
        &self.locales_dir
    }

    /// Link included in share payloads.
    pub fn share_url(&self) -> &str {
        &self.share_url
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_leaderboard_capacity(mut self, capacity: usize) -> Self {
        self.leaderboard_capacity = capacity.max(1);
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_lead_in_ms(mut self, lead_in_ms: u32) -> Self {
        self.lead_in_ms = lead_in_ms;
        self
    }

    pub fn with_server_paced_playback(mut self, enabled: bool) -> Self {
        self.server_paced_playback = enabled;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            leaderboard_capacity: DEFAULT_CAPACITY,
            namespace: DEFAULT_NAMESPACE.into(),
            storage: StorageConfig::File {
                dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            lead_in_ms: DEFAULT_LEAD_IN_MS,
            server_paced_playback: true,
            language: None,
            locales_dir: PathBuf::from(DEFAULT_LOCALES_DIR),
            share_url: DEFAULT_SHARE_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    palette: Option<Vec<String>>,
    leaderboard_capacity: Option<usize>,
    namespace: Option<String>,
    storage: Option<RawStorage>,
    lead_in_ms: Option<u32>,
    server_paced_playback: Option<bool>,
    language: Option<String>,
    locales_dir: Option<PathBuf>,
    share_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
/// JSON representation of the `storage` section.
enum RawStorage {
    File { dir: Option<PathBuf> },
    Memory,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();

        let palette = value
            .palette
            .map(parse_palette)
            .unwrap_or_else(|| defaults.palette.clone());

        let storage = match value.storage {
            Some(RawStorage::File { dir }) => StorageConfig::File {
                dir: dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            },
            Some(RawStorage::Memory) => StorageConfig::Memory,
            None => defaults.storage.clone(),
        };

        Self {
            palette,
            leaderboard_capacity: value
                .leaderboard_capacity
                .unwrap_or(defaults.leaderboard_capacity)
                .max(1),
            namespace: value
                .namespace
                .filter(|namespace| !namespace.trim().is_empty())
                .unwrap_or(defaults.namespace),
            storage,
            lead_in_ms: value.lead_in_ms.unwrap_or(defaults.lead_in_ms),
            server_paced_playback: value
                .server_paced_playback
                .unwrap_or(defaults.server_paced_playback),
            language: value.language.or(defaults.language),
            locales_dir: value.locales_dir.unwrap_or(defaults.locales_dir),
            share_url: value.share_url.unwrap_or(defaults.share_url),
        }
    }
}

/// Parse configured color names, keeping the default palette when they are unusable.
fn parse_palette(names: Vec<String>) -> Palette {
    let colors: Result<Vec<Color>, _> = names.iter().map(|name| name.parse()).collect();
    match colors.map(Palette::new) {
        Ok(Ok(palette)) => palette,
        Ok(Err(err)) => {
            warn!(error = %err, "invalid palette in config; using all colors");
            Palette::default()
        }
        Err(err) => {
            warn!(error = %err, "invalid palette in config; using all colors");
            Palette::default()
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
