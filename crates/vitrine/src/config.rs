use crate::catalog::Category;
use crate::events::AppEvent;
use async_channel::Sender;
use cardslide::{AutoplayOverride, SliderId, SliderOptions};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SliderConfig {
    pub id: SliderId,
    pub title: Option<String>,
    pub category: Category,
    #[serde(flatten)]
    pub options: SliderOptions,
    #[serde(default = "default_true")]
    pub controls: bool,
    #[serde(default = "default_true")]
    pub indicators: bool,
}

impl SliderConfig {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.category.as_str())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Product catalog (JSON). Relative paths resolve against the config dir.
    pub catalog: Option<PathBuf>,
    /// WhatsApp number receiving "Order" requests from product cards.
    pub order_phone: Option<String>,
    #[serde(default)]
    pub sliders: Vec<SliderConfig>,
    /// Applied to already running sliders, after start-up and on reload.
    #[serde(default)]
    pub autoplay: HashMap<SliderId, AutoplayOverride>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "vitrine", "vitrine").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("VITRINE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn default_config() -> Config {
    parse_config(DEFAULT_CONFIG).unwrap_or_default()
}

/// Loads the user config, writing the bundled defaults on first run.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        if let Err(e) = write_default_config() {
            log::error!("Failed to write default config: {}", e);
        }
        return default_config();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            default_config()
        }
    }
}

/// Absolute catalog path: configured path (relative to the config dir) or
/// the bundled catalog location.
pub fn catalog_path(config: &Config) -> Option<PathBuf> {
    let dir = get_config_dir().ok()?;
    Some(match &config.catalog {
        Some(p) if p.is_absolute() => p.clone(),
        Some(p) => dir.join(p),
        None => dir.join("catalog.json"),
    })
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
        let catalog = parent.join("catalog.json");
        if !catalog.exists() {
            fs_err::write(&catalog, DEFAULT_CATALOG)?;
        }
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
pub const DEFAULT_CATALOG: &str = include_str!("default_catalog.json");


/// Sends `ConfigReload` when the config file, or the catalog it points at,
/// changes. Catalogs outside the config directory are not watched.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config_dir(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch_config_dir(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = get_config_dir()?;
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watch error: {}", e);
                continue;
            }
        };

        let mut watched = vec![config_path.clone()];
        watched.extend(load_config().ok().as_ref().and_then(catalog_path));
        if !is_reload_trigger(&event, &watched) {
            continue;
        }

        log::debug!("{:?} on {:?}", event.kind, event.paths);
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn is_reload_trigger(event: &notify::Event, watched: &[PathBuf]) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| watched.contains(p))
}
