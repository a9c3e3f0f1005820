use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use predlb_cache::config::CacheConfig;
use predlb_features::config::DataConfig;
use predlb_predictor::config::PredictorConfig;

/// Current config version. Bump this when changing the file's shape; each
/// bump requires a corresponding step in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const CONFIG_ENV: &str = "PREDLB_CONFIG";
pub const BIND_ENV: &str = "PREDLB_BIND";
pub const STORAGE_DIR_ENV: &str = "PREDLB_STORAGE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Record storage root. Records are kept in memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Separate data configuration file. Takes precedence over `data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    #[serde(default)]
    pub data: DataConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind_address: default_bind_address(),
            storage_dir: None,
            predictor: PredictorConfig::default(),
            cache: CacheConfig::default(),
            data_path: None,
            data: DataConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the file named by `PREDLB_CONFIG` (defaults otherwise) and apply
    /// environment overrides.
    pub fn from_env() -> eyre::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => load_config(Path::new(&path))?,
            Err(_) => {
                tracing::info!("{CONFIG_ENV} not set, using default configuration");
                AppConfig::default()
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.bind_address = bind;
        }
        if let Some(dir) = lookup(STORAGE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.storage_dir = Some(PathBuf::from(dir));
        }
    }
}

pub fn load_config(path: &Path) -> eyre::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let mut config: AppConfig = serde_json::from_value(migrated)?;

    if let Some(data_path) = &config.data_path {
        let data_path = if data_path.is_relative() {
            path.parent().unwrap_or(Path::new(".")).join(data_path)
        } else {
            data_path.clone()
        };
        config.data = DataConfig::load(&data_path)?;
    } else {
        config.data.validate()?;
    }

    tracing::info!(path = %path.display(), version = on_disk_version, "config loaded");
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: Value, from_version: u32) -> eyre::Result<Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: `predictor_configuration` renamed to `predictor`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(predictor) = obj.remove("predictor_configuration") {
            obj.entry("predictor").or_insert(predictor);
        }
        obj.insert("config_version".to_string(), json!(1));
        tracing::info!("migrated config v0 → v1 (renamed predictor_configuration)");
    }

    // v1 → v2: top-level `cache_ttl` moved to `cache.ttl_secs`
    if from_version < 2 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(ttl) = obj.remove("cache_ttl") {
            let cache = obj.entry("cache").or_insert_with(|| json!({}));
            if let Some(cache) = cache.as_object_mut() {
                cache.entry("ttl_secs").or_insert(ttl);
            }
        }
        obj.insert("config_version".to_string(), json!(2));
        tracing::info!("migrated config v1 → v2 (moved cache_ttl)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &AppConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
