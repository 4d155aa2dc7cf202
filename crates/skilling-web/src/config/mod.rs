//! App config loader (strict parsing) and the runtime settings layer.

pub mod schema;
pub mod store;

use std::fs;

use skilling_core::error::{Result, SkillingError};

pub use schema::{AppConfig, AuthSection, ServerSection};
pub use store::SettingsStore;

/// Config file used when `SKILLING_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "skilling.yaml";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SkillingError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| SkillingError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Settings layers for `cfg`: the file's `settings` tree, then env overrides.
pub fn settings_pairs<I>(cfg: &AppConfig, env: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut pairs = store::flatten_yaml(&cfg.settings)?;
    pairs.extend(store::env_pairs(env));
    Ok(pairs)
}
