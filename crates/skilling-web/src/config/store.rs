//! Flattened, reloadable settings store.
//!
//! Nested YAML and environment variables are flattened into `:`-separated keys
//! (`Section:Child`, `List:0`). Keys are stored ASCII-lowercased so lookups are
//! case-insensitive. Reads never block on a global lock.

use std::collections::HashMap;

use dashmap::DashMap;
use serde_yaml::Value;

use skilling_core::error::{Result, SkillingError};
use skilling_core::settings::{collect_list, SettingsSource, KEY_DELIMITER};

/// Environment variables with this prefix override file settings.
pub const ENV_PREFIX: &str = "SKILLING__";

/// Separator used in environment variable names in place of `:`.
const ENV_DELIMITER: &str = "__";

#[derive(Debug, Default)]
pub struct SettingsStore {
    values: DashMap<String, String>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let store = Self::new();
        for (k, v) in pairs {
            store.set(&k, v);
        }
        store
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize(key), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.remove(&normalize(key)).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the whole contents with `pairs`.
    ///
    /// Keys absent from `pairs` are dropped first, then the rest are upserted;
    /// a concurrent reader may see a mix of old and new keys for the duration.
    pub fn reload<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let next: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (normalize(&k), v))
            .collect();
        self.values.retain(|k, _| next.contains_key(k));
        for (k, v) in next {
            self.values.insert(k, v);
        }
    }
}

impl SettingsSource for SettingsStore {
    fn value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(&normalize(key)).map(|v| v.value().clone()))
    }

    fn list(&self, key: &str) -> Result<Vec<String>> {
        let snapshot: Vec<(String, String)> = self
            .values
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        Ok(collect_list(
            key,
            snapshot.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

/// Flatten a YAML settings tree into `(key, value)` pairs.
/// Sequences become indexed children; nulls are skipped.
pub fn flatten_yaml(root: &Value) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    flatten_into("", root, &mut out)?;
    Ok(out)
}

fn flatten_into(prefix: &str, v: &Value, out: &mut Vec<(String, String)>) -> Result<()> {
    match v {
        Value::Null => {}
        Value::Bool(b) => push_scalar(prefix, b.to_string(), out)?,
        Value::Number(n) => push_scalar(prefix, n.to_string(), out)?,
        Value::String(s) => push_scalar(prefix, s.clone(), out)?,
        Value::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                flatten_into(&join(prefix, &i.to_string()), item, out)?;
            }
        }
        Value::Mapping(map) => {
            for (k, item) in map {
                let segment = match k {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(SkillingError::Config(format!(
                            "settings key under '{prefix}' must be a scalar"
                        )))
                    }
                };
                flatten_into(&join(prefix, &segment), item, out)?;
            }
        }
        Value::Tagged(t) => flatten_into(prefix, &t.value, out)?,
    }
    Ok(())
}

fn push_scalar(prefix: &str, value: String, out: &mut Vec<(String, String)>) -> Result<()> {
    if prefix.is_empty() {
        return Err(SkillingError::Config("settings root must be a mapping".into()));
    }
    out.push((prefix.to_string(), value));
    Ok(())
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}{KEY_DELIMITER}{segment}")
    }
}

/// Settings pairs from environment variables carrying `ENV_PREFIX`.
/// `SKILLING__Section__Key` becomes `Section:Key`.
pub fn env_pairs<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(k, v)| {
            let rest = k.strip_prefix(ENV_PREFIX)?;
            if rest.is_empty() {
                return None;
            }
            Some((rest.replace(ENV_DELIMITER, &KEY_DELIMITER.to_string()), v))
        })
        .collect()
}
