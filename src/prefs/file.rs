//! File-backed preferences.
//!
//! Values live under the `preferences:` mapping of the YAML config file.
//! The file is re-read on every lookup, so edits take effect on the next
//! export without restarting.

use std::path::PathBuf;
use async_trait::async_trait;
use serde_yaml::Value;
use crate::prefs::{PrefError, PrefValue, PreferenceSource};

/// Top-level mapping key holding the preferences
pub const SECTION: &str = "preferences";

/// Preference source reading the `preferences:` section of a YAML file
#[derive(Debug, Clone)]
pub struct YamlPreferences {
    path: PathBuf,
}

impl YamlPreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn to_pref_value(value: &Value) -> Option<PrefValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(PrefValue::Bool(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(PrefValue::Int(i)),
            None => n.as_f64().map(PrefValue::Float),
        },
        Value::String(s) => Some(PrefValue::Str(s.clone())),
        Value::Tagged(tagged) => to_pref_value(&tagged.value),
        other => serde_yaml::to_string(other)
            .ok()
            .map(|s| PrefValue::Str(s.trim().to_string())),
    }
}

#[async_trait]
impl PreferenceSource for YamlPreferences {
    async fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PrefError::Io(e)),
        };

        let root: Value =
            serde_yaml::from_str(&contents).map_err(|e| PrefError::Parse(e.to_string()))?;

        Ok(root
            .get(SECTION)
            .and_then(|section| section.get(key))
            .and_then(to_pref_value))
    }
}
