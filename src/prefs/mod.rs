//! User preferences.
//!
//! Preference stores differ in calling convention (plain lookups, callbacks,
//! files re-read on demand) and in value types. [`PreferenceSource`] hides the
//! convention; [`Preferences`] turns whatever comes back into typed values,
//! falling back to defaults instead of failing.

pub mod file;

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::oneshot;

pub use file::YamlPreferences;

/// Preference keys read on every export
pub mod keys {
    pub const COPY_TO_CLIPBOARD: &str = "copyToClipboard";
    pub const USE_CUSTOM_DIR: &str = "useCustomDir";
    pub const CUSTOM_DIR: &str = "customDir";
}

/// Error type for preference lookups
#[derive(Debug, thiserror::Error)]
pub enum PrefError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed preferences: {0}")]
    Parse(String),
}

/// A raw preference value as stored
#[derive(Debug, Clone, PartialEq)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PrefValue {
    /// Interpret as a boolean; `None` means "not recognizably boolean"
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::Int(n) => Some(*n != 0),
            PrefValue::Float(f) => Some(*f != 0.0),
            PrefValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for PrefValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Int(n) => write!(f, "{}", n),
            PrefValue::Float(x) => write!(f, "{}", x),
            PrefValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        PrefValue::Bool(b)
    }
}

impl From<i64> for PrefValue {
    fn from(n: i64) -> Self {
        PrefValue::Int(n)
    }
}

impl From<f64> for PrefValue {
    fn from(x: f64) -> Self {
        PrefValue::Float(x)
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        PrefValue::Str(s.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(s: String) -> Self {
        PrefValue::Str(s)
    }
}

/// A read-only key/value preference store
#[async_trait]
pub trait PreferenceSource: Send + Sync {
    /// Look up `key`; `Ok(None)` when it is unset or null
    async fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError>;
}

/// Preferences held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticPreferences {
    values: HashMap<String, PrefValue>,
}

impl StaticPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<PrefValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
impl PreferenceSource for StaticPreferences {
    async fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        Ok(self.values.get(key).cloned())
    }
}

/// Callback handed to a callback-style store; call it once with the value
pub type Reply = Box<dyn FnOnce(Option<PrefValue>) + Send>;

/// Adapter for stores that answer through a callback instead of returning.
///
/// The store may reply immediately, later from another task, or never;
/// a reply that is dropped without being called reads as unset.
pub struct CallbackPreferences<F> {
    lookup: F,
}

impl<F> CallbackPreferences<F>
where
    F: Fn(&str, Reply) + Send + Sync,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl<F> PreferenceSource for CallbackPreferences<F>
where
    F: Fn(&str, Reply) + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<Option<PrefValue>, PrefError> {
        let (tx, rx) = oneshot::channel();
        let reply: Reply = Box::new(move |value| {
            let _ = tx.send(value);
        });
        (self.lookup)(key, reply);
        Ok(rx.await.unwrap_or(None))
    }
}

/// Typed values read at the start of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    pub copy_to_clipboard: bool,
    pub use_custom_dir: bool,
    pub custom_dir: String,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            copy_to_clipboard: true,
            use_custom_dir: false,
            custom_dir: String::new(),
        }
    }
}

impl PreferenceSnapshot {
    /// The custom directory template, if enabled and not blank
    pub fn custom_dir_template(&self) -> Option<&str> {
        let template = self.custom_dir.trim();
        (self.use_custom_dir && !template.is_empty()).then_some(template)
    }
}

/// Typed, never-failing access to a [`PreferenceSource`]
#[derive(Clone)]
pub struct Preferences {
    source: Arc<dyn PreferenceSource>,
}

impl Preferences {
    pub fn new(source: Arc<dyn PreferenceSource>) -> Self {
        Self { source }
    }

    async fn lookup(&self, key: &str) -> Option<PrefValue> {
        match self.source.get(key).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Preference '{}' unavailable, using default: {}", key, e);
                None
            }
        }
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> bool {
        self.lookup(key)
            .await
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    pub async fn get_string(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .await
            .map(|v| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// Read all export preferences fresh from the source
    pub async fn snapshot(&self) -> PreferenceSnapshot {
        let defaults = PreferenceSnapshot::default();
        PreferenceSnapshot {
            copy_to_clipboard: self.get_bool(keys::COPY_TO_CLIPBOARD, defaults.copy_to_clipboard).await,
            use_custom_dir: self.get_bool(keys::USE_CUSTOM_DIR, defaults.use_custom_dir).await,
            custom_dir: self.get_string(keys::CUSTOM_DIR, &defaults.custom_dir).await,
        }
    }
}
