//! Configuration.
//!
//! Two layers live here:
//!
//! - the **file config**: a TOML document mapping monitors to views,
//!   with an optional refresh interval and free-form settings table
//!   per assignment,
//! - the **view schema**: each view declares the settings it accepts
//!   (`ConfigSchema`); raw settings tables are resolved against the
//!   schema into a typed `ViewConfig` before a view host is built.
//!
//! ```toml
//! poll_budget_ms = 30
//!
//! [monitors.lobby]
//! view = "items"
//! refresh_ms = 2000
//!
//! [monitors.lobby.settings]
//! sort = "name"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("view '{view}' has no setting '{key}'")]
    UnknownKey { view: String, key: String },

    #[error("setting '{key}' of view '{view}' expects {expected}")]
    TypeMismatch {
        view: String,
        key: String,
        expected: &'static str,
    },

    #[error("setting '{key}' of view '{view}' must be in {min}..={max}, got {got}")]
    OutOfRange {
        view: String,
        key: String,
        min: i64,
        max: i64,
        got: i64,
    },

    #[error("setting '{key}' of view '{view}' must be one of {options:?}")]
    BadChoice {
        view: String,
        key: String,
        options: Vec<&'static str>,
    },
}

// =============================================================================
// File config
// =============================================================================

/// Default per-tick peripheral poll budget in milliseconds.
pub const DEFAULT_POLL_BUDGET_MS: u64 = 30;

/// Root of the config file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Per-tick peripheral poll budget in milliseconds.
    #[serde(default = "default_poll_budget")]
    pub poll_budget_ms: u64,

    /// Monitor id → assignment.
    #[serde(default)]
    pub monitors: BTreeMap<String, Assignment>,
}

fn default_poll_budget() -> u64 {
    DEFAULT_POLL_BUDGET_MS
}

/// One monitor's assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct Assignment {
    /// View name as registered with the manager.
    pub view: String,

    /// Refresh interval override in milliseconds.
    pub refresh_ms: Option<u64>,

    /// Raw settings, resolved against the view's schema.
    #[serde(default)]
    pub settings: toml::value::Table,
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_str(&fs::read_to_string(path)?)
    }

    pub fn assignment(&self, monitor_id: &str) -> Option<&Assignment> {
        self.monitors.get(monitor_id)
    }
}

// =============================================================================
// Setting values
// =============================================================================

/// A resolved setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// The type (and constraints) of one schema key.
#[derive(Debug, Clone)]
pub enum SettingKind {
    Bool,
    Int { min: i64, max: i64 },
    Text,
    Choice(&'static [&'static str]),
}

// =============================================================================
// Schema
// =============================================================================

/// One declared setting.
#[derive(Debug, Clone)]
pub struct SchemaKey {
    pub name: &'static str,
    pub kind: SettingKind,
    pub default: SettingValue,
}

/// The settings a view accepts, with defaults.
///
/// Built with the chained constructors:
///
/// ```
/// use gridwatch::config::ConfigSchema;
///
/// let schema = ConfigSchema::new()
///     .int("columns", 2, 1, 8)
///     .choice("sort", "count", &["count", "name"]);
/// assert_eq!(schema.keys().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigSchema {
    keys: Vec<SchemaKey>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bool(mut self, name: &'static str, default: bool) -> Self {
        self.keys.push(SchemaKey {
            name,
            kind: SettingKind::Bool,
            default: SettingValue::Bool(default),
        });
        self
    }

    pub fn int(mut self, name: &'static str, default: i64, min: i64, max: i64) -> Self {
        self.keys.push(SchemaKey {
            name,
            kind: SettingKind::Int { min, max },
            default: SettingValue::Int(default),
        });
        self
    }

    pub fn text(mut self, name: &'static str, default: &str) -> Self {
        self.keys.push(SchemaKey {
            name,
            kind: SettingKind::Text,
            default: SettingValue::Text(default.to_string()),
        });
        self
    }

    pub fn choice(
        mut self,
        name: &'static str,
        default: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        self.keys.push(SchemaKey {
            name,
            kind: SettingKind::Choice(options),
            default: SettingValue::Text(default.to_string()),
        });
        self
    }

    pub fn keys(&self) -> &[SchemaKey] {
        &self.keys
    }

    /// Whether two keys share a name (descriptor validation).
    pub fn has_duplicate_keys(&self) -> Option<&'static str> {
        for (i, a) in self.keys.iter().enumerate() {
            if self.keys[i + 1..].iter().any(|b| b.name == a.name) {
                return Some(a.name);
            }
        }
        None
    }

    /// Resolve a raw settings table into a typed `ViewConfig`.
    ///
    /// Missing keys take their defaults; unknown keys and type
    /// mismatches are errors - a misspelled setting should fail loudly
    /// at assignment time, not silently fall back.
    pub fn resolve(
        &self,
        view: &str,
        raw: &toml::value::Table,
    ) -> Result<ViewConfig, ConfigError> {
        for key in raw.keys() {
            if !self.keys.iter().any(|k| k.name == key.as_str()) {
                return Err(ConfigError::UnknownKey {
                    view: view.to_string(),
                    key: key.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for key in &self.keys {
            let value = match raw.get(key.name) {
                None => key.default.clone(),
                Some(raw_value) => coerce(view, key, raw_value)?,
            };
            values.insert(key.name.to_string(), value);
        }

        Ok(ViewConfig { values })
    }
}

fn coerce(
    view: &str,
    key: &SchemaKey,
    raw: &toml::Value,
) -> Result<SettingValue, ConfigError> {
    match (&key.kind, raw) {
        (SettingKind::Bool, toml::Value::Boolean(b)) => Ok(SettingValue::Bool(*b)),
        (SettingKind::Int { min, max }, toml::Value::Integer(i)) => {
            if i < min || i > max {
                Err(ConfigError::OutOfRange {
                    view: view.to_string(),
                    key: key.name.to_string(),
                    min: *min,
                    max: *max,
                    got: *i,
                })
            } else {
                Ok(SettingValue::Int(*i))
            }
        }
        (SettingKind::Text, toml::Value::String(s)) => Ok(SettingValue::Text(s.clone())),
        (SettingKind::Choice(options), toml::Value::String(s)) => {
            if options.contains(&s.as_str()) {
                Ok(SettingValue::Text(s.clone()))
            } else {
                Err(ConfigError::BadChoice {
                    view: view.to_string(),
                    key: key.name.to_string(),
                    options: options.to_vec(),
                })
            }
        }
        (kind, _) => Err(ConfigError::TypeMismatch {
            view: view.to_string(),
            key: key.name.to_string(),
            expected: match kind {
                SettingKind::Bool => "a boolean",
                SettingKind::Int { .. } => "an integer",
                SettingKind::Text => "a string",
                SettingKind::Choice(_) => "one of the listed options",
            },
        }),
    }
}

// =============================================================================
// Resolved view config
// =============================================================================

/// Typed settings for one view instance, fully resolved.
#[derive(Debug, Clone, Default)]
pub struct ViewConfig {
    values: BTreeMap<String, SettingValue>,
}

impl ViewConfig {
    /// An empty config, for views with no schema.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get_bool(&self, name: &str, fallback: bool) -> bool {
        match self.values.get(name) {
            Some(SettingValue::Bool(b)) => *b,
            _ => fallback,
        }
    }

    pub fn get_int(&self, name: &str, fallback: i64) -> i64 {
        match self.values.get(name) {
            Some(SettingValue::Int(i)) => *i,
            _ => fallback,
        }
    }

    pub fn get_text<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        match self.values.get(name) {
            Some(SettingValue::Text(s)) => s.as_str(),
            _ => fallback,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
