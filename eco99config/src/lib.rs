//! # eco99 Configuration Module
//!
//! This crate loads the configuration of the eco99 plugin:
//! - Embedded default configuration (`eco99.yaml`)
//! - Optional `config.yaml` overlay found in the configuration directory
//! - Environment variable overrides (`ECO99_CONFIG__SECTION__KEY=value`)
//! - Path based access to configuration values
//!
//! The plugin runs once per host navigation action, so the configuration is
//! read-only: nothing is ever written back to disk and there is no global
//! instance. Callers load a [`Config`] and pass it where it is needed.
//!
//! ## Usage
//!
//! ```no_run
//! use eco99config::Config;
//!
//! let config = Config::load(None)?;
//! let url = config.get_value(&["feed", "channels_url"])?;
//! println!("channel index: {:?}", url);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use dirs::home_dir;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("eco99.yaml");

/// Environment variable naming the configuration directory
pub const ENV_CONFIG_DIR: &str = "ECO99_CONFIG";

/// Prefix of environment variables overriding single configuration values
pub const ENV_PREFIX: &str = "ECO99_CONFIG__";

/// Name of the optional configuration file inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

const DEFAULT_DIR_NAME: &str = ".eco99";

/// Read-only configuration of the plugin
///
/// Values are stored as a YAML tree whose keys are all lower-cased, so
/// lookups through [`Config::get_value`] are case-insensitive.
#[derive(Debug, Clone)]
pub struct Config {
    config_dir: PathBuf,
    data: Value,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    ///
    /// 1. The provided directory
    /// 2. The `ECO99_CONFIG` environment variable
    /// 3. `.eco99` in the current directory
    /// 4. `.eco99` in the user's home directory
    ///
    /// Falls back to `.eco99` even when it does not exist; a missing
    /// directory simply means the embedded defaults are used.
    pub fn find_config_dir(directory: Option<&Path>) -> PathBuf {
        if let Some(dir) = directory {
            return dir.to_path_buf();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Using config directory from env");
            return PathBuf::from(env_path);
        }

        let local = Path::new(DEFAULT_DIR_NAME);
        if local.exists() {
            return local.to_path_buf();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(DEFAULT_DIR_NAME);
            if home_config.exists() {
                return home_config;
            }
        }

        local.to_path_buf()
    }

    /// Loads the configuration, searching for the directory as described in
    /// [`Config::find_config_dir`], and applies environment overrides.
    pub fn load(directory: Option<&Path>) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        Self::load_from_dir(&config_dir)
    }

    /// Loads the configuration from a given directory
    ///
    /// This method:
    /// 1. Loads the default embedded configuration
    /// 2. Merges it with `<dir>/config.yaml` if present
    /// 3. Applies environment variable overrides
    pub fn load_from_dir(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        let external = match fs::read_to_string(&config_file) {
            Ok(text) => {
                info!(config_file = %config_file.display(), "Loaded config file");
                Some(text)
            }
            Err(_) => {
                debug!(
                    config_file = %config_file.display(),
                    "Config file not found, using default embedded config"
                );
                None
            }
        };

        let mut config = match external {
            Some(text) => Self::from_yaml_str(&text)
                .with_context(|| format!("Invalid configuration in {}", config_file.display()))?,
            None => Self::defaults()?,
        };
        config.config_dir = config_dir.to_path_buf();
        config.apply_overrides(env::vars());

        Ok(config)
    }

    /// Returns the embedded default configuration
    pub fn defaults() -> Result<Self> {
        let data: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        Ok(Self {
            config_dir: PathBuf::from(DEFAULT_DIR_NAME),
            data: lower_keys_value(data),
        })
    }

    /// Builds a configuration from a YAML document merged over the defaults
    ///
    /// No environment override is applied.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config = Self::defaults()?;
        let external: Value = serde_yaml::from_str(yaml)?;
        merge_yaml(&mut config.data, &lower_keys_value(external));
        Ok(config)
    }

    /// Applies `ECO99_CONFIG__A__B=value` style overrides
    ///
    /// Values are parsed as YAML scalars, so `30` becomes a number and `true`
    /// a boolean. Variables without the prefix are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key_path = stripped.split("__").collect::<Vec<_>>();
            let yaml_value = convert_env_value(value.as_ref());
            match set_value_internal(&mut self.data, &key_path, yaml_value) {
                Ok(()) => debug!(variable = key, "Applied config override"),
                Err(err) => tracing::warn!(variable = key, "Ignoring config override: {}", err),
            }
        }
    }

    /// Directory the configuration was loaded from
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["feed", "timeout_secs"]`)
    ///
    /// # Returns
    ///
    /// Returns the YAML value or an error if the path doesn't exist
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let mut current = &self.data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a mapping", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    /// Gets a string value, with a default when missing or not a string
    pub fn get_string_or(&self, path: &[&str], default: &str) -> String {
        match self.get_value(path) {
            Ok(Value::String(s)) => s,
            Ok(Value::Number(n)) => n.to_string(),
            _ => default.to_string(),
        }
    }

    /// Gets an unsigned value, with a default when missing or invalid
    pub fn get_u64_or(&self, path: &[&str], default: u64) -> u64 {
        match self.get_value(path) {
            Ok(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Ok(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid number '{}' at {}, using {}", s, path.join("."), default);
                default
            }),
            _ => default,
        }
    }
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    if path.is_empty() {
        *data = value;
        return Ok(());
    }
    if let Value::Mapping(map) = data {
        let key_value = Value::String(path[0].to_lowercase());
        if path.len() == 1 {
            map.insert(key_value, value);
        } else {
            let entry = map
                .entry(key_value)
                .or_insert(Value::Mapping(Mapping::new()));
            set_value_internal(entry, &path[1..], value)?;
        }
        Ok(())
    } else {
        Err(anyhow!("Current node is not a map"))
    }
}

fn convert_env_value(value: &str) -> Value {
    match serde_yaml::from_str::<Value>(value) {
        // Mappings and sequences from the environment are kept as plain text
        Ok(parsed @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => parsed,
        _ => Value::String(value.to_string()),
    }
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut new_map = Mapping::new();
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => Value::String(s.to_lowercase()),
                    other => other,
                };
                new_map.insert(key, lower_keys_value(v));
            }
            Value::Mapping(new_map)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from `external` are merged recursively into `default`
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
