//! Top-level iopredict configuration with 3-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ModelConfig, ModelSettings, OutputConfig};
use crate::constants::{self, env};
use crate::errors::ConfigError;
use crate::types::Granularity;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`IOPREDICT_*`)
/// 2. Config file (TOML), when a path is given
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PredictConfig {
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl PredictConfig {
    /// Load configuration with 3-layer resolution.
    ///
    /// A missing file at an explicitly given `path` is an error; invalid
    /// environment values are ignored with a warning so a typo in a job
    /// script never prevents the traced application from starting.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &PredictConfig) -> Result<(), ConfigError> {
        if let Some(size) = config.model.context_size {
            if !(constants::MIN_CONTEXT_SIZE..=constants::MAX_CONTEXT_SIZE).contains(&size) {
                return Err(ConfigError::ValidationFailed {
                    field: "model.context_size".to_string(),
                    message: format!(
                        "must be between {} and {}",
                        constants::MIN_CONTEXT_SIZE,
                        constants::MAX_CONTEXT_SIZE
                    ),
                });
            }
        }
        if config.model.call_stack_depth == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "model.call_stack_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Resolved parameters for `PredictionModel::init`.
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings::from(&self.model)
    }

    /// Apply environment variable overrides.
    /// Pattern: `IOPREDICT_CONTEXT_SIZE`, `IOPREDICT_GRANULARITY`, etc.
    fn apply_env_overrides(config: &mut PredictConfig) {
        if let Ok(val) = std::env::var(env::CONTEXT_SIZE) {
            match parse_positive(&val) {
                Some(v) => {
                    let clamped = v.min(u64::from(constants::MAX_CONTEXT_SIZE)) as u32;
                    if u64::from(clamped) != v {
                        tracing::warn!(
                            requested = v,
                            applied = clamped,
                            "context size clamped to maximum"
                        );
                    }
                    config.model.context_size = Some(clamped);
                }
                None => tracing::warn!(
                    value = %val,
                    default = config.model.effective_context_size(),
                    "ignoring non-positive or invalid {}", env::CONTEXT_SIZE
                ),
            }
        }
        if let Ok(val) = std::env::var(env::CALL_STACK_DEPTH) {
            match parse_positive(&val) {
                Some(v) => config.model.call_stack_depth = Some(v.min(u64::from(u32::MAX)) as u32),
                None => tracing::warn!(
                    value = %val,
                    default = config.model.effective_call_stack_depth(),
                    "ignoring non-positive or invalid {}", env::CALL_STACK_DEPTH
                ),
            }
        }
        if let Ok(val) = std::env::var(env::GRANULARITY) {
            match val.parse::<Granularity>() {
                Ok(g) => config.model.granularity = Some(g),
                Err(e) => tracing::warn!(error = %e, "ignoring {}", env::GRANULARITY),
            }
        }
        if let Ok(val) = std::env::var(env::DUMP_FOLDER) {
            if !val.is_empty() {
                config.output.dump_folder = Some(PathBuf::from(val));
            }
        }
        if let Ok(val) = std::env::var(env::EXPERIMENT_NAME) {
            config.output.experiment_name = Some(val);
        }
        if let Ok(val) = std::env::var(env::DEBUG_MODEL) {
            match parse_flag(&val) {
                Some(v) => config.output.debug_model = Some(v),
                None => tracing::warn!(value = %val, "ignoring invalid {}", env::DEBUG_MODEL),
            }
        }
        if let Ok(val) = std::env::var(env::IGNORE_NODE) {
            config.output.ignore_node = Some(val);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Read the leading integer of `val`, as `strtol` does: `"16k"` is 16.
/// Values that are non-positive or start without a digit yield `None`;
/// overlong digit runs saturate.
fn parse_positive(val: &str) -> Option<u64> {
    let s = val.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: Vec<u8> = rest.bytes().take_while(u8::is_ascii_digit).collect();
    if digits.is_empty() || negative {
        return None;
    }
    let value = digits.iter().fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
    });
    (value > 0).then_some(value)
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
