//! Engine configuration.
//!
//! All tunables live in one JSON document. Every field has a default, so a
//! config file only needs to name what it overrides:
//!
//! ```json
//! { "depth": 2, "eval": { "danger": 1.5 }, "ordering": { "capture": 800.0 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eval::EvalWeights;
use crate::search::OrderingWeights;

/// Default search depth for every decision.
pub const DEFAULT_DEPTH: i32 = 3;

/// Default cap on effects a single unit may carry.
pub const DEFAULT_EFFECT_CAP: usize = 3;

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("effect cap must be at least 1")]
    ZeroEffectCap,
}

/// Search depth, effect cap and weight tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies searched per decision. Non-positive disables the search and
    /// selectors fall back to a random candidate.
    pub depth: i32,
    pub effect_cap: usize,
    /// Fixed RNG seed for reproducible fallbacks.
    pub seed: Option<u64>,
    pub eval: EvalWeights,
    pub ordering: OrderingWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            depth: DEFAULT_DEPTH,
            effect_cap: DEFAULT_EFFECT_CAP,
            seed: None,
            eval: EvalWeights::default(),
            ordering: OrderingWeights::default(),
        }
    }
}

/// Parses a configuration from JSON text.
pub fn load_config_from_str(json: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = serde_json::from_str(json)?;
    if config.effect_cap == 0 {
        return Err(ConfigError::ZeroEffectCap);
    }
    Ok(config)
}

/// Reads and parses a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&text)
}
