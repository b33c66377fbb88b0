//! Node configuration for the Ember emission node.
//!
//! [`NodeConfig`] starts from built-in defaults, then applies an optional
//! TOML file, then `EMBER__`-prefixed environment variables
//! (e.g. `EMBER__LOG_LEVEL=debug`, `EMBER__EMISSION__RETENTION_PERCENT=75`).
//! Emission settings use whole tokens and basis points so they fit plain
//! TOML integers; [`EmissionSettings::to_params`] converts them to
//! fixed-point [`RateParameters`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use ember_core::constants::{
    BPS_PRECISION, DEFAULT_QUOTA_RATIO, DEFAULT_RATE_CEILING, DEFAULT_RETENTION_PERCENT,
    DEFAULT_YIELD_MULTIPLIER, FEE_UNIT, RATE_BASE, TOKEN,
};
use ember_core::error::EmissionError;
use ember_core::math::mul_div;
use ember_core::params::{RateParameters, Ratio};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "EMBER";

/// Human-friendly emission settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionSettings {
    /// Rate ceiling in whole tokens per fee unit.
    pub rate_ceiling_tokens: u64,
    pub yield_multiplier: u64,
    /// Percent of each minted amount credited to the recipient.
    pub retention_percent: u64,
    /// Quota as a share of pool reserves, in basis points.
    pub quota_ratio_bps: u64,
    /// Four inclusive `y / x` upper bounds of the lower turnover bands.
    pub tier_breakpoints: Vec<Ratio>,
}

impl Default for EmissionSettings {
    fn default() -> Self {
        let params = RateParameters::default();
        Self {
            rate_ceiling_tokens: (DEFAULT_RATE_CEILING / TOKEN) as u64,
            yield_multiplier: DEFAULT_YIELD_MULTIPLIER as u64,
            retention_percent: DEFAULT_RETENTION_PERCENT,
            quota_ratio_bps: (DEFAULT_QUOTA_RATIO * BPS_PRECISION as u128 / RATE_BASE) as u64,
            tier_breakpoints: params.tier_breakpoints.to_vec(),
        }
    }
}

impl EmissionSettings {
    /// Convert to validated fixed-point parameters.
    pub fn to_params(&self) -> Result<RateParameters, EmissionError> {
        let tier_breakpoints: [Ratio; 4] =
            self.tier_breakpoints.as_slice().try_into().map_err(|_| {
                EmissionError::Config(format!(
                    "expected 4 tier breakpoints, got {}",
                    self.tier_breakpoints.len()
                ))
            })?;
        let default_rate_ceiling = (self.rate_ceiling_tokens as u128)
            .checked_mul(TOKEN)
            .ok_or_else(|| EmissionError::Config("rate ceiling overflow".into()))?;
        let quota_ratio = mul_div(
            self.quota_ratio_bps as u128,
            RATE_BASE,
            BPS_PRECISION as u128,
        )?;

        let params = RateParameters {
            default_rate_ceiling,
            yield_multiplier: self.yield_multiplier as u128,
            fee_unit: FEE_UNIT,
            retention_percent: self.retention_percent,
            quota_ratio,
            tier_breakpoints,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Configuration for an emission node instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "debug", "ember_emission=trace").
    pub log_level: String,
    /// "json" for structured logs, anything else for text.
    pub log_format: String,
    pub emission: EmissionSettings,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ember");

        Self {
            data_dir,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            emission: EmissionSettings::default(),
        }
    }
}

impl NodeConfig {
    /// Load defaults, then `path` (if any), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, EmissionError> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, EmissionError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(environment)
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| EmissionError::Config(e.to_string()))
    }

    /// Path to the RocksDB quota database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("quota")
    }
}
