//! Layered override loading.
//!
//! Sources (in priority order, highest wins):
//! 1. CLI `--param KEY=VALUE` / `--threshold KEY=VALUE` flags ([`OverrideConfig::apply_cli`])
//! 2. Environment variables (`SHANG_` prefix, `__` as separator)
//! 3. A TOML file passed with `--config`
//! 4. Built-in defaults (no overrides)
//!
//! Figment maps `SHANG_PARAMS__OMEGA` -> `params.omega` and
//! `SHANG_THRESHOLDS__TP_FORWARD` -> `thresholds.tp_forward`.
//!
//! This layer only collects `name -> number` pairs. Key names are validated
//! later, against the fixed parameter and threshold schema.

use std::collections::BTreeMap;
use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::OverrideMap;
use crate::error::AppError;

/// Environment variable prefix for override keys.
pub const ENV_PREFIX: &str = "SHANG_";

/// Raw parameter and threshold overrides gathered from every layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OverrideConfig {
    #[serde(default)]
    pub params: OverrideMap,
    #[serde(default)]
    pub thresholds: OverrideMap,
}

impl OverrideConfig {
    /// Load overrides from the TOML file (if any) and the environment.
    ///
    /// Does NOT call `dotenvy`; use [`OverrideConfig::load_with_dotenv`] for
    /// `.env` support.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(AppError::new(
                    2,
                    format!("Config file not found: {}", path.display()),
                ));
            }
        }

        let raw: Self = Self::figment(path)
            .extract()
            .map_err(|e| AppError::new(2, format!("Invalid configuration: {e}")))?;
        let config = raw.normalized();

        debug!(
            params = config.params.len(),
            thresholds = config.thresholds.len(),
            "loaded override config"
        );
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`OverrideConfig::load`].
    ///
    /// A missing `.env` is fine; one that exists but cannot be read or parsed
    /// is a config error (exit 2).
    pub fn load_with_dotenv(path: Option<&Path>) -> Result<Self, AppError> {
        match dotenvy::dotenv() {
            Ok(env_path) => debug!(path = %env_path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(AppError::new(2, format!("Failed to load .env: {e}"))),
        }
        Self::load(path)
    }

    /// Build the figment provider chain (public so tests can inspect it).
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Layer CLI pairs on top. Later pairs win over earlier ones.
    pub fn apply_cli(&mut self, params: &[(String, f64)], thresholds: &[(String, f64)]) {
        for (key, value) in params {
            self.params.insert(normalize_key(key), *value);
        }
        for (key, value) in thresholds {
            self.thresholds.insert(normalize_key(key), *value);
        }
    }

    /// Parameter overrides, or `None` when nothing was set.
    pub fn param_overrides(&self) -> Option<&OverrideMap> {
        (!self.params.is_empty()).then_some(&self.params)
    }

    /// Threshold overrides, or `None` when nothing was set.
    pub fn threshold_overrides(&self) -> Option<&OverrideMap> {
        (!self.thresholds.is_empty()).then_some(&self.thresholds)
    }

    // Env keys arrive lower-cased and are all-lowercase, so in byte order they
    // sort after any mixed-case spelling of the same key from the file and
    // win the collision below.
    fn normalized(self) -> Self {
        Self {
            params: normalize_map(self.params),
            thresholds: normalize_map(self.thresholds),
        }
    }
}

fn normalize_map(map: OverrideMap) -> OverrideMap {
    let mut out = BTreeMap::new();
    for (key, value) in map {
        out.insert(normalize_key(&key), value);
    }
    out
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
