use crate::engine::dispatcher::DEFAULT_PRIORITY;
use crate::engine::error::{CouponError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Module-level settings for the give-product rule
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Priority of the free-line listener on the add-item event.
    /// Must stay below the host's default handler so the listener sees the
    /// persisted line.
    pub listener_priority: i32,
    /// Translation domain for display strings
    pub translation_domain: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            listener_priority: DEFAULT_PRIORITY - 1,
            translation_domain: "coupon".to_string(),
        }
    }
}

impl ModuleConfig {
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str).map_err(CouponError::from_serde)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(CouponError::from_io)?;
        Self::from_json(&json_str)
    }

    /// Check the settings. Runs on load and again when the engine is built.
    pub fn validate(&self) -> Result<()> {
        if self.listener_priority >= DEFAULT_PRIORITY {
            return Err(CouponError::InvalidConfig(format!(
                "listener_priority must be below {DEFAULT_PRIORITY}, got {}",
                self.listener_priority
            )));
        }
        if self.translation_domain.is_empty() {
            return Err(CouponError::InvalidConfig(
                "translation_domain must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
