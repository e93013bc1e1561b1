use crate::engine::error::{CouponError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// `max_usage` value meaning the coupon can be used any number of times
pub const UNLIMITED_USAGE: i64 = -1;

/// One coupon instance as saved by an administrator.
///
/// The generic fields are shared by every coupon kind; kind-specific
/// parameters live in `effects` and are decoded by the kind itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponConfig {
    /// Stable kind tag selecting the coupon behavior (e.g. `coupon.type.give_product`)
    pub kind: String,
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: HashMap<String, Value>,
    #[serde(default)]
    pub is_cumulative: bool,
    #[serde(default)]
    pub is_removing_postage: bool,
    #[serde(default)]
    pub is_available_on_special_offers: bool,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default = "default_max_usage")]
    pub max_usage: i64,
    pub expiration_date: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

fn default_max_usage() -> i64 {
    UNLIMITED_USAGE
}

impl CouponConfig {
    pub fn new(
        kind: impl Into<String>,
        code: impl Into<String>,
        expiration_date: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: kind.into(),
            code: code.into(),
            title: String::new(),
            short_description: String::new(),
            description: String::new(),
            effects: HashMap::new(),
            is_cumulative: false,
            is_removing_postage: false,
            is_available_on_special_offers: false,
            is_enabled: true,
            max_usage: UNLIMITED_USAGE,
            expiration_date,
        }
    }

    /// Set one effect parameter
    pub fn with_effect(mut self, key: impl Into<String>, value: Value) -> Self {
        self.effects.insert(key.into(), value);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    // Load coupon from JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(CouponError::from_serde)
    }

    // Load coupon from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(CouponError::from_io)?;
        Self::from_json(&json_str)
    }

    /// Load every coupon of a JSON array
    pub fn list_from_json(json_str: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json_str).map_err(CouponError::from_serde)
    }

    pub fn effect(&self, key: &str) -> Option<&Value> {
        self.effects.get(key)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date <= now
    }

    /// Enabled, with usages left, and not yet expired
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let has_usage_left = self.max_usage == UNLIMITED_USAGE || self.max_usage > 0;
        self.is_enabled && has_usage_left && !self.is_expired_at(now)
    }
}
