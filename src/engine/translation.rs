use crate::engine::context::Translator;
use crate::engine::error::{CouponError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Translator backed by a `domain -> key -> text` table.
///
/// Unknown keys translate to themselves. `%name%` placeholders are replaced
/// by the matching parameter.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    domains: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        let domains = serde_json::from_str(json_str).map_err(CouponError::from_serde)?;
        Ok(Self { domains })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(CouponError::from_io)?;
        Self::from_json(&json_str)
    }

    pub fn insert(&mut self, domain: &str, key: impl Into<String>, text: impl Into<String>) {
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(key.into(), text.into());
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, key: &str, params: &HashMap<String, String>, domain: &str) -> String {
        let text = self
            .domains
            .get(domain)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
            .unwrap_or(key);

        params.iter().fold(text.to_string(), |acc, (name, value)| {
            acc.replace(&format!("%{name}%"), value)
        })
    }
}
