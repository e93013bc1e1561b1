use crate::engine::cart::CartId;
use crate::engine::context::RuleContext;
use crate::engine::coupon::CouponConfig;
use crate::engine::error::{CouponError, Result};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

pub mod form;
pub use form::{InputField, InputKind, SelectOption};

pub mod give_product;
pub use give_product::{GiveProduct, GiveProductEffect};

/// Builds a configured coupon of one kind
pub type CouponFactory = fn(RuleContext, CouponConfig) -> Result<Arc<dyn CouponKind>>;

// Built-in coupon kinds with their stable tags
pub mod builtins {
    use super::*;

    pub const GIVE_PRODUCT: &str = "coupon.type.give_product";

    pub fn get_all_kinds() -> Vec<(String, CouponFactory)> {
        vec![(
            GIVE_PRODUCT.to_string(),
            give_product::factory as CouponFactory,
        )]
    }
}

/// Capability interface shared by every coupon kind.
///
/// Kinds are told apart by [`CouponKind::kind`], a stable tag, never by
/// concrete type. Code that needs kind-specific parameters filters on the tag
/// and decodes them from [`CouponKind::config`].
pub trait CouponKind: Send + Sync {
    /// Stable kind tag
    fn kind(&self) -> &str;

    fn config(&self) -> &CouponConfig;

    /// Evaluate the coupon against a cart and return the discount amount.
    ///
    /// Called on every cart integrity check, so it must be safe to call
    /// repeatedly.
    fn apply(&self, cart: CartId) -> Result<Decimal>;

    fn display_name(&self) -> String;

    fn input_label(&self) -> String;

    fn tooltip(&self) -> String;

    /// Back-office inputs used to edit this kind's effect parameters
    fn input_fields(&self) -> Result<Vec<InputField>> {
        Ok(Vec::new())
    }

    fn code(&self) -> &str {
        &self.config().code
    }
}

/// Registry of coupon factories keyed by kind tag
pub struct KindRegistry {
    factories: HashMap<String, CouponFactory>,
}

impl KindRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every built-in kind
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (tag, factory) in builtins::get_all_kinds() {
            registry.register(tag, factory);
        }
        registry
    }

    pub fn register(&mut self, tag: impl Into<String>, factory: CouponFactory) {
        self.factories.insert(tag.into(), factory);
    }

    pub fn has_kind(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Build a coupon from its saved configuration
    pub fn build(&self, context: RuleContext, config: CouponConfig) -> Result<Arc<dyn CouponKind>> {
        let factory = self
            .factories
            .get(&config.kind)
            .ok_or_else(|| CouponError::UnknownKind(config.kind.clone()))?;
        debug!("Building coupon {} of kind {}", config.code, config.kind);
        factory(context, config)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
