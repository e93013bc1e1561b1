//! # Collaborators
//!
//! The rule never reaches for ambient state. Everything it talks to is a
//! trait object handed over in a [`RuleContext`] at construction time.

use crate::engine::cart::{AddItemOptions, CartId, CartLine, Variant, VariantId};
use crate::engine::dispatcher::EventDispatcher;
use crate::engine::error::Result;
use crate::engine::kinds::CouponKind;
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to the product catalog
pub trait CatalogStore: Send + Sync {
    fn find_variant(&self, id: VariantId) -> Result<Option<Variant>>;

    /// Every variant, in catalog order
    fn variants(&self) -> Result<Vec<Variant>>;
}

/// Cart persistence
pub trait CartStore: Send + Sync {
    /// Lines of the cart, in insertion order
    fn lines(&self, cart: CartId) -> Result<Vec<CartLine>>;

    /// Add `quantity` of `variant` and return the resulting line.
    /// A cart holds at most one line per variant.
    fn add_item(
        &self,
        cart: CartId,
        variant: &Variant,
        quantity: u32,
        options: AddItemOptions,
    ) -> Result<CartLine>;

    fn save(&self, line: &CartLine) -> Result<()>;
}

/// Coupons entered and validated for the order behind a cart
pub trait CouponRegistry: Send + Sync {
    /// Active coupons in application order
    fn active_coupons(&self, cart: CartId) -> Result<Vec<Arc<dyn CouponKind>>>;

    /// Record that `coupon` was entered on the cart's order. Entering a code
    /// that is already active replaces the stored coupon.
    fn activate(&self, cart: CartId, coupon: Arc<dyn CouponKind>) -> Result<()>;
}

/// Display string lookup
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, params: &HashMap<String, String>, domain: &str) -> String;
}

/// Dependency bundle handed to coupon kinds and listeners
#[derive(Clone)]
pub struct RuleContext {
    pub catalog: Arc<dyn CatalogStore>,
    pub carts: Arc<dyn CartStore>,
    pub coupons: Arc<dyn CouponRegistry>,
    pub translator: Arc<dyn Translator>,
    pub dispatcher: Arc<EventDispatcher>,
    /// Domain passed to the translator
    pub domain: String,
}

impl RuleContext {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        carts: Arc<dyn CartStore>,
        coupons: Arc<dyn CouponRegistry>,
        translator: Arc<dyn Translator>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            catalog,
            carts,
            coupons,
            translator,
            dispatcher,
            domain: "coupon".to_string(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Translate `key` in the context's domain, without parameters
    pub fn trans(&self, key: &str) -> String {
        self.translator.translate(key, &HashMap::new(), &self.domain)
    }
}
