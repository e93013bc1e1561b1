pub mod cart;
pub mod config;
pub mod context;
pub mod coupon;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod kinds;
pub mod listener;
pub mod memory;
pub mod translation;

// Re-export key types for easier access
pub use cart::{AddItemOptions, CartId, CartLine, ProductId, Variant, VariantId};
pub use config::ModuleConfig;
pub use context::{CartStore, CatalogStore, CouponRegistry, RuleContext, Translator};
pub use coupon::CouponConfig;
pub use dispatcher::{CartEventHandler, DEFAULT_PRIORITY, EventDispatcher};
pub use event::{CartEvent, CartEventKind};
pub use kinds::{CouponKind, GiveProduct, KindRegistry};
pub use listener::FreeLineListener;

use chrono::Utc;
use error::{CouponError, Result};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Wires the give-product rule into a host.
///
/// Creating the engine subscribes the [`FreeLineListener`] to the add-item
/// event. Coupons entered through [`CouponEngine::enter_coupon`] are built
/// from their kind tag, recorded as active and applied right away;
/// [`CouponEngine::check_cart`] re-applies every active coupon and is meant
/// to run on each cart integrity check.
pub struct CouponEngine {
    context: RuleContext,
    kinds: KindRegistry,
}

impl CouponEngine {
    /// Create the engine with the built-in coupon kinds
    pub fn new(context: RuleContext, settings: &ModuleConfig) -> Result<Self> {
        Self::with_kinds(context, settings, KindRegistry::with_builtins())
    }

    /// Create the engine with a custom kind registry.
    ///
    /// `settings` are validated first: a listener at or above the default
    /// handler's priority would never see the persisted line.
    pub fn with_kinds(
        context: RuleContext,
        settings: &ModuleConfig,
        kinds: KindRegistry,
    ) -> Result<Self> {
        settings.validate()?;
        let context = context.with_domain(settings.translation_domain.clone());
        context.dispatcher.subscribe(
            CartEventKind::AddItem,
            settings.listener_priority,
            Arc::new(FreeLineListener::new(&context)),
        );
        info!(
            "Free-line listener subscribed with priority {}",
            settings.listener_priority
        );
        Ok(Self { context, kinds })
    }

    pub fn context(&self) -> &RuleContext {
        &self.context
    }

    /// Build a coupon from its saved configuration without activating it
    pub fn build_coupon(&self, config: CouponConfig) -> Result<Arc<dyn CouponKind>> {
        self.kinds.build(self.context.clone(), config)
    }

    /// A customer entered `config`'s code on `cart`
    pub fn enter_coupon(&self, cart: CartId, config: CouponConfig) -> Result<Decimal> {
        if !config.is_active_at(Utc::now()) {
            warn!("Coupon {} refused on cart {}: not active", config.code, cart);
            return Err(CouponError::Inactive(config.code));
        }
        let coupon = self.build_coupon(config)?;
        info!("Coupon {} entered on cart {}", coupon.code(), cart);
        self.context.coupons.activate(cart, Arc::clone(&coupon))?;
        coupon.apply(cart)
    }

    /// Re-apply every active coupon and return the summed discount
    pub fn check_cart(&self, cart: CartId) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for coupon in self.context.coupons.active_coupons(cart)? {
            let discount = coupon.apply(cart)?;
            debug!("Coupon {} discount on cart {}: {}", coupon.code(), cart, discount);
            total += discount;
        }
        Ok(total)
    }
}
