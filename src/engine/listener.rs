use crate::engine::context::{CartStore, CouponRegistry, RuleContext};
use crate::engine::dispatcher::CartEventHandler;
use crate::engine::error::Result;
use crate::engine::event::CartEvent;
use crate::engine::kinds::builtins::GIVE_PRODUCT;
use crate::engine::kinds::GiveProductEffect;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Prices a freshly added line at zero when an active give-product coupon
/// promises its variant.
///
/// Subscribed below the default add-item handler so it sees the persisted
/// line.
pub struct FreeLineListener {
    coupons: Arc<dyn CouponRegistry>,
    carts: Arc<dyn CartStore>,
}

impl FreeLineListener {
    pub fn new(context: &RuleContext) -> Self {
        Self {
            coupons: Arc::clone(&context.coupons),
            carts: Arc::clone(&context.carts),
        }
    }

    pub fn on_item_added(&self, event: &mut CartEvent) -> Result<()> {
        let Some(line) = event.cart_line.as_ref() else {
            debug!(
                "No cart line on add-item event for variant {}, nothing to price",
                event.variant_id
            );
            return Ok(());
        };

        if line.price <= Decimal::ZERO {
            return Ok(());
        }

        let coupons = self.coupons.active_coupons(event.cart_id)?;
        let matching = coupons
            .iter()
            .filter(|c| c.kind() == GIVE_PRODUCT)
            .find(|coupon| match GiveProductEffect::from_config(coupon.config()) {
                Ok(effect) => effect.variant_id == line.variant_id,
                Err(e) => {
                    warn!("Skipping coupon {} [{}]: {}", coupon.code(), e.code(), e);
                    false
                }
            });
        let Some(coupon) = matching else {
            return Ok(());
        };

        // The event only carries the free line once it is persisted
        let mut free = line.clone();
        free.make_free();
        self.carts.save(&free)?;
        info!(
            "Coupon {} made variant {} free in cart {}",
            coupon.code(),
            free.variant_id,
            event.cart_id
        );
        event.cart_line = Some(free);
        Ok(())
    }
}

impl CartEventHandler for FreeLineListener {
    fn name(&self) -> &str {
        "free_line"
    }

    fn handle(&self, event: &mut CartEvent) -> Result<()> {
        self.on_item_added(event)
    }
}
