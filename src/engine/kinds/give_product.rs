//! # Give-Product Coupon
//!
//! Entering the coupon puts a designated variant in the customer's cart.
//! The line is priced at zero by [`FreeLineListener`], so evaluation itself
//! never reports a discount.
//!
//! [`FreeLineListener`]: crate::engine::listener::FreeLineListener

use crate::engine::cart::{CartId, Variant, VariantId};
use crate::engine::context::RuleContext;
use crate::engine::coupon::CouponConfig;
use crate::engine::error::{CouponError, Result};
use crate::engine::event::{CartEvent, CartEventKind};
use crate::engine::kinds::builtins::GIVE_PRODUCT;
use crate::engine::kinds::form::{InputField, SelectOption};
use crate::engine::kinds::CouponKind;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

/// Effect key holding the variant to give away
pub const INPUT_VARIANT_ID_NAME: &str = "product_sale_element_id";
/// Effect key holding how many units are given
pub const INPUT_QUANTITY_NAME: &str = "quantity";
/// Generic amount input, fixed at zero for this kind
pub const INPUT_AMOUNT_NAME: &str = "amount";

const DEFAULT_QUANTITY: u32 = 1;

/// Effect parameters decoded from a coupon configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiveProductEffect {
    pub variant_id: VariantId,
    pub quantity: u32,
}

impl GiveProductEffect {
    /// Decode and check the effect parameters, without touching the catalog
    pub fn from_config(config: &CouponConfig) -> Result<Self> {
        let variant_id = config
            .effect(INPUT_VARIANT_ID_NAME)
            .ok_or_else(|| {
                CouponError::InvalidConfig(format!(
                    "Missing '{INPUT_VARIANT_ID_NAME}' in coupon {}",
                    config.code
                ))
            })
            .and_then(|value| positive_integer(INPUT_VARIANT_ID_NAME, value))?;

        let quantity = match config.effect(INPUT_QUANTITY_NAME) {
            Some(value) => {
                let quantity = positive_integer(INPUT_QUANTITY_NAME, value)?;
                u32::try_from(quantity).map_err(|_| {
                    CouponError::InvalidConfig(format!(
                        "'{INPUT_QUANTITY_NAME}' is too large: {quantity}"
                    ))
                })?
            }
            None => DEFAULT_QUANTITY,
        };

        Ok(Self {
            variant_id: VariantId(variant_id),
            quantity,
        })
    }
}

// Admin forms submit text, so numeric strings are accepted too
fn positive_integer(key: &str, value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => Ok(n),
        _ => Err(CouponError::InvalidConfig(format!(
            "'{key}' must be a positive integer, got {value}"
        ))),
    }
}

/// Give-product coupon evaluator
pub struct GiveProduct {
    context: RuleContext,
    config: CouponConfig,
    effect: GiveProductEffect,
}

impl GiveProduct {
    /// Validate `config` and bind it to the collaborators in `context`.
    ///
    /// Fails with `InvalidConfig` when the variant id is missing or does not
    /// resolve in the catalog, or when the quantity is below one.
    pub fn configure(context: RuleContext, config: CouponConfig) -> Result<Self> {
        let effect = Self::validate(&context, &config)?;
        debug!(
            "Configured coupon {}: {} x variant {}",
            config.code, effect.quantity, effect.variant_id
        );
        Ok(Self {
            context,
            config,
            effect,
        })
    }

    /// Replace the configuration. On error the current one is kept.
    pub fn update(&mut self, config: CouponConfig) -> Result<()> {
        let effect = Self::validate(&self.context, &config)?;
        info!(
            "Updated coupon {}: {} x variant {}",
            config.code, effect.quantity, effect.variant_id
        );
        self.config = config;
        self.effect = effect;
        Ok(())
    }

    fn validate(context: &RuleContext, config: &CouponConfig) -> Result<GiveProductEffect> {
        if config.kind != GIVE_PRODUCT {
            return Err(CouponError::InvalidConfig(format!(
                "Coupon {} has kind {}, expected {GIVE_PRODUCT}",
                config.code, config.kind
            )));
        }
        let effect = GiveProductEffect::from_config(config)?;
        if context.catalog.find_variant(effect.variant_id)?.is_none() {
            return Err(CouponError::InvalidConfig(format!(
                "Variant {} does not exist",
                effect.variant_id
            )));
        }
        Ok(effect)
    }

    pub fn variant_id(&self) -> VariantId {
        self.effect.variant_id
    }

    pub fn quantity(&self) -> u32 {
        self.effect.quantity
    }

    pub fn input_quantity_label(&self) -> String {
        self.context
            .trans("Number of product added to the cart when entering this Coupon")
    }

    /// Put the free variant in the cart unless it is already there.
    ///
    /// Returns zero: the free line's own price carries the effect.
    pub fn apply(&self, cart: CartId) -> Result<Decimal> {
        let discount = Decimal::ZERO;

        if self.is_already_in_cart(cart)? {
            debug!(
                "Coupon {}: variant {} already in cart {}",
                self.config.code, self.effect.variant_id, cart
            );
            return Ok(discount);
        }

        match self.free_variant() {
            Ok(variant) => self.add_to_cart(cart, &variant)?,
            Err(e) if e.recoverable() => {
                warn!(
                    "Coupon {} has no effect on cart {} [{}]: {}",
                    self.config.code,
                    cart,
                    e.code(),
                    e
                );
            }
            Err(e) => return Err(e),
        }

        Ok(discount)
    }

    fn is_already_in_cart(&self, cart: CartId) -> Result<bool> {
        let lines = self.context.carts.lines(cart)?;
        Ok(lines
            .iter()
            .any(|line| line.variant_id == self.effect.variant_id))
    }

    fn free_variant(&self) -> Result<Variant> {
        self.context
            .catalog
            .find_variant(self.effect.variant_id)?
            .ok_or(CouponError::VariantNotFound(self.effect.variant_id))
    }

    fn add_to_cart(&self, cart: CartId, variant: &Variant) -> Result<()> {
        info!(
            "Coupon {}: adding {} x variant {} to cart {}",
            self.config.code, self.effect.quantity, variant.id, cart
        );
        let mut event =
            CartEvent::add_item(cart, variant.id, variant.product_id, self.effect.quantity)
                .with_newness(true)
                .with_append(true);
        self.context
            .dispatcher
            .dispatch(CartEventKind::AddItem, &mut event)
    }
}

impl CouponKind for GiveProduct {
    fn kind(&self) -> &str {
        GIVE_PRODUCT
    }

    fn config(&self) -> &CouponConfig {
        &self.config
    }

    fn apply(&self, cart: CartId) -> Result<Decimal> {
        GiveProduct::apply(self, cart)
    }

    fn display_name(&self) -> String {
        self.context.trans("Add a free product to the customer cart")
    }

    fn input_label(&self) -> String {
        self.context.trans("Product Sale Element added to the cart")
    }

    fn tooltip(&self) -> String {
        self.context.trans(
            "This Coupon will give the associated product to the customer cart. The Coupon will make sure one order can get only one free product.",
        )
    }

    fn input_fields(&self) -> Result<Vec<InputField>> {
        let options = self
            .context
            .catalog
            .variants()?
            .into_iter()
            .map(|variant| SelectOption {
                value: variant.id.to_string(),
                label: format!("{} ({})", variant.product_title, variant.reference),
                selected: variant.id == self.effect.variant_id,
            })
            .collect();

        Ok(vec![
            InputField::hidden(INPUT_AMOUNT_NAME, "0"),
            InputField::select(INPUT_VARIANT_ID_NAME, self.input_label(), options),
            InputField::text(
                INPUT_QUANTITY_NAME,
                self.input_quantity_label(),
                self.effect.quantity.to_string(),
            ),
        ])
    }
}

pub(crate) fn factory(context: RuleContext, config: CouponConfig) -> Result<Arc<dyn CouponKind>> {
    Ok(Arc::new(GiveProduct::configure(context, config)?))
}
