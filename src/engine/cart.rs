use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a purchasable variant (product sale element) in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub u64);

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a customer cart. One cart backs one order in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub Uuid);

impl CartId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog variant, read-only from the rule's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// Merchant reference, shown next to the product title in the back office
    pub reference: String,
    pub product_title: String,
    pub price: Decimal,
    #[serde(default)]
    pub promo_price: Decimal,
    #[serde(default)]
    pub is_promo: bool,
}

/// One entry of a cart: a quantity of one variant and its price fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: Uuid,
    pub cart_id: CartId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
    pub price_end_of_life: Decimal,
    pub promo_price: Decimal,
    pub discount: Decimal,
    pub is_promo: bool,
}

impl CartLine {
    /// Build a fresh line for `variant`, priced from the catalog
    pub fn for_variant(cart_id: CartId, variant: &Variant, quantity: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            cart_id,
            variant_id: variant.id,
            product_id: variant.product_id,
            quantity,
            price: variant.price,
            price_end_of_life: variant.price,
            promo_price: variant.promo_price,
            discount: Decimal::ZERO,
            is_promo: variant.is_promo,
        }
    }

    /// Zero every price-related field
    pub fn make_free(&mut self) {
        self.price = Decimal::ZERO;
        self.price_end_of_life = Decimal::ZERO;
        self.promo_price = Decimal::ZERO;
        self.discount = Decimal::ZERO;
    }

    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// How an add-item request merges with the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddItemOptions {
    /// Ask for a fresh line. Stores keeping one line per variant merge into
    /// the existing line instead.
    pub new_line: bool,
    /// Add to the existing quantity instead of replacing it
    pub append: bool,
}
