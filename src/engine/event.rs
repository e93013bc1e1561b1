use crate::engine::cart::{AddItemOptions, CartId, CartLine, ProductId, VariantId};
use serde::{Deserialize, Serialize};

/// Event kinds the dispatcher routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CartEventKind {
    /// A variant is being added to a cart
    AddItem,
}

/// Payload carried through the add-item pipeline.
///
/// Handlers running before the store write see `cart_line == None`; the
/// default add-item handler fills it with the persisted line, and later
/// handlers may rewrite it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEvent {
    pub cart_id: CartId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub options: AddItemOptions,
    pub cart_line: Option<CartLine>,
}

impl CartEvent {
    pub fn add_item(
        cart_id: CartId,
        variant_id: VariantId,
        product_id: ProductId,
        quantity: u32,
    ) -> Self {
        Self {
            cart_id,
            variant_id,
            product_id,
            quantity,
            options: AddItemOptions::default(),
            cart_line: None,
        }
    }

    pub fn with_newness(mut self, new_line: bool) -> Self {
        self.options.new_line = new_line;
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.options.append = append;
        self
    }
}
