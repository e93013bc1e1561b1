/*!
# coupon-give-product

A promotional-pricing rule for e-commerce carts: entering a "give product"
coupon adds a designated variant to the cart and prices that line at zero,
once per order.

## Overview

The rule is made of two cooperating parts plugged into a host cart:

* **GiveProduct**: the coupon evaluator. Applying it to a cart inserts the
  free variant through an add-item event, unless the variant is already in the
  cart. It always reports a zero discount.
* **FreeLineListener**: a cart event handler running after the host's default
  add-item handling. When the added line's variant is promised by an active
  give-product coupon, it zeroes the line's price fields and saves it.

## Key Components

* **CouponEngine**: installs the listener, builds coupons from their kind tag and applies them
* **EventDispatcher**: typed, priority-ordered cart event handlers
* **RuleContext**: the collaborators (catalog, cart store, coupon registry, translator, dispatcher)
* **CouponKind**: the capability interface every coupon kind implements
* **CouponConfig**: a saved coupon, loadable from JSON

## Usage Example

```rust,no_run
use coupon_give_product::engine::memory::{
    InMemoryCartStore, InMemoryCatalog, InMemoryCouponRegistry, StoreAddItemHandler,
};
use coupon_give_product::engine::translation::MessageCatalog;
use coupon_give_product::{
    CartEventKind, CartId, CartStore, CouponConfig, CouponEngine, DEFAULT_PRIORITY, EventDispatcher,
    ModuleConfig, Result, RuleContext,
};
use std::sync::Arc;

fn main() -> Result<()> {
    let catalog = Arc::new(InMemoryCatalog::from_json(
        r#"[{"id": 42, "product_id": 7, "reference": "MUG-RED", "product_title": "Mug", "price": "19.99"}]"#,
    )?);
    let carts = Arc::new(InMemoryCartStore::new());
    let dispatcher = Arc::new(EventDispatcher::new());

    // The host's own add-item handling
    dispatcher.subscribe(
        CartEventKind::AddItem,
        DEFAULT_PRIORITY,
        Arc::new(StoreAddItemHandler::new(catalog.clone(), carts.clone())),
    );

    let context = RuleContext::new(
        catalog,
        carts.clone(),
        Arc::new(InMemoryCouponRegistry::new()),
        Arc::new(MessageCatalog::new()),
        dispatcher,
    );
    let engine = CouponEngine::new(context, &ModuleConfig::default())?;

    let coupon = CouponConfig::from_json(
        r#"{
            "kind": "coupon.type.give_product",
            "code": "FREEMUG",
            "effects": {"product_sale_element_id": 42, "quantity": 2},
            "expiration_date": "2030-01-01T00:00:00Z"
        }"#,
    )?;

    let cart = CartId::new();
    engine.enter_coupon(cart, coupon)?;
    engine.check_cart(cart)?;

    println!("{:?}", carts.lines(cart));
    Ok(())
}
```

## Error Handling

Every fallible operation returns [`Result`] with a [`CouponError`].
Configuration problems surface as `InvalidConfig`; a variant that vanished
from the catalog after the coupon was saved is `VariantNotFound`, which the
evaluator logs and treats as a no-op (see [`CouponError::recoverable`]).
Store failures propagate untouched.
*/

pub mod engine;

// Re-export all public APIs for easier access
pub use engine::context::{CartStore, CatalogStore, CouponRegistry, RuleContext, Translator};
pub use engine::error::{CouponError, Result};
pub use engine::kinds::{CouponKind, GiveProduct, GiveProductEffect, KindRegistry};
pub use engine::{
    AddItemOptions, CartEvent, CartEventHandler, CartEventKind, CartId, CartLine, CouponConfig,
    CouponEngine, DEFAULT_PRIORITY, EventDispatcher, FreeLineListener, ModuleConfig, ProductId,
    Variant, VariantId,
};
