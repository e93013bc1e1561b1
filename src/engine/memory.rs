//! # In-Memory Collaborators
//!
//! Reference implementations of the store traits plus the default add-item
//! handler. They back the integration tests and let a host embed the rule
//! without a database.

use crate::engine::cart::{AddItemOptions, CartId, CartLine, Variant, VariantId};
use crate::engine::context::{CartStore, CatalogStore, CouponRegistry};
use crate::engine::dispatcher::CartEventHandler;
use crate::engine::error::{CouponError, Result};
use crate::engine::event::CartEvent;
use crate::engine::kinds::CouponKind;
use chrono::Utc;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Catalog held in memory, ordered by variant id
#[derive(Default)]
pub struct InMemoryCatalog {
    variants: RwLock<BTreeMap<VariantId, Variant>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variants(variants: impl IntoIterator<Item = Variant>) -> Self {
        let catalog = Self::new();
        for variant in variants {
            catalog.insert(variant);
        }
        catalog
    }

    /// Load a JSON array of variants
    pub fn from_json(json_str: &str) -> Result<Self> {
        let variants: Vec<Variant> =
            serde_json::from_str(json_str).map_err(CouponError::from_serde)?;
        Ok(Self::with_variants(variants))
    }

    pub fn insert(&self, variant: Variant) {
        self.variants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(variant.id, variant);
    }

    /// Drop a variant, as when it is discontinued
    pub fn remove(&self, id: VariantId) -> Option<Variant> {
        self.variants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }
}

impl CatalogStore for InMemoryCatalog {
    fn find_variant(&self, id: VariantId) -> Result<Option<Variant>> {
        Ok(self
            .variants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    fn variants(&self) -> Result<Vec<Variant>> {
        Ok(self
            .variants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect())
    }
}

/// Carts held in memory, one line per variant
#[derive(Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<CartId, Vec<CartLine>>>,
    saves: AtomicUsize,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a line in as-is, replacing any line for the same variant
    pub fn insert_line(&self, line: CartLine) {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let lines = carts.entry(line.cart_id).or_default();
        match lines.iter_mut().find(|l| l.variant_id == line.variant_id) {
            Some(existing) => *existing = line,
            None => lines.push(line),
        }
    }

    pub fn line_for(&self, cart: CartId, variant: VariantId) -> Option<CartLine> {
        self.carts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cart)
            .and_then(|lines| lines.iter().find(|l| l.variant_id == variant).cloned())
    }

    /// How many times `save` went through
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CartStore for InMemoryCartStore {
    fn lines(&self, cart: CartId) -> Result<Vec<CartLine>> {
        Ok(self
            .carts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cart)
            .cloned()
            .unwrap_or_default())
    }

    fn add_item(
        &self,
        cart: CartId,
        variant: &Variant,
        quantity: u32,
        options: AddItemOptions,
    ) -> Result<CartLine> {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let lines = carts.entry(cart).or_default();

        if let Some(line) = lines.iter_mut().find(|l| l.variant_id == variant.id) {
            line.quantity = if options.append {
                line.quantity.saturating_add(quantity)
            } else {
                quantity
            };
            debug!(
                "Cart {}: variant {} now at quantity {}",
                cart, variant.id, line.quantity
            );
            return Ok(line.clone());
        }

        let line = CartLine::for_variant(cart, variant, quantity);
        debug!(
            "Cart {}: new line {} for {} x variant {}",
            cart, line.id, quantity, variant.id
        );
        lines.push(line.clone());
        Ok(line)
    }

    fn save(&self, line: &CartLine) -> Result<()> {
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let stored = carts
            .get_mut(&line.cart_id)
            .and_then(|lines| lines.iter_mut().find(|l| l.id == line.id))
            .ok_or_else(|| {
                CouponError::store(format!(
                    "Cart line {} not found in cart {}",
                    line.id, line.cart_id
                ))
            })?;
        *stored = line.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Coupons entered per cart, kept in entry order
#[derive(Default)]
pub struct InMemoryCouponRegistry {
    entered: RwLock<HashMap<CartId, Vec<Arc<dyn CouponKind>>>>,
}

impl InMemoryCouponRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CouponRegistry for InMemoryCouponRegistry {
    fn active_coupons(&self, cart: CartId) -> Result<Vec<Arc<dyn CouponKind>>> {
        let now = Utc::now();
        Ok(self
            .entered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cart)
            .map(|coupons| {
                coupons
                    .iter()
                    .filter(|c| c.config().is_active_at(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Record `coupon` on `cart`. A coupon entered again under the same code
    /// replaces the stored one and keeps its place in entry order.
    fn activate(&self, cart: CartId, coupon: Arc<dyn CouponKind>) -> Result<()> {
        let mut entered = self.entered.write().unwrap_or_else(PoisonError::into_inner);
        let coupons = entered.entry(cart).or_default();
        match coupons.iter_mut().find(|c| c.code() == coupon.code()) {
            Some(existing) => {
                debug!("Coupon {} re-entered on cart {}, replacing it", coupon.code(), cart);
                *existing = coupon;
            }
            None => coupons.push(coupon),
        }
        Ok(())
    }
}

/// Default add-item handling: resolve the variant, write the line, and hand
/// the persisted line to the handlers that follow.
pub struct StoreAddItemHandler {
    catalog: Arc<dyn CatalogStore>,
    carts: Arc<dyn CartStore>,
}

impl StoreAddItemHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>, carts: Arc<dyn CartStore>) -> Self {
        Self { catalog, carts }
    }
}

impl CartEventHandler for StoreAddItemHandler {
    fn name(&self) -> &str {
        "add_item"
    }

    fn handle(&self, event: &mut CartEvent) -> Result<()> {
        let variant = self
            .catalog
            .find_variant(event.variant_id)?
            .ok_or(CouponError::VariantNotFound(event.variant_id))?;
        let line = self
            .carts
            .add_item(event.cart_id, &variant, event.quantity, event.options)?;
        event.cart_line = Some(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cart::ProductId;
    use crate::engine::coupon::CouponConfig;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn mug() -> Variant {
        Variant {
            id: VariantId(42),
            product_id: ProductId(7),
            reference: "MUG-RED".to_string(),
            product_title: "Mug".to_string(),
            price: dec!(19.99),
            promo_price: dec!(15.00),
            is_promo: false,
        }
    }

    #[test]
    fn test_catalog_lookup_and_removal() {
        let catalog = InMemoryCatalog::with_variants([mug()]);
        assert_eq!(catalog.find_variant(VariantId(42)).unwrap(), Some(mug()));
        assert_eq!(catalog.find_variant(VariantId(1)).unwrap(), None);

        catalog.remove(VariantId(42));
        assert!(catalog.find_variant(VariantId(42)).unwrap().is_none());
        assert!(catalog.variants().unwrap().is_empty());
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = InMemoryCatalog::from_json(
            r#"[
                {"id": 2, "product_id": 1, "reference": "B", "product_title": "Beta", "price": 5},
                {"id": 1, "product_id": 1, "reference": "A", "product_title": "Alpha", "price": "3.50"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<VariantId> = catalog.variants().unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![VariantId(1), VariantId(2)]);
    }

    #[test]
    fn test_add_item_keeps_one_line_per_variant() {
        let store = InMemoryCartStore::new();
        let cart = CartId::new();
        let append = AddItemOptions {
            new_line: true,
            append: true,
        };

        let first = store.add_item(cart, &mug(), 2, append).unwrap();
        let second = store.add_item(cart, &mug(), 3, append).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5);
        assert_eq!(store.lines(cart).unwrap().len(), 1);

        let replaced = store
            .add_item(cart, &mug(), 1, AddItemOptions::default())
            .unwrap();
        assert_eq!(replaced.quantity, 1);
    }

    #[test]
    fn test_save_counts_and_rejects_unknown_lines() {
        let store = InMemoryCartStore::new();
        let cart = CartId::new();
        let mut line = store
            .add_item(cart, &mug(), 1, AddItemOptions::default())
            .unwrap();

        line.make_free();
        store.save(&line).unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.line_for(cart, VariantId(42)).unwrap().is_free());

        let stray = CartLine::for_variant(CartId::new(), &mug(), 1);
        assert!(matches!(store.save(&stray), Err(CouponError::Store(_))));
        assert_eq!(store.save_count(), 1);
    }

    struct Flat {
        config: CouponConfig,
    }

    impl CouponKind for Flat {
        fn kind(&self) -> &str {
            "coupon.type.remove_x_amount"
        }

        fn config(&self) -> &CouponConfig {
            &self.config
        }

        fn apply(&self, _cart: CartId) -> Result<Decimal> {
            Ok(Decimal::ZERO)
        }

        fn display_name(&self) -> String {
            String::new()
        }

        fn input_label(&self) -> String {
            String::new()
        }

        fn tooltip(&self) -> String {
            String::new()
        }
    }

    fn flat(code: &str, title: &str) -> Arc<dyn CouponKind> {
        let config = CouponConfig::new(
            "coupon.type.remove_x_amount",
            code,
            Utc::now() + chrono::Duration::days(1),
        )
        .with_title(title);
        Arc::new(Flat { config })
    }

    #[test]
    fn test_reentered_code_replaces_coupon_in_place() {
        let registry = InMemoryCouponRegistry::new();
        let cart = CartId::new();
        registry.activate(cart, flat("A", "first")).unwrap();
        registry.activate(cart, flat("B", "other")).unwrap();
        registry.activate(cart, flat("A", "second")).unwrap();

        let active = registry.active_coupons(cart).unwrap();
        let entries: Vec<(&str, &str)> = active
            .iter()
            .map(|c| (c.code(), c.config().title.as_str()))
            .collect();
        assert_eq!(entries, vec![("A", "second"), ("B", "other")]);
    }
}
