//! Shopping cart entity.

use super::round_cents;

/// One product line in a cart.
///
/// `product_price` and `discount` are snapshots of the product at the time
/// the line was added or last repriced.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub discount: f64,
    pub product_price: f64,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.product_price * self.quantity as f64
    }
}

/// A user's cart. Each user has at most one.
///
/// `version` goes up on every stored change, so a reader can tell whether
/// the cart it looked at is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<CartItem>,
    pub total_price: f64,
    pub version: u64,
}

impl Cart {
    pub fn empty(user_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            items: Vec::new(),
            total_price: 0.0,
            version: 0,
        }
    }

    pub fn item(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn item_mut(&mut self, product_id: i64) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }

    /// Remove the line for `product_id`, recomputing the total.
    pub fn remove_product(&mut self, product_id: i64) -> Option<CartItem> {
        let pos = self.items.iter().position(|i| i.product_id == product_id)?;
        let removed = self.items.remove(pos);
        self.recompute_total();
        Some(removed)
    }

    /// Update the price snapshot of the line for `product_id`, if present.
    /// Returns `true` if a line was changed.
    pub fn reprice_product(&mut self, product_id: i64, price: f64, discount: f64) -> bool {
        let Some(item) = self.item_mut(product_id) else {
            return false;
        };
        item.product_price = price;
        item.discount = discount;
        self.recompute_total();
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.total_price = 0.0;
    }

    pub fn recompute_total(&mut self) {
        self.total_price = round_cents(self.items.iter().map(CartItem::line_total).sum());
    }
}
