//! Category and product entities.

use super::round_cents;

/// A product category. Names are unique, compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// A product listed under exactly one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub description: Option<String>,
    /// Units in stock.
    pub quantity: i64,
    pub price: f64,
    /// Percentage off `price`, `0..=100`.
    pub discount: f64,
    /// `price` after `discount`, kept in sync by [`Product::reprice`].
    pub special_price: f64,
    pub category_id: i64,
}

impl Product {
    /// Set price and discount and recompute the special price.
    pub fn reprice(&mut self, price: f64, discount: f64) {
        self.price = price;
        self.discount = discount;
        self.special_price = special_price(price, discount);
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// `price - discount% of price`, rounded to cents.
pub fn special_price(price: f64, discount: f64) -> f64 {
    round_cents(price - (discount * 0.01) * price)
}
