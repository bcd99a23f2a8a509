//! Domain entities: the in-memory shape of persisted rows.
//!
//! Entities carry no transport concerns; the service layer maps them to the
//! transfer objects in [`common::protocol`]. Ids are assigned by the
//! repository on insert; an entity built by a service carries `id == 0`
//! until then.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem, Payment};
pub use user::{Role, User};

/// Round a monetary amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
