//! Persistence-access traits, one per aggregate, plus the in-memory datastore.
//!
//! Services depend only on the traits (held as `Arc<dyn ...>`), so a SQL
//! backend can be slotted in without touching business logic. Every trait
//! method is a single atomic operation against the store. Read-modify-write
//! sequences that must not interleave (cart edits, checkout) are therefore
//! trait methods of their own rather than a read followed by a save.

pub mod memory;
pub mod page;

pub use memory::MemoryStore;
pub use page::{PageRequest, Paging, SortField};

use std::sync::Arc;

use async_trait::async_trait;
use common::protocol::Page;
use common::ServiceError;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::domain::{Address, Cart, CartItem, Category, Order, Product, User};

/// Errors raised by a datastore.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// An update or delete addressed a row that does not exist.
    #[error("{entity} {id} does not exist")]
    Missing { entity: &'static str, id: i64 },

    /// A stock reservation or cart quantity could not be satisfied.
    #[error("insufficient stock for product {product_id}: {available} available")]
    InsufficientStock { product_id: i64, available: i64 },

    /// The cart already holds a line for this product.
    #[error("product {product_id} is already in the cart")]
    AlreadyInCart { product_id: i64 },

    /// The cart holds no line for this product.
    #[error("product {product_id} is not in the cart")]
    NotInCart { product_id: i64 },

    /// A quantity change would take a cart line below zero.
    #[error("quantity of product {product_id} cannot go below zero")]
    NegativeQuantity { product_id: i64 },

    /// The row changed since the caller read it.
    #[error("{entity} {id} was modified concurrently")]
    Conflict { entity: &'static str, id: i64 },
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { entity, id } => ServiceError::not_found(entity, "id", id),
            other => ServiceError::Api(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Sort columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySort {
    Id,
    Name,
}

impl SortField for CategorySort {
    const DEFAULT: Self = CategorySort::Id;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "categoryId" => Some(CategorySort::Id),
            "categoryName" => Some(CategorySort::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    Id,
    Name,
    Price,
    SpecialPrice,
    Quantity,
}

impl SortField for ProductSort {
    const DEFAULT: Self = ProductSort::Id;

    fn parse(name: &str) -> Option<Self> {
        match name {
            "productId" => Some(ProductSort::Id),
            "productName" => Some(ProductSort::Name),
            "price" => Some(ProductSort::Price),
            "specialPrice" => Some(ProductSort::SpecialPrice),
            "quantity" => Some(ProductSort::Quantity),
            _ => None,
        }
    }
}

/// Which products a product listing covers.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    All,
    Category(i64),
    /// Case-insensitive substring match on the product name.
    Keyword(String),
}

// ---------------------------------------------------------------------------
// Repository traits
// ---------------------------------------------------------------------------

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category, assigning its id. Names are unique case-insensitively.
    async fn insert(&self, category: Category) -> StoreResult<Category>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Category>>;
    async fn list(&self, page: PageRequest<CategorySort>) -> StoreResult<Page<Category>>;
    async fn update(&self, category: Category) -> StoreResult<Category>;
    async fn delete(&self, id: i64) -> StoreResult<Option<Category>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: Product) -> StoreResult<Product>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>>;
    /// Case-insensitive name lookup within one category.
    async fn find_in_category_by_name(
        &self,
        category_id: i64,
        name: String,
    ) -> StoreResult<Option<Product>>;
    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest<ProductSort>,
    ) -> StoreResult<Page<Product>>;
    async fn update(&self, product: Product) -> StoreResult<Product>;
    async fn delete(&self, id: i64) -> StoreResult<Option<Product>>;
    /// Delete every product in a category, returning the deleted rows.
    async fn delete_by_category(&self, category_id: i64) -> StoreResult<Vec<Product>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn insert(&self, address: Address) -> StoreResult<Address>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Address>>;
    async fn list_all(&self) -> StoreResult<Vec<Address>>;
    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Address>>;
    async fn update(&self, address: Address) -> StoreResult<Address>;
    async fn delete(&self, id: i64) -> StoreResult<Option<Address>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cart>>;
    async fn find_by_user(&self, user_id: i64) -> StoreResult<Option<Cart>>;
    async fn list_all(&self) -> StoreResult<Vec<Cart>>;
    /// Add a new line to the user's cart, creating the cart if needed.
    ///
    /// The product must exist, must not already be in the cart, and must have
    /// at least `quantity` in stock. The line snapshots the product's special
    /// price and discount.
    async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> StoreResult<Cart>;
    /// Move a line's quantity by `delta`, refreshing its price snapshot.
    /// A line that drops to zero is removed and one that would drop below
    /// zero is refused. Increases are checked against stock.
    async fn step_item(&self, user_id: i64, product_id: i64, delta: i64) -> StoreResult<Cart>;
    /// Remove one line from a cart, returning it if it was there.
    async fn remove_item(&self, cart_id: i64, product_id: i64) -> StoreResult<Option<CartItem>>;
    /// Update the price snapshot of `product_id` in every cart holding it.
    /// Returns the number of carts changed.
    async fn reprice_product(&self, product_id: i64, price: f64, discount: f64) -> StoreResult<usize>;
    /// Drop `product_id` from every cart holding it. Returns the number of
    /// carts changed.
    async fn purge_product(&self, product_id: i64) -> StoreResult<usize>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Check out a cart in one step: reserve stock for every order line,
    /// insert the order (assigning ids to it, its lines and its payment),
    /// and empty the cart.
    ///
    /// Fails with [`StoreError::Conflict`] if the cart is no longer at
    /// `cart_version`, and with [`StoreError::InsufficientStock`] if any line
    /// cannot be reserved. Nothing is written on failure.
    async fn place(&self, order: Order, cart_id: i64, cart_version: u64) -> StoreResult<Order>;
    async fn list_by_email(&self, email: String) -> StoreResult<Vec<Order>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Usernames and emails are unique.
    async fn insert(&self, user: User) -> StoreResult<User>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_by_username(&self, username: String) -> StoreResult<Option<User>>;
    async fn exists_by_email(&self, email: String) -> StoreResult<bool>;
}

/// The full set of repositories a service graph is built from.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Back every repository with one shared [`MemoryStore`].
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            categories: store.clone(),
            products: store.clone(),
            addresses: store.clone(),
            carts: store.clone(),
            orders: store.clone(),
            users: store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_names() {
        assert_eq!(CategorySort::parse("categoryName"), Some(CategorySort::Name));
        assert_eq!(CategorySort::parse("name"), None);
        assert_eq!(ProductSort::parse("specialPrice"), Some(ProductSort::SpecialPrice));
        assert_eq!(ProductSort::parse("productid"), None);
    }

    #[test]
    fn store_errors_map_to_service_errors() {
        let missing: ServiceError = StoreError::Missing { entity: "Cart", id: 4 }.into();
        assert_eq!(missing.http_status(), 404);
        assert_eq!(missing.to_string(), "Cart not found with id: 4");

        let dup: ServiceError = StoreError::Duplicate {
            field: "username",
            value: "jdoe".into(),
        }
        .into();
        assert_eq!(dup.http_status(), 400);
    }
}
