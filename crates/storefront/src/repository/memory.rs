//! [`MemoryStore`]: an in-process datastore implementing every repository trait.
//!
//! All tables live behind one `tokio::sync::RwLock`, so each trait method runs
//! as a single atomic step: reads share the lock, writes take it exclusively.
//! Cart edits and checkout validate and write under the same write guard.
//! Ids come from per-table sequences starting at 1.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::protocol::Page;
use tokio::sync::RwLock;

use super::page::{paginate, sort_by, PageRequest};
use super::{
    AddressRepository, CartRepository, CategoryRepository, CategorySort, OrderRepository,
    ProductFilter, ProductRepository, ProductSort, StoreError, StoreResult, UserRepository,
};
use crate::domain::{Address, Cart, CartItem, Category, Order, Product, User};

#[derive(Debug, Default)]
struct Sequences {
    category: i64,
    product: i64,
    address: i64,
    cart: i64,
    cart_item: i64,
    order: i64,
    order_item: i64,
    payment: i64,
    user: i64,
}

fn next(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    addresses: BTreeMap<i64, Address>,
    carts: BTreeMap<i64, Cart>,
    orders: BTreeMap<i64, Order>,
    users: BTreeMap<i64, User>,
    seq: Sequences,
}

impl Tables {
    fn category_name_taken(&self, name: &str, except: i64) -> bool {
        self.categories
            .values()
            .any(|c| c.id != except && c.name.eq_ignore_ascii_case(name))
    }

    fn product(&self, id: i64) -> StoreResult<&Product> {
        self.products.get(&id).ok_or(StoreError::Missing {
            entity: "Product",
            id,
        })
    }

    fn cart_id_of(&self, user_id: i64) -> Option<i64> {
        self.carts
            .values()
            .find(|c| c.user_id == user_id)
            .map(|c| c.id)
    }

    /// The user's cart, created empty if it does not exist yet.
    fn cart_of(&mut self, user_id: i64) -> &mut Cart {
        let id = match self.cart_id_of(user_id) {
            Some(id) => id,
            None => next(&mut self.seq.cart),
        };
        self.carts.entry(id).or_insert_with(|| Cart {
            id,
            ..Cart::empty(user_id)
        })
    }

    /// Decrement stock for every `(product_id, quantity)` line, all or nothing.
    fn reserve(&mut self, lines: impl IntoIterator<Item = (i64, i64)>) -> StoreResult<()> {
        // Sum per product first so duplicate lines cannot oversell.
        let mut wanted: BTreeMap<i64, i64> = BTreeMap::new();
        for (product_id, quantity) in lines {
            *wanted.entry(product_id).or_default() += quantity;
        }
        for (product_id, quantity) in &wanted {
            ensure_stock(self.product(*product_id)?, *quantity)?;
        }
        for (product_id, quantity) in wanted {
            if let Some(product) = self.products.get_mut(&product_id) {
                product.quantity -= quantity;
            }
        }
        Ok(())
    }
}

fn ensure_stock(product: &Product, wanted: i64) -> StoreResult<()> {
    if product.quantity < wanted {
        return Err(StoreError::InsufficientStock {
            product_id: product.id,
            available: product.quantity,
        });
    }
    Ok(())
}

/// Finish a cart edit: recompute the total and bump the version.
fn touch(cart: &mut Cart) {
    cart.recompute_total();
    cart.version += 1;
}

/// Shared, cloneable handle to the in-memory tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert(&self, mut category: Category) -> StoreResult<Category> {
        let mut t = self.inner.write().await;
        if t.category_name_taken(&category.name, 0) {
            return Err(StoreError::Duplicate {
                field: "categoryName",
                value: category.name,
            });
        }
        category.id = next(&mut t.seq.category);
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.inner.read().await.categories.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest<CategorySort>) -> StoreResult<Page<Category>> {
        let mut rows: Vec<Category> = self.inner.read().await.categories.values().cloned().collect();
        match page.sort {
            CategorySort::Id => sort_by(&mut rows, page.order, |a, b| a.id.cmp(&b.id)),
            CategorySort::Name => sort_by(&mut rows, page.order, |a, b| {
                a.name.to_lowercase().cmp(&b.name.to_lowercase())
            }),
        }
        Ok(paginate(rows, &page))
    }

    async fn update(&self, category: Category) -> StoreResult<Category> {
        let mut t = self.inner.write().await;
        if !t.categories.contains_key(&category.id) {
            return Err(StoreError::Missing {
                entity: "Category",
                id: category.id,
            });
        }
        if t.category_name_taken(&category.name, category.id) {
            return Err(StoreError::Duplicate {
                field: "categoryName",
                value: category.name,
            });
        }
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.inner.write().await.categories.remove(&id))
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn insert(&self, mut product: Product) -> StoreResult<Product> {
        let mut t = self.inner.write().await;
        if !t.categories.contains_key(&product.category_id) {
            return Err(StoreError::Missing {
                entity: "Category",
                id: product.category_id,
            });
        }
        product.id = next(&mut t.seq.product);
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn find_in_category_by_name(
        &self,
        category_id: i64,
        name: String,
    ) -> StoreResult<Option<Product>> {
        Ok(self
            .inner
            .read()
            .await
            .products
            .values()
            .find(|p| p.category_id == category_id && p.name.eq_ignore_ascii_case(&name))
            .cloned())
    }

    async fn list(
        &self,
        filter: ProductFilter,
        page: PageRequest<ProductSort>,
    ) -> StoreResult<Page<Product>> {
        let needle = match &filter {
            ProductFilter::Keyword(k) => k.to_lowercase(),
            _ => String::new(),
        };
        let mut rows: Vec<Product> = self
            .inner
            .read()
            .await
            .products
            .values()
            .filter(|p| match &filter {
                ProductFilter::All => true,
                ProductFilter::Category(id) => p.category_id == *id,
                ProductFilter::Keyword(_) => p.name.to_lowercase().contains(&needle),
            })
            .cloned()
            .collect();
        match page.sort {
            ProductSort::Id => sort_by(&mut rows, page.order, |a, b| a.id.cmp(&b.id)),
            ProductSort::Name => sort_by(&mut rows, page.order, |a, b| {
                a.name.to_lowercase().cmp(&b.name.to_lowercase())
            }),
            ProductSort::Price => sort_by(&mut rows, page.order, |a, b| a.price.total_cmp(&b.price)),
            ProductSort::SpecialPrice => sort_by(&mut rows, page.order, |a, b| {
                a.special_price.total_cmp(&b.special_price)
            }),
            ProductSort::Quantity => {
                sort_by(&mut rows, page.order, |a, b| a.quantity.cmp(&b.quantity))
            }
        }
        Ok(paginate(rows, &page))
    }

    async fn update(&self, product: Product) -> StoreResult<Product> {
        let mut t = self.inner.write().await;
        match t.products.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(product)
            }
            None => Err(StoreError::Missing {
                entity: "Product",
                id: product.id,
            }),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.inner.write().await.products.remove(&id))
    }

    async fn delete_by_category(&self, category_id: i64) -> StoreResult<Vec<Product>> {
        let mut t = self.inner.write().await;
        let ids: Vec<i64> = t
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .map(|p| p.id)
            .collect();
        Ok(ids.iter().filter_map(|id| t.products.remove(id)).collect())
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn insert(&self, mut address: Address) -> StoreResult<Address> {
        let mut t = self.inner.write().await;
        address.id = next(&mut t.seq.address);
        t.addresses.insert(address.id, address.clone());
        Ok(address)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Address>> {
        Ok(self.inner.read().await.addresses.get(&id).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Address>> {
        Ok(self.inner.read().await.addresses.values().cloned().collect())
    }

    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Address>> {
        Ok(self
            .inner
            .read()
            .await
            .addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, address: Address) -> StoreResult<Address> {
        let mut t = self.inner.write().await;
        match t.addresses.get_mut(&address.id) {
            Some(row) => {
                *row = address.clone();
                Ok(address)
            }
            None => Err(StoreError::Missing {
                entity: "Address",
                id: address.id,
            }),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<Option<Address>> {
        Ok(self.inner.write().await.addresses.remove(&id))
    }
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

#[async_trait]
impl CartRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cart>> {
        Ok(self.inner.read().await.carts.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> StoreResult<Option<Cart>> {
        Ok(self
            .inner
            .read()
            .await
            .carts
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Cart>> {
        Ok(self.inner.read().await.carts.values().cloned().collect())
    }

    async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> StoreResult<Cart> {
        let mut t = self.inner.write().await;
        let product = t.product(product_id)?.clone();
        let already = t
            .cart_id_of(user_id)
            .and_then(|id| t.carts.get(&id))
            .is_some_and(|c| c.item(product_id).is_some());
        if already {
            return Err(StoreError::AlreadyInCart { product_id });
        }
        ensure_stock(&product, quantity)?;

        let item_id = next(&mut t.seq.cart_item);
        let cart = t.cart_of(user_id);
        cart.items.push(CartItem {
            id: item_id,
            product_id,
            quantity,
            discount: product.discount,
            product_price: product.special_price,
        });
        touch(cart);
        Ok(cart.clone())
    }

    async fn step_item(&self, user_id: i64, product_id: i64, delta: i64) -> StoreResult<Cart> {
        let mut t = self.inner.write().await;
        let cart_id = t.cart_id_of(user_id).ok_or(StoreError::Missing {
            entity: "Cart",
            id: user_id,
        })?;
        let product = t.product(product_id)?.clone();
        let cart = t.carts.get_mut(&cart_id).ok_or(StoreError::Missing {
            entity: "Cart",
            id: cart_id,
        })?;

        let current = cart
            .item(product_id)
            .map(|i| i.quantity)
            .ok_or(StoreError::NotInCart { product_id })?;
        let wanted = current + delta;
        if wanted < 0 {
            return Err(StoreError::NegativeQuantity { product_id });
        }
        if delta > 0 {
            ensure_stock(&product, wanted)?;
        }
        if wanted == 0 {
            cart.remove_product(product_id);
        } else if let Some(item) = cart.item_mut(product_id) {
            item.quantity = wanted;
            item.product_price = product.special_price;
            item.discount = product.discount;
        }
        touch(cart);
        Ok(cart.clone())
    }

    async fn remove_item(&self, cart_id: i64, product_id: i64) -> StoreResult<Option<CartItem>> {
        let mut t = self.inner.write().await;
        let cart = t.carts.get_mut(&cart_id).ok_or(StoreError::Missing {
            entity: "Cart",
            id: cart_id,
        })?;
        let removed = cart.remove_product(product_id);
        if removed.is_some() {
            touch(cart);
        }
        Ok(removed)
    }

    async fn reprice_product(&self, product_id: i64, price: f64, discount: f64) -> StoreResult<usize> {
        let mut t = self.inner.write().await;
        let mut changed = 0;
        for cart in t.carts.values_mut() {
            if cart.reprice_product(product_id, price, discount) {
                touch(cart);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn purge_product(&self, product_id: i64) -> StoreResult<usize> {
        let mut t = self.inner.write().await;
        let mut changed = 0;
        for cart in t.carts.values_mut() {
            if cart.remove_product(product_id).is_some() {
                touch(cart);
                changed += 1;
            }
        }
        Ok(changed)
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place(&self, mut order: Order, cart_id: i64, cart_version: u64) -> StoreResult<Order> {
        let mut t = self.inner.write().await;
        let cart = t.carts.get(&cart_id).ok_or(StoreError::Missing {
            entity: "Cart",
            id: cart_id,
        })?;
        if cart.version != cart_version {
            return Err(StoreError::Conflict {
                entity: "Cart",
                id: cart_id,
            });
        }
        t.reserve(order.items.iter().map(|i| (i.product_id, i.quantity)))?;

        order.id = next(&mut t.seq.order);
        order.payment.id = next(&mut t.seq.payment);
        for item in order.items.iter_mut() {
            item.id = next(&mut t.seq.order_item);
        }
        t.orders.insert(order.id, order.clone());
        if let Some(cart) = t.carts.get_mut(&cart_id) {
            cart.clear();
            cart.version += 1;
        }
        Ok(order)
    }

    async fn list_by_email(&self, email: String) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.email.eq_ignore_ascii_case(&email))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, mut user: User) -> StoreResult<User> {
        let mut t = self.inner.write().await;
        if t.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate {
                field: "username",
                value: user.username,
            });
        }
        if t.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate {
                field: "email",
                value: user.email,
            });
        }
        user.id = next(&mut t.seq.user);
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: String) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_email(&self, email: String) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::special_price;
    use crate::domain::{OrderItem, Payment, Role};
    use common::protocol::SortOrder;

    async fn seed_category(store: &MemoryStore, name: &str) -> Category {
        CategoryRepository::insert(store, Category::new(name)).await.unwrap()
    }

    async fn seed_product(store: &MemoryStore, category_id: i64, name: &str, price: f64, qty: i64) -> Product {
        let p = Product {
            id: 0,
            name: name.into(),
            image: "default.png".into(),
            description: None,
            quantity: qty,
            price,
            discount: 0.0,
            special_price: special_price(price, 0.0),
            category_id,
        };
        ProductRepository::insert(store, p).await.unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let a = seed_category(&store, "Books").await;
        let b = seed_category(&store, "Games").await;
        assert_eq!((a.id, b.id), (1, 2));
        let p = seed_product(&store, a.id, "Novel", 10.0, 1).await;
        assert_eq!(p.id, 1);
    }

    #[tokio::test]
    async fn category_names_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        seed_category(&store, "Books").await;
        let err = CategoryRepository::insert(&store, Category::new("BOOKS")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "categoryName", .. }));
    }

    #[tokio::test]
    async fn category_rename_to_own_name_is_allowed() {
        let store = MemoryStore::new();
        let mut c = seed_category(&store, "Books").await;
        c.name = "books".into();
        assert!(CategoryRepository::update(&store, c).await.is_ok());
    }

    #[tokio::test]
    async fn product_insert_requires_category() {
        let store = MemoryStore::new();
        let p = Product {
            id: 0,
            name: "Orphan".into(),
            image: "default.png".into(),
            description: None,
            quantity: 1,
            price: 1.0,
            discount: 0.0,
            special_price: 1.0,
            category_id: 99,
        };
        let err = ProductRepository::insert(&store, p).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing { entity: "Category", id: 99 }));
    }

    #[tokio::test]
    async fn product_list_filters_and_sorts() {
        let store = MemoryStore::new();
        let books = seed_category(&store, "Books").await;
        let games = seed_category(&store, "Games").await;
        seed_product(&store, books.id, "Cookbook", 30.0, 1).await;
        seed_product(&store, books.id, "Atlas", 50.0, 1).await;
        seed_product(&store, games.id, "Chess", 20.0, 1).await;

        let page = PageRequest {
            page_number: 0,
            page_size: 10,
            sort: ProductSort::Price,
            order: SortOrder::Desc,
        };
        let in_books = ProductRepository::list(&store, ProductFilter::Category(books.id), page)
            .await
            .unwrap();
        let names: Vec<_> = in_books.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Atlas", "Cookbook"]);

        let search = ProductRepository::list(&store, ProductFilter::Keyword("OO".into()), page)
            .await
            .unwrap();
        assert_eq!(search.total_elements, 1);
        assert_eq!(search.content[0].name, "Cookbook");
    }

    fn order_for(lines: &[(i64, i64)]) -> Order {
        Order {
            id: 0,
            email: "jdoe@shop.example".into(),
            items: lines
                .iter()
                .map(|&(product_id, quantity)| OrderItem {
                    id: 0,
                    product_id,
                    product_name: format!("product {product_id}"),
                    quantity,
                    discount: 0.0,
                    ordered_product_price: 1.0,
                })
                .collect(),
            order_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            payment: Payment {
                id: 0,
                payment_method: "card".into(),
                pg_payment_id: "pi_1".into(),
                pg_status: "succeeded".into(),
                pg_response_message: "ok".into(),
                pg_name: "Stripe".into(),
            },
            total_amount: 0.0,
            status: "Order Accepted !".into(),
            address_id: 1,
        }
    }

    async fn quantity_of(store: &MemoryStore, id: i64) -> i64 {
        ProductRepository::find_by_id(store, id)
            .await
            .unwrap()
            .unwrap()
            .quantity
    }

    #[tokio::test]
    async fn place_reserves_all_or_nothing() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 50.0, 5).await;
        let b = seed_product(&store, c.id, "Bible", 20.0, 1).await;
        let cart = store.add_item(7, a.id, 1).await.unwrap();

        let err = store
            .place(order_for(&[(a.id, 2), (b.id, 2)]), cart.id, cart.version)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { available: 1, .. }));
        assert_eq!(quantity_of(&store, a.id).await, 5);
        assert!(store.list_by_email("jdoe@shop.example".into()).await.unwrap().is_empty());
        assert_eq!(CartRepository::find_by_id(&store, cart.id).await.unwrap().unwrap(), cart);

        let order = store
            .place(order_for(&[(a.id, 2), (b.id, 1)]), cart.id, cart.version)
            .await
            .unwrap();
        assert_eq!((order.id, order.items[1].id), (1, 2));
        assert_eq!(quantity_of(&store, a.id).await, 3);
        assert_eq!(quantity_of(&store, b.id).await, 0);
        let emptied = CartRepository::find_by_id(&store, cart.id).await.unwrap().unwrap();
        assert!(emptied.items.is_empty());
        assert!(emptied.version > cart.version);
    }

    #[tokio::test]
    async fn place_sums_duplicate_lines() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 50.0, 3).await;
        let cart = store.add_item(7, a.id, 1).await.unwrap();
        let err = store
            .place(order_for(&[(a.id, 2), (a.id, 2)]), cart.id, cart.version)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { .. }));
    }

    #[tokio::test]
    async fn place_rejects_a_cart_that_moved_on() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 50.0, 5).await;
        let b = seed_product(&store, c.id, "Bible", 20.0, 5).await;
        let seen = store.add_item(7, a.id, 1).await.unwrap();
        store.add_item(7, b.id, 1).await.unwrap();

        let err = store
            .place(order_for(&[(a.id, 1)]), seen.id, seen.version)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "Cart", .. }));
        assert_eq!(quantity_of(&store, a.id).await, 5);
        let cart = store.find_by_user(7).await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[tokio::test]
    async fn delete_by_category_removes_only_that_category() {
        let store = MemoryStore::new();
        let books = seed_category(&store, "Books").await;
        let games = seed_category(&store, "Games").await;
        seed_product(&store, books.id, "Atlas", 1.0, 1).await;
        seed_product(&store, games.id, "Chess", 1.0, 1).await;

        let removed = store.delete_by_category(books.id).await.unwrap();
        assert_eq!(removed.len(), 1);
        let all = ProductRepository::list(&store, ProductFilter::All, PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(all.content[0].name, "Chess");
    }

    #[tokio::test]
    async fn add_item_creates_cart_and_checks_under_lock() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 40.0, 2).await;

        let cart = store.add_item(7, a.id, 2).await.unwrap();
        assert_eq!((cart.id, cart.items[0].id, cart.version), (1, 1, 1));
        assert_eq!(cart.total_price, 80.0);
        assert_eq!(store.find_by_user(7).await.unwrap().unwrap().id, cart.id);

        assert!(matches!(
            store.add_item(7, a.id, 1).await,
            Err(StoreError::AlreadyInCart { .. })
        ));
        assert!(matches!(
            store.add_item(8, a.id, 3).await,
            Err(StoreError::InsufficientStock { available: 2, .. })
        ));
        assert!(matches!(
            store.add_item(8, 99, 1).await,
            Err(StoreError::Missing { entity: "Product", id: 99 })
        ));
    }

    #[tokio::test]
    async fn step_item_moves_quantity_and_drops_empty_lines() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 10.0, 2).await;
        assert!(matches!(
            store.step_item(7, a.id, 1).await,
            Err(StoreError::Missing { entity: "Cart", .. })
        ));

        store.add_item(7, a.id, 1).await.unwrap();
        assert!(matches!(
            store.step_item(7, a.id, -2).await,
            Err(StoreError::NegativeQuantity { .. })
        ));
        let cart = store.step_item(7, a.id, 1).await.unwrap();
        assert_eq!(cart.items[0].quantity, 2);
        assert!(matches!(
            store.step_item(7, a.id, 1).await,
            Err(StoreError::InsufficientStock { .. })
        ));
        store.step_item(7, a.id, -1).await.unwrap();
        let cart = store.step_item(7, a.id, -1).await.unwrap();
        assert!(cart.items.is_empty());
        assert!(matches!(
            store.step_item(7, a.id, -1).await,
            Err(StoreError::NotInCart { .. })
        ));
    }

    #[tokio::test]
    async fn purge_and_reprice_touch_every_holding_cart() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 10.0, 9).await;
        let b = seed_product(&store, c.id, "Bible", 5.0, 9).await;
        store.add_item(1, a.id, 2).await.unwrap();
        store.add_item(2, a.id, 1).await.unwrap();
        store.add_item(2, b.id, 1).await.unwrap();

        assert_eq!(store.reprice_product(a.id, 8.0, 20.0).await.unwrap(), 2);
        assert_eq!(store.find_by_user(1).await.unwrap().unwrap().total_price, 16.0);

        assert_eq!(store.purge_product(a.id).await.unwrap(), 2);
        assert_eq!(store.purge_product(a.id).await.unwrap(), 0);
        let first = store.find_by_user(1).await.unwrap().unwrap();
        assert!(first.items.is_empty());
        assert_eq!(first.total_price, 0.0);
        assert_eq!(store.find_by_user(2).await.unwrap().unwrap().total_price, 5.0);
    }

    #[tokio::test]
    async fn remove_item_reports_missing_lines() {
        let store = MemoryStore::new();
        let c = seed_category(&store, "Books").await;
        let a = seed_product(&store, c.id, "Atlas", 10.0, 9).await;
        let cart = store.add_item(1, a.id, 2).await.unwrap();

        assert_eq!(store.remove_item(cart.id, a.id).await.unwrap().unwrap().quantity, 2);
        assert!(store.remove_item(cart.id, a.id).await.unwrap().is_none());
        assert!(matches!(
            store.remove_item(42, a.id).await,
            Err(StoreError::Missing { entity: "Cart", id: 42 })
        ));
    }

    #[tokio::test]
    async fn user_uniqueness() {
        let store = MemoryStore::new();
        let user = User {
            id: 0,
            username: "jdoe".into(),
            email: "jdoe@shop.example".into(),
            password_hash: "x".into(),
            roles: vec![Role::User],
        };
        UserRepository::insert(&store, user.clone()).await.unwrap();

        let same_name = User {
            email: "other@shop.example".into(),
            ..user.clone()
        };
        assert!(matches!(
            UserRepository::insert(&store, same_name).await,
            Err(StoreError::Duplicate { field: "username", .. })
        ));

        let same_email = User {
            username: "other".into(),
            email: "JDOE@shop.example".into(),
            ..user
        };
        assert!(matches!(
            UserRepository::insert(&store, same_email).await,
            Err(StoreError::Duplicate { field: "email", .. })
        ));
        assert!(store.exists_by_email("jdoe@shop.example".into()).await.unwrap());
    }
}
