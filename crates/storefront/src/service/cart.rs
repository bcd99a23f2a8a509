//! Shopping carts.
//!
//! A cart line snapshots the product's special price and discount when it is
//! added. Catalog changes reach existing carts through
//! [`CartRepository::reprice_product`] and [`CartRepository::purge_product`].
//! Every edit is one repository call, so concurrent requests cannot overwrite
//! each other's lines.

use std::sync::Arc;

use common::protocol::{CartDto, MessageResponse, ProductDto};
use common::ServiceError;
use tracing::debug;

use super::ensure_owner;
use crate::auth::Claims;
use crate::domain::{Cart, Product};
use crate::repository::{CartRepository, ProductRepository, StoreError};

/// Path segment meaning "decrease by one" in a quantity update.
const DECREASE: &str = "delete";

#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    /// Add `quantity` of a product to the caller's cart, creating the cart
    /// if needed.
    pub async fn add_product(
        &self,
        caller: &Claims,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartDto, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::invalid_field(
                "quantity",
                "must be greater than or equal to 1",
            ));
        }
        let product = self.find_product(product_id).await?;
        let cart = self
            .carts
            .add_item(caller.uid, product_id, quantity)
            .await
            .map_err(|err| cart_error(err, &product, caller))?;
        debug!(cart_id = cart.id, product_id, quantity, "product added to cart");
        cart_dto(&cart, self.products.as_ref()).await
    }

    pub async fn list_all(&self) -> Result<Vec<CartDto>, ServiceError> {
        let carts = self.carts.list_all().await?;
        let mut out = Vec::with_capacity(carts.len());
        for cart in &carts {
            out.push(cart_dto(cart, self.products.as_ref()).await?);
        }
        Ok(out)
    }

    pub async fn get_for_user(&self, caller: &Claims) -> Result<CartDto, ServiceError> {
        let cart = self
            .carts
            .find_by_user(caller.uid)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", "email", &caller.email))?;
        cart_dto(&cart, self.products.as_ref()).await
    }

    /// Step a cart line up or down by one. `operation == "delete"` steps
    /// down; anything else steps up. A line that reaches zero is removed.
    pub async fn update_quantity(
        &self,
        caller: &Claims,
        product_id: i64,
        operation: &str,
    ) -> Result<CartDto, ServiceError> {
        let delta: i64 = if operation.eq_ignore_ascii_case(DECREASE) { -1 } else { 1 };

        if self.carts.find_by_user(caller.uid).await?.is_none() {
            return Err(ServiceError::not_found("Cart", "email", &caller.email));
        }
        let product = self.find_product(product_id).await?;
        let cart = self
            .carts
            .step_item(caller.uid, product_id, delta)
            .await
            .map_err(|err| cart_error(err, &product, caller))?;
        cart_dto(&cart, self.products.as_ref()).await
    }

    /// Remove a product line from a cart owned by the caller.
    pub async fn remove_product(
        &self,
        caller: &Claims,
        cart_id: i64,
        product_id: i64,
    ) -> Result<MessageResponse, ServiceError> {
        let cart = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", "cartId", cart_id))?;
        ensure_owner(caller, cart.user_id, "Cart")?;

        self.carts
            .remove_item(cart_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", "productId", product_id))?;
        let name = self
            .products
            .find_by_id(product_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| product_id.to_string());
        Ok(MessageResponse::ok(format!(
            "Product {name} removed from the cart !!!"
        )))
    }

    async fn find_product(&self, id: i64) -> Result<Product, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", "productId", id))
    }
}

/// Phrase a failed cart edit for the caller.
fn cart_error(err: StoreError, product: &Product, caller: &Claims) -> ServiceError {
    let name = &product.name;
    match err {
        StoreError::AlreadyInCart { .. } => {
            ServiceError::api(format!("Product {name} already exists in the cart"))
        }
        StoreError::NotInCart { .. } => {
            ServiceError::api(format!("Product {name} not available in the cart!!!"))
        }
        StoreError::NegativeQuantity { .. } => {
            ServiceError::api("The resulting quantity cannot be negative.")
        }
        StoreError::InsufficientStock { available, .. } if available <= 0 => {
            ServiceError::api(format!("{name} is not available"))
        }
        StoreError::InsufficientStock { available, .. } => ServiceError::api(format!(
            "Please, make an order of the {name} less than or equal to the quantity {available}."
        )),
        StoreError::Missing { entity: "Cart", .. } => {
            ServiceError::not_found("Cart", "email", &caller.email)
        }
        StoreError::Missing { entity: "Product", id } => {
            ServiceError::not_found("Product", "productId", id)
        }
        other => other.into(),
    }
}

/// Build a cart DTO. Each embedded product carries the cart line's quantity
/// instead of the catalog stock.
async fn cart_dto(
    cart: &Cart,
    products: &dyn ProductRepository,
) -> Result<CartDto, ServiceError> {
    let mut out = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        if let Some(product) = products.find_by_id(item.product_id).await? {
            out.push(ProductDto {
                quantity: item.quantity,
                ..ProductDto::from(&product)
            });
        }
    }
    Ok(CartDto {
        cart_id: cart.id,
        total_price: cart.total_price,
        products: out,
    })
}
