//! Order placement.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use common::protocol::{OrderDto, OrderRequest};
use common::ServiceError;
use tracing::{debug, info};

use super::ensure_owner;
use crate::auth::Claims;
use crate::domain::order::ORDER_ACCEPTED;
use crate::domain::{Order, OrderItem, Payment};
use crate::repository::{
    AddressRepository, CartRepository, OrderRepository, ProductRepository, StoreError,
};

/// How often checkout re-reads a cart that changed underneath it.
const CHECKOUT_ATTEMPTS: u32 = 3;

/// Why a checkout attempt did not go through.
enum Attempt {
    /// The cart changed after it was read.
    Stale,
    Failed(ServiceError),
}

impl From<ServiceError> for Attempt {
    fn from(err: ServiceError) -> Self {
        Attempt::Failed(err)
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
    addresses: Arc<dyn AddressRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        products: Arc<dyn ProductRepository>,
        addresses: Arc<dyn AddressRepository>,
    ) -> Self {
        Self {
            orders,
            carts,
            products,
            addresses,
        }
    }

    /// Turn the caller's cart into an order.
    ///
    /// The order is built from a snapshot of the cart. The repository then
    /// reserves stock, stores the order, and empties the cart in one step,
    /// provided the cart has not changed since the snapshot. A cart that
    /// changed is read again, up to [`CHECKOUT_ATTEMPTS`] times.
    pub async fn place_order(
        &self,
        caller: &Claims,
        payment_method: &str,
        req: OrderRequest,
    ) -> Result<OrderDto, ServiceError> {
        for attempt in 1..=CHECKOUT_ATTEMPTS {
            match self.try_place(caller, payment_method, &req).await {
                Err(Attempt::Stale) => {
                    debug!(user_id = caller.uid, attempt, "cart changed during checkout");
                }
                Err(Attempt::Failed(err)) => return Err(err),
                Ok(saved) => {
                    info!(
                        order_id = saved.id,
                        user_id = caller.uid,
                        lines = saved.items.len(),
                        total = saved.total_amount,
                        "order placed"
                    );
                    return Ok(OrderDto::from(&saved));
                }
            }
        }
        Err(ServiceError::api(
            "Cart was modified during checkout, please try again",
        ))
    }

    async fn try_place(
        &self,
        caller: &Claims,
        payment_method: &str,
        req: &OrderRequest,
    ) -> Result<Order, Attempt> {
        let cart = self
            .carts
            .find_by_user(caller.uid)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::not_found("Cart", "email", &caller.email))?;
        if cart.items.is_empty() {
            return Err(ServiceError::api("Cart is empty").into());
        }

        let address = self
            .addresses
            .find_by_id(req.address_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::not_found("Address", "addressId", req.address_id))?;
        ensure_owner(caller, address.user_id, "Address")?;

        let mut names = HashMap::with_capacity(cart.items.len());
        let mut items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = self
                .products
                .find_by_id(line.product_id)
                .await
                .map_err(ServiceError::from)?
                .ok_or_else(|| ServiceError::not_found("Product", "productId", line.product_id))?;
            names.insert(product.id, product.name.clone());
            items.push(OrderItem {
                id: 0,
                product_id: product.id,
                product_name: product.name,
                quantity: line.quantity,
                discount: line.discount,
                ordered_product_price: line.product_price,
            });
        }

        let order = Order {
            id: 0,
            email: caller.email.clone(),
            items,
            order_date: Utc::now().date_naive(),
            payment: Payment {
                id: 0,
                payment_method: payment_method.to_owned(),
                pg_payment_id: req.pg_payment_id.clone(),
                pg_status: req.pg_status.clone(),
                pg_response_message: req.pg_response_message.clone(),
                pg_name: req.pg_name.clone(),
            },
            total_amount: cart.total_price,
            status: ORDER_ACCEPTED.to_owned(),
            address_id: address.id,
        };

        self.orders
            .place(order, cart.id, cart.version)
            .await
            .map_err(|err| match err {
                StoreError::Conflict { .. } => Attempt::Stale,
                StoreError::InsufficientStock {
                    product_id,
                    available,
                } => {
                    let name = names
                        .get(&product_id)
                        .cloned()
                        .unwrap_or_else(|| product_id.to_string());
                    ServiceError::api(format!(
                        "Please, make an order of the {name} less than or equal to the quantity {available}."
                    ))
                    .into()
                }
                other => ServiceError::from(other).into(),
            })
    }

    pub async fn list_for_user(&self, caller: &Claims) -> Result<Vec<OrderDto>, ServiceError> {
        Ok(self
            .orders
            .list_by_email(caller.email.clone())
            .await?
            .iter()
            .map(OrderDto::from)
            .collect())
    }
}
