//! Business rules, one service per resource.
//!
//! Services take their repositories as explicit constructor arguments, return
//! [`ServiceError`] for every failure, and hand back transfer objects rather
//! than entities.

pub mod address;
pub mod auth;
pub mod cart;
pub mod category;
pub mod mapper;
pub mod order;
pub mod product;

pub use address::AddressService;
pub use auth::AuthService;
pub use cart::CartService;
pub use category::CategoryService;
pub use order::OrderService;
pub use product::ProductService;

use std::sync::Arc;

use common::ServiceError;

use crate::auth::{Claims, RevocationList, TokenSigner};
use crate::repository::{Paging, Repositories};

/// The wired service graph shared by all handlers.
#[derive(Clone)]
pub struct Services {
    pub categories: CategoryService,
    pub products: ProductService,
    pub addresses: AddressService,
    pub carts: CartService,
    pub orders: OrderService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(
        repos: Repositories,
        paging: Paging,
        default_product_image: &str,
        signer: TokenSigner,
        revocations: RevocationList,
    ) -> Self {
        Self {
            categories: CategoryService::new(
                repos.categories.clone(),
                repos.products.clone(),
                repos.carts.clone(),
                paging,
            ),
            products: ProductService::new(
                repos.categories.clone(),
                repos.products.clone(),
                repos.carts.clone(),
                paging,
                Arc::from(default_product_image),
            ),
            addresses: AddressService::new(repos.addresses.clone()),
            carts: CartService::new(repos.carts.clone(), repos.products.clone()),
            orders: OrderService::new(
                repos.orders,
                repos.carts,
                repos.products,
                repos.addresses,
            ),
            auth: AuthService::new(repos.users, signer, revocations),
        }
    }
}

/// Allow the resource owner and admins; everyone else is forbidden.
pub(crate) fn ensure_owner(caller: &Claims, owner_id: i64, what: &str) -> Result<(), ServiceError> {
    if caller.uid == owner_id || caller.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "{what} does not belong to the current user"
        )))
    }
}

/// Current time as a Unix timestamp (seconds).
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by service tests.

    use super::*;
    use crate::domain::Role;
    use crate::repository::MemoryStore;

    pub const PAGING: Paging = Paging {
        default_page_size: 50,
        max_page_size: 200,
    };

    pub fn services() -> Services {
        Services::new(
            Repositories::in_memory(MemoryStore::new()),
            PAGING,
            "default.png",
            TokenSigner::new(b"test-secret-that-is-long-enough-for-hmac", 3600),
            RevocationList::new(),
        )
    }

    pub fn claims(uid: i64, roles: &[Role]) -> Claims {
        Claims {
            jti: uuid::Uuid::new_v4(),
            sub: format!("user{uid}"),
            uid,
            email: format!("user{uid}@shop.example"),
            roles: roles.to_vec(),
            exp: i64::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::claims;
    use super::*;
    use crate::domain::Role;

    #[test]
    fn owner_and_admin_pass_others_forbidden() {
        assert!(ensure_owner(&claims(1, &[Role::User]), 1, "Address").is_ok());
        assert!(ensure_owner(&claims(2, &[Role::Admin]), 1, "Address").is_ok());
        let err = ensure_owner(&claims(2, &[Role::User]), 1, "Address").unwrap_err();
        assert_eq!(err.http_status(), 403);
        assert_eq!(err.to_string(), "Address does not belong to the current user");
    }
}
