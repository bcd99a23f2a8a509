//! Entity → transfer-object mapping.

use common::protocol::{
    AddressDto, CategoryDto, OrderDto, OrderItemDto, PaymentDto, ProductDto, UserInfoResponse,
};

use crate::domain::{Address, Category, Order, OrderItem, Payment, Product, User};

impl From<&Category> for CategoryDto {
    fn from(c: &Category) -> Self {
        CategoryDto {
            category_id: c.id,
            category_name: c.name.clone(),
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            product_id: p.id,
            product_name: p.name.clone(),
            image: p.image.clone(),
            description: p.description.clone(),
            quantity: p.quantity,
            price: p.price,
            discount: p.discount,
            special_price: p.special_price,
            category_id: p.category_id,
        }
    }
}

impl From<&Address> for AddressDto {
    fn from(a: &Address) -> Self {
        AddressDto {
            address_id: a.id,
            street: a.street.clone(),
            building_name: a.building_name.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            country: a.country.clone(),
            pincode: a.pincode.clone(),
            user_id: a.user_id,
        }
    }
}

impl From<&Payment> for PaymentDto {
    fn from(p: &Payment) -> Self {
        PaymentDto {
            payment_id: p.id,
            payment_method: p.payment_method.clone(),
            pg_payment_id: p.pg_payment_id.clone(),
            pg_status: p.pg_status.clone(),
            pg_response_message: p.pg_response_message.clone(),
            pg_name: p.pg_name.clone(),
        }
    }
}

impl From<&OrderItem> for OrderItemDto {
    fn from(i: &OrderItem) -> Self {
        OrderItemDto {
            order_item_id: i.id,
            product_id: i.product_id,
            product_name: i.product_name.clone(),
            quantity: i.quantity,
            discount: i.discount,
            ordered_product_price: i.ordered_product_price,
        }
    }
}

impl From<&Order> for OrderDto {
    fn from(o: &Order) -> Self {
        OrderDto {
            order_id: o.id,
            email: o.email.clone(),
            order_items: o.items.iter().map(OrderItemDto::from).collect(),
            order_date: o.order_date,
            payment: PaymentDto::from(&o.payment),
            total_amount: o.total_amount,
            order_status: o.status.clone(),
            address_id: o.address_id,
        }
    }
}

/// Public view of a user; `token` is filled in by sign-in only.
pub fn user_info(user: &User, token: Option<String>) -> UserInfoResponse {
    UserInfoResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        roles: user.roles.iter().map(|r| r.as_str().to_owned()).collect(),
        token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn product_dto_copies_pricing() {
        let p = Product {
            id: 3,
            name: "Kettle".into(),
            image: "kettle.png".into(),
            description: Some("Boils water".into()),
            quantity: 4,
            price: 50.0,
            discount: 10.0,
            special_price: 45.0,
            category_id: 2,
        };
        let dto = ProductDto::from(&p);
        assert_eq!(dto.product_id, 3);
        assert_eq!(dto.special_price, 45.0);
        assert_eq!(dto.category_id, 2);
    }

    #[test]
    fn user_info_never_carries_password_hash() {
        let u = User {
            id: 1,
            username: "jdoe".into(),
            email: "jdoe@shop.example".into(),
            password_hash: "$argon2id$secret".into(),
            roles: vec![Role::User, Role::Admin],
        };
        let info = user_info(&u, None);
        assert_eq!(info.roles, vec!["ROLE_USER", "ROLE_ADMIN"]);
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("token"));
    }
}
