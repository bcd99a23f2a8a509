//! Request and response types exchanged over the public JSON API.
//!
//! Every type serialises with camelCase field names. Request bodies implement
//! [`Validate`]; response types are plain transfer objects built by the
//! service layer from domain entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, ServiceError};
use crate::validate::{Validate, Validator};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Always `false`.
    pub success: bool,
    /// Per-field messages; present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            message: message.into(),
            success: false,
            errors: Some(errors),
        }
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self::with_errors(err.public_message(), errors.clone()),
            other => Self::new(other.public_message()),
        }
    }
}

/// Plain acknowledgement body for operations without a resource to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"`.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse `asc` / `desc`, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Raw paging query string: `?pageNumber=&pageSize=&sortBy=&sortOrder=`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// One page of a list result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last_page: bool,
}

impl<T> Page<T> {
    /// Convert the page's items while keeping its paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            last_page: self.last_page,
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Body for creating or renaming a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub category_name: String,
}

impl Validate for CategoryRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .min_len("categoryName", &self.category_name, 5)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_id: i64,
    pub category_name: String,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Body for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

impl Validate for ProductRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        v.min_len("productName", &self.product_name, 3)
            .at_least("quantity", self.quantity, 0)
            .non_negative("price", self.price)
            .range("discount", self.discount, 0.0, 100.0);
        if let Some(description) = &self.description {
            v.min_len("description", description, 6);
        }
        v.finish()
    }
}

/// Body for `PUT /api/admin/products/{productId}/image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImageRequest {
    pub image: String,
}

impl Validate for ProductImageRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        Validator::new().not_blank("image", &self.image).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub product_name: String,
    pub image: String,
    pub description: Option<String>,
    /// Stock level, or the line quantity when embedded in a cart.
    pub quantity: i64,
    pub price: f64,
    pub discount: f64,
    pub special_price: f64,
    pub category_id: i64,
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

impl Validate for AddressRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .min_len("street", &self.street, 5)
            .min_len("buildingName", &self.building_name, 5)
            .min_len("city", &self.city, 4)
            .min_len("state", &self.state, 2)
            .min_len("country", &self.country, 2)
            .min_len("pincode", &self.pincode, 5)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub address_id: i64,
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    pub user_id: i64,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub cart_id: i64,
    pub total_price: f64,
    /// Products in the cart; `quantity` is the line quantity, not stock.
    pub products: Vec<ProductDto>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Body for `POST /api/order/users/payments/{paymentMethod}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub address_id: i64,
    pub pg_name: String,
    #[serde(default)]
    pub pg_payment_id: String,
    #[serde(default)]
    pub pg_status: String,
    #[serde(default)]
    pub pg_response_message: String,
}

impl Validate for OrderRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .at_least("addressId", self.address_id, 1)
            .not_blank("pgName", &self.pg_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub payment_id: i64,
    pub payment_method: String,
    pub pg_payment_id: String,
    pub pg_status: String,
    pub pg_response_message: String,
    pub pg_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub order_item_id: i64,
    pub product_id: i64,
    /// Product name at the time the order was placed.
    pub product_name: String,
    pub quantity: i64,
    pub discount: f64,
    pub ordered_product_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: i64,
    pub email: String,
    pub order_items: Vec<OrderItemDto>,
    pub order_date: NaiveDate,
    pub payment: PaymentDto,
    pub total_amount: f64,
    pub order_status: String,
    pub address_id: i64,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Requested role names (`admin`, `seller`, `user`). Empty means `user`.
    #[serde(default, alias = "role")]
    pub roles: Vec<String>,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        v.len_between("username", &self.username, 3, 20)
            .email("email", &self.email)
            .len_between("password", &self.password, 6, 40);
        if self.email.chars().count() > 50 {
            v.len_between("email", &self.email, 1, 50);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .not_blank("username", &self.username)
            .not_blank("password", &self.password)
            .finish()
    }
}

/// Identity of a signed-in user; `token` is present only in the sign-in reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}
