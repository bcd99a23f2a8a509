//! Shipping address entity.

/// A postal address owned by one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub building_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    pub user_id: i64,
}
