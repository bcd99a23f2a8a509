//! Shipping addresses. Every address belongs to one user.

use std::sync::Arc;

use common::protocol::{AddressDto, AddressRequest, MessageResponse};
use common::ServiceError;

use super::ensure_owner;
use crate::auth::Claims;
use crate::domain::Address;
use crate::repository::AddressRepository;

#[derive(Clone)]
pub struct AddressService {
    addresses: Arc<dyn AddressRepository>,
}

impl AddressService {
    pub fn new(addresses: Arc<dyn AddressRepository>) -> Self {
        Self { addresses }
    }

    pub async fn create(&self, caller: &Claims, req: AddressRequest) -> Result<AddressDto, ServiceError> {
        let mut address = Address {
            id: 0,
            user_id: caller.uid,
            ..Default::default()
        };
        apply(&mut address, req);
        let saved = self.addresses.insert(address).await?;
        Ok(AddressDto::from(&saved))
    }

    pub async fn list_all(&self) -> Result<Vec<AddressDto>, ServiceError> {
        Ok(self
            .addresses
            .list_all()
            .await?
            .iter()
            .map(AddressDto::from)
            .collect())
    }

    pub async fn get(&self, caller: &Claims, id: i64) -> Result<AddressDto, ServiceError> {
        let address = self.find_owned(caller, id).await?;
        Ok(AddressDto::from(&address))
    }

    pub async fn list_for_user(&self, caller: &Claims) -> Result<Vec<AddressDto>, ServiceError> {
        Ok(self
            .addresses
            .list_by_user(caller.uid)
            .await?
            .iter()
            .map(AddressDto::from)
            .collect())
    }

    pub async fn update(
        &self,
        caller: &Claims,
        id: i64,
        req: AddressRequest,
    ) -> Result<AddressDto, ServiceError> {
        let mut address = self.find_owned(caller, id).await?;
        apply(&mut address, req);
        let saved = self.addresses.update(address).await?;
        Ok(AddressDto::from(&saved))
    }

    pub async fn delete(&self, caller: &Claims, id: i64) -> Result<MessageResponse, ServiceError> {
        self.find_owned(caller, id).await?;
        self.addresses.delete(id).await?;
        Ok(MessageResponse::ok(format!(
            "Address deleted successfully with addressId: {id}"
        )))
    }

    async fn find_owned(&self, caller: &Claims, id: i64) -> Result<Address, ServiceError> {
        let address = self
            .addresses
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Address", "addressId", id))?;
        ensure_owner(caller, address.user_id, "Address")?;
        Ok(address)
    }
}

fn apply(address: &mut Address, req: AddressRequest) {
    address.street = req.street.trim().to_owned();
    address.building_name = req.building_name.trim().to_owned();
    address.city = req.city.trim().to_owned();
    address.state = req.state.trim().to_owned();
    address.country = req.country.trim().to_owned();
    address.pincode = req.pincode.trim().to_owned();
}
