use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Customer, CustomerChanges, NewCustomer},
    validation::{ValidationResult, required},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl CreateCustomerRequest {
    pub fn validate(self) -> ValidationResult<NewCustomer> {
        let name = required("name", self.name)?;
        let address = required("address", self.address)?;
        NewCustomer::new(name, address)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl UpdateCustomerRequest {
    pub fn validate(self) -> ValidationResult<CustomerChanges> {
        CustomerChanges::new(self.name, self.address)
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerList {
    #[schema(value_type = Vec<Customer>)]
    pub items: Vec<Customer>,
}
