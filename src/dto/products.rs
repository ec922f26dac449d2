use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{NewProduct, Product, ProductChanges},
    validation::{ValidationResult, required},
};

/// Every field is optional on the wire so a missing one is reported as
/// `required` rather than as a JSON decoding failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

impl CreateProductRequest {
    pub fn validate(self) -> ValidationResult<NewProduct> {
        let name = required("name", self.name)?;
        let price = required("price", self.price)?;
        let available = required("available", self.available)?;
        NewProduct::new(name, price, available)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<String>, example = "9.99")]
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

impl UpdateProductRequest {
    pub fn validate(self) -> ValidationResult<ProductChanges> {
        ProductChanges::new(self.name, self.price, self.available)
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
