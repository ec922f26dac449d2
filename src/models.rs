use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::{self, ValidationError, ValidationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    InProcess,
    Sent,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::InProcess,
        OrderStatus::Sent,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::InProcess => "IN_PROCESS",
            OrderStatus::Sent => "SENT",
            OrderStatus::Completed => "COMPLETED",
        }
    }

    /// Human readable label shown next to the stored literal.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::InProcess => "In Process",
            OrderStatus::Sent => "Sent",
            OrderStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidEnumValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Associated product ids in the order they were added.
    pub products: Vec<Uuid>,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// A product that passed validation and can be persisted. Only
/// [`NewProduct::new`] builds one, so a store never sees an invalid value.
///
/// ```compile_fail
/// use shop_orders_api::models::NewProduct;
///
/// let product = NewProduct {
///     name: String::new(),
///     price: Default::default(),
///     available: true,
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub(crate) name: String,
    pub(crate) price: Decimal,
    pub(crate) available: bool,
}

impl NewProduct {
    pub fn new(name: String, price: Decimal, available: bool) -> ValidationResult<Self> {
        Ok(Self {
            name: validation::product_name(name)?,
            price: validation::price(price)?,
            available,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub(crate) name: Option<String>,
    pub(crate) price: Option<Decimal>,
    pub(crate) available: Option<bool>,
}

impl ProductChanges {
    /// Checks only the fields that are present.
    pub fn new(
        name: Option<String>,
        price: Option<Decimal>,
        available: Option<bool>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            name: name.map(validation::product_name).transpose()?,
            price: price.map(validation::price).transpose()?,
            available,
        })
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(available) = self.available {
            product.available = available;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub(crate) name: String,
    pub(crate) address: String,
}

impl NewCustomer {
    pub fn new(name: String, address: String) -> ValidationResult<Self> {
        Ok(Self {
            name: validation::customer_name(name)?,
            address: validation::customer_address(address)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerChanges {
    pub(crate) name: Option<String>,
    pub(crate) address: Option<String>,
}

impl CustomerChanges {
    pub fn new(name: Option<String>, address: Option<String>) -> ValidationResult<Self> {
        Ok(Self {
            name: name.map(validation::customer_name).transpose()?,
            address: address.map(validation::customer_address).transpose()?,
        })
    }

    pub fn apply(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(address) = self.address {
            customer.address = address;
        }
    }
}

/// An order whose fields passed validation. Reference existence is checked by
/// the store inside the write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub(crate) customer_id: Uuid,
    pub(crate) status: OrderStatus,
    pub(crate) products: Vec<Uuid>,
}

impl NewOrder {
    /// Repeated product ids keep their first position.
    pub fn new(customer_id: Uuid, status: OrderStatus, products: Vec<Uuid>) -> Self {
        Self {
            customer_id,
            status,
            products: validation::unique_ids(products),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub(crate) customer_id: Option<Uuid>,
    pub(crate) status: Option<OrderStatus>,
    /// Replaces the whole association set when present.
    pub(crate) products: Option<Vec<Uuid>>,
}

impl OrderChanges {
    pub fn new(
        customer_id: Option<Uuid>,
        status: Option<OrderStatus>,
        products: Option<Vec<Uuid>>,
    ) -> Self {
        Self {
            customer_id,
            status,
            products: products.map(validation::unique_ids),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.status.is_none() && self.products.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_new_product_is_rejected() {
        assert_eq!(
            NewProduct::new(String::new(), dec!(-5.123), true),
            Err(ValidationError::BlankValue { field: "name" })
        );
        assert_eq!(
            NewProduct::new("Invalid product".into(), dec!(-5.123), true),
            Err(ValidationError::NonPositiveValue { field: "price" })
        );
        assert!(matches!(
            NewProduct::new("Invalid product".into(), dec!(5.123), true),
            Err(ValidationError::Precision { .. })
        ));
    }

    #[test]
    fn new_product_price_is_stored_in_cents() {
        let product = NewProduct::new("Temporary product".into(), dec!(5), true)
            .expect("valid product");
        assert_eq!(product.price.to_string(), "5.00");
    }

    #[test]
    fn product_changes_check_present_fields_only() {
        assert_eq!(
            ProductChanges::new(None, None, Some(false)),
            Ok(ProductChanges {
                available: Some(false),
                ..Default::default()
            })
        );
        assert!(matches!(
            ProductChanges::new(Some("  ".into()), None, None),
            Err(ValidationError::BlankValue { field: "name" })
        ));
    }

    #[test]
    fn invalid_customer_is_rejected() {
        assert!(matches!(
            NewCustomer::new("X".repeat(101), "Xxx 123".into()),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
        assert_eq!(
            CustomerChanges::new(None, Some(String::new())),
            Err(ValidationError::BlankValue { field: "address" })
        );
    }

    #[test]
    fn order_inputs_drop_repeated_products() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let order = NewOrder::new(Uuid::new_v4(), OrderStatus::New, vec![p2, p1, p2]);
        assert_eq!(order.products, vec![p2, p1]);

        let changes = OrderChanges::new(None, None, Some(vec![p1, p1]));
        assert_eq!(changes.products, Some(vec![p1]));
        assert!(OrderChanges::new(None, None, None).is_empty());
    }
}
