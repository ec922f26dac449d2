use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{NewOrder, Order, OrderChanges, OrderStatus, Product},
    validation::{self, ValidationError, ValidationResult, required},
};

/// `status` arrives as raw JSON so a number or object is reported as an
/// invalid choice instead of a decoding failure.
fn parse_status(value: Value) -> ValidationResult<OrderStatus> {
    match value {
        Value::String(literal) => validation::order_status(&literal),
        other => Err(ValidationError::InvalidEnumValue {
            field: "status",
            value: other.to_string(),
        }),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Option<Uuid>,
    #[schema(value_type = Option<String>, example = "NEW")]
    pub status: Option<Value>,
    /// Initial product set; repeated ids are ignored.
    #[serde(default)]
    pub products: Vec<Uuid>,
}

impl CreateOrderRequest {
    pub fn validate(self) -> ValidationResult<NewOrder> {
        let customer_id = required("customer_id", self.customer_id)?;
        let status = parse_status(required("status", self.status)?)?;
        Ok(NewOrder::new(customer_id, status, self.products))
    }
}

/// `id` and `date` are not updatable.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<Uuid>,
    #[schema(value_type = Option<String>, example = "SENT")]
    pub status: Option<Value>,
    pub products: Option<Vec<Uuid>>,
}

impl UpdateOrderRequest {
    pub fn validate(self) -> ValidationResult<OrderChanges> {
        let status = self.status.map(parse_status).transpose()?;
        Ok(OrderChanges::new(self.customer_id, status, self.products))
    }
}

/// An order with its current products and the values derived from them.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub products: Vec<Product>,
    #[schema(value_type = String, example = "11.98")]
    pub total_price: Decimal,
    pub can_be_fulfilled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderTotal {
    pub order_id: Uuid,
    #[schema(value_type = String, example = "11.98")]
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderFulfillment {
    pub order_id: Uuid,
    pub can_be_fulfilled: bool,
}

/// One allowed order status: the stored literal and its display label.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusChoice {
    pub value: OrderStatus,
    pub label: String,
}

impl From<OrderStatus> for StatusChoice {
    fn from(status: OrderStatus) -> Self {
        Self {
            value: status,
            label: status.label().to_string(),
        }
    }
}
