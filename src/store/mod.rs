//! Persistence boundary for products, customers and orders.
//!
//! Stores receive values that already passed field validation; they are
//! responsible for reference checks, cascades and applying each write
//! atomically.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Customer, CustomerChanges, NewCustomer, NewOrder, NewProduct, Order, OrderChanges,
        Product, ProductChanges,
    },
    validation::ValidationError,
};

pub mod memory;
pub mod orm;

pub use self::memory::InMemoryStore;
pub use self::orm::SeaOrmStore;

pub const PRODUCT: &str = "product";
pub const CUSTOMER: &str = "customer";
pub const ORDER: &str = "order";

pub(crate) fn dangling(field: &'static str, entity: &'static str, id: Uuid) -> AppError {
    ValidationError::DanglingReference { field, entity, id }.into()
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> AppResult<Product>;
    async fn get_product(&self, id: Uuid) -> AppResult<Product>;
    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product>;
    /// Removes the product from every order it is associated with.
    async fn delete_product(&self, id: Uuid) -> AppResult<()>;
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer>;
    async fn get_customer(&self, id: Uuid) -> AppResult<Customer>;
    async fn update_customer(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer>;
    /// Deletes the customer together with all of their orders.
    async fn delete_customer(&self, id: Uuid) -> AppResult<()>;
    async fn list_customers(&self) -> AppResult<Vec<Customer>>;

    /// Fails with a dangling reference when the customer or any product is unknown.
    async fn create_order(&self, order: NewOrder) -> AppResult<Order>;
    async fn get_order(&self, id: Uuid) -> AppResult<Order>;
    async fn update_order(&self, id: Uuid, changes: OrderChanges) -> AppResult<Order>;
    async fn delete_order(&self, id: Uuid) -> AppResult<()>;
    async fn list_orders(&self) -> AppResult<Vec<Order>>;

    /// Associating a product twice is a no-op.
    async fn add_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order>;
    /// Removing a product that is not associated is a no-op.
    async fn remove_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order>;
    /// Products currently associated with the order, in association order.
    async fn order_products(&self, order_id: Uuid) -> AppResult<Vec<Product>>;
}
