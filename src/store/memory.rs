use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CUSTOMER, EntityStore, ORDER, PRODUCT, dangling};
use crate::{
    error::{AppError, AppResult},
    models::{
        Customer, CustomerChanges, NewCustomer, NewOrder, NewProduct, Order, OrderChanges,
        Product, ProductChanges,
    },
};

#[derive(Debug, Default)]
struct Tables {
    products: IndexMap<Uuid, Product>,
    customers: IndexMap<Uuid, Customer>,
    orders: IndexMap<Uuid, Order>,
}

impl Tables {
    fn ensure_customer(&self, id: Uuid) -> AppResult<()> {
        if self.customers.contains_key(&id) {
            Ok(())
        } else {
            Err(dangling("customer_id", CUSTOMER, id))
        }
    }

    fn ensure_products(&self, ids: &[Uuid]) -> AppResult<()> {
        match ids.iter().find(|id| !self.products.contains_key(*id)) {
            Some(missing) => Err(dangling("products", PRODUCT, *missing)),
            None => Ok(()),
        }
    }

    /// Resolves both ends of an association, reporting either as dangling.
    fn association(&mut self, order_id: Uuid, product_id: Uuid) -> AppResult<&mut Order> {
        if !self.products.contains_key(&product_id) {
            return Err(dangling("product", PRODUCT, product_id));
        }
        self.orders
            .get_mut(&order_id)
            .ok_or_else(|| dangling("order", ORDER, order_id))
    }
}

/// Store kept entirely in process memory.
///
/// All tables sit behind one lock, so each write checks its references and
/// applies while holding it.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn create_product(&self, product: NewProduct) -> AppResult<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            available: product.available,
        };
        let mut tables = self.tables.write().await;
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        let tables = self.tables.read().await;
        tables
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(PRODUCT, id))
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(PRODUCT, id))?;
        changes.apply(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.products.shift_remove(&id).is_none() {
            return Err(AppError::not_found(PRODUCT, id));
        }
        for order in tables.orders.values_mut() {
            order.products.retain(|product_id| *product_id != id);
        }
        Ok(())
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().cloned().collect())
    }

    async fn create_customer(&self, customer: NewCustomer) -> AppResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            address: customer.address,
        };
        let mut tables = self.tables.write().await;
        tables.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        let tables = self.tables.read().await;
        tables
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(CUSTOMER, id))
    }

    async fn update_customer(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer> {
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(CUSTOMER, id))?;
        changes.apply(customer);
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.customers.shift_remove(&id).is_none() {
            return Err(AppError::not_found(CUSTOMER, id));
        }
        tables.orders.retain(|_, order| order.customer_id != id);
        Ok(())
    }

    async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables.customers.values().cloned().collect())
    }

    async fn create_order(&self, order: NewOrder) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        tables.ensure_customer(order.customer_id)?;
        tables.ensure_products(&order.products)?;

        let order = Order {
            id: Uuid::new_v4(),
            customer_id: order.customer_id,
            products: order.products,
            date: Utc::now(),
            status: order.status,
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> AppResult<Order> {
        let tables = self.tables.read().await;
        tables
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(ORDER, id))
    }

    async fn update_order(&self, id: Uuid, changes: OrderChanges) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&id) {
            return Err(AppError::not_found(ORDER, id));
        }
        if let Some(customer_id) = changes.customer_id {
            tables.ensure_customer(customer_id)?;
        }
        if let Some(products) = &changes.products {
            tables.ensure_products(products)?;
        }

        let order = tables
            .orders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(ORDER, id))?;
        if let Some(customer_id) = changes.customer_id {
            order.customer_id = customer_id;
        }
        if let Some(status) = changes.status {
            order.status = status;
        }
        if let Some(products) = changes.products {
            order.products = products;
        }
        Ok(order.clone())
    }

    async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .orders
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(ORDER, id))
    }

    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().cloned().collect())
    }

    async fn add_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        let order = tables.association(order_id, product_id)?;
        if !order.products.contains(&product_id) {
            order.products.push(product_id);
        }
        Ok(order.clone())
    }

    async fn remove_product(&self, order_id: Uuid, product_id: Uuid) -> AppResult<Order> {
        let mut tables = self.tables.write().await;
        let order = tables.association(order_id, product_id)?;
        order.products.retain(|id| *id != product_id);
        Ok(order.clone())
    }

    async fn order_products(&self, order_id: Uuid) -> AppResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let order = tables
            .orders
            .get(&order_id)
            .ok_or_else(|| AppError::not_found(ORDER, order_id))?;
        Ok(order
            .products
            .iter()
            .filter_map(|id| tables.products.get(id).cloned())
            .collect())
    }
}
